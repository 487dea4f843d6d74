//! Error types.

use thiserror::Error;

/// Invalid or missing configuration. Fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("must specify a service")]
    MissingService,

    #[error("invalid service: {0}")]
    UnknownService(String),

    #[error("delay must be greater than 0")]
    InvalidDelay,

    #[error("outage threshold must be greater than 0")]
    InvalidThreshold,

    #[error("fetch timeout must be greater than 0")]
    InvalidTimeout,

    #[error("at least one datacenter must be configured")]
    NoDatacenters,

    #[error("datacenter names must not be empty")]
    EmptyDatacenter,

    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

/// A notification backend failed to deliver.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("console notification error: {0}")]
    Console(#[from] std::io::Error),

    #[error("desktop notification error: {0}")]
    Desktop(String),
}
