//! # radar-adapters
//!
//! Fetchers that retrieve the latest reachability sample for a service as
//! seen from one datacenter.
//!
//! ## Supported Sources
//!
//! - **Arvan Cloud Radar** (`arvan` feature) - the public internet-monitoring
//!   API at `radar.arvancloud.ir`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! # #[cfg(feature = "arvan")]
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! use radar_adapters::arvan::RadarAdapter;
//! use radar_adapters::StatsFetcher;
//! use radar_types::{Datacenter, Service};
//!
//! let adapter = RadarAdapter::builder().build()?;
//! let sample = adapter.fetch(&Datacenter::new("mci"), Service::Google).await?;
//!
//! println!("google from mci: accessible = {}", sample.is_accessible());
//! # Ok(())
//! # }
//! ```

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;

pub mod error;

#[cfg(feature = "arvan")]
pub mod arvan;

pub use error::FetchError;

// Re-export types for convenience
pub use radar_types::{Datacenter, Sample, Service, ServiceStatistics};

/// A source of reachability samples.
///
/// Implementations perform one lookup per call and never retry; the caller
/// polls again on its next round.
#[async_trait]
pub trait StatsFetcher: Send + Sync + Debug {
    /// Fetch the most recent sample of `service` as measured from `datacenter`.
    async fn fetch(&self, datacenter: &Datacenter, service: Service) -> Result<Sample, FetchError>;
}

#[async_trait]
impl<T: StatsFetcher + ?Sized> StatsFetcher for Arc<T> {
    async fn fetch(&self, datacenter: &Datacenter, service: Service) -> Result<Sample, FetchError> {
        (**self).fetch(datacenter, service).await
    }
}

/// Pick the requested service's history out of a decoded radar response.
///
/// The body must be a JSON object mapping service names to arrays of
/// numbers. `null` entries read as `0`.
pub fn parse_statistics(body: &[u8], service: Service) -> Result<ServiceStatistics, FetchError> {
    let mut parsed: serde_json::Map<String, serde_json::Value> =
        serde_json::from_slice(body).map_err(|e| FetchError::Parse(e.to_string()))?;

    let raw = parsed
        .remove(service.as_str())
        .ok_or(FetchError::MissingService(service))?;

    let values: Vec<Option<f64>> =
        serde_json::from_value(raw).map_err(|e| FetchError::Parse(e.to_string()))?;

    if values.is_empty() {
        return Err(FetchError::MissingService(service));
    }

    Ok(ServiceStatistics::new(
        service,
        values.into_iter().map(|v| v.unwrap_or(0.0)).collect(),
    ))
}
