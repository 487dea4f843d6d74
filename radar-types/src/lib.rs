//! # radar-types
//!
//! Core types for Arvan Cloud Radar monitoring. This crate defines the
//! vocabulary shared by the fetchers in `radar-adapters` and the outage
//! tracker in `radar-notif`.
//!
//! ## Features
//!
//! - `serde`: serialization of datacenters, services and statistics via serde
//!
//! ## Example
//!
//! ```rust
//! use radar_types::{Datacenter, Sample, Service};
//!
//! let service: Service = "GitHub".parse().unwrap();
//! assert_eq!(service, Service::Github);
//! assert_eq!(service.display_name(), "Github");
//!
//! let dc = Datacenter::new("mci");
//! assert!(Datacenter::known().contains(&dc));
//!
//! assert!(Sample::new(0.0).is_accessible());
//! assert!(!Sample::new(42.0).is_accessible());
//! ```

mod datacenter;
mod sample;
mod service;

pub use datacenter::*;
pub use sample::*;
pub use service::*;
