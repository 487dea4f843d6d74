//! Arvan Cloud Radar adapter using the public internet-monitoring API.
//!
//! The radar publishes, per ISP/datacenter, a short history of reachability
//! readings for a fixed list of well-known services:
//!
//! ```text
//! GET https://radar.arvancloud.ir/api/v1/internet-monitoring?isp=mci
//!
//! {"google": [0, 0, 0, 12], "github": [0, 0, 0, 0], ...}
//! ```
//!
//! A reading of `0` means the service was reachable. The adapter returns the
//! last reading of the requested service.
//!
//! ## Example
//!
//! ```rust,no_run
//! use radar_adapters::arvan::RadarAdapter;
//! use radar_types::{Datacenter, Service};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let adapter = RadarAdapter::builder()
//!         .timeout(Duration::from_secs(5))
//!         .build()?;
//!
//!     let stats = adapter
//!         .fetch_statistics(&Datacenter::new("irancell"), Service::Github)
//!         .await?;
//!
//!     println!("{} readings, accessible now: {}", stats.values.len(), stats.is_accessible_now());
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use radar_types::{Datacenter, Sample, Service, ServiceStatistics};

use crate::{parse_statistics, FetchError, StatsFetcher};

/// Public endpoint of the Arvan Cloud Radar API.
pub const DEFAULT_BASE_URL: &str = "https://radar.arvancloud.ir/api/v1/internet-monitoring";

/// Arvan Cloud Radar adapter.
///
/// Owns its HTTP client; cookies set by the API are kept for the lifetime
/// of the adapter.
#[derive(Debug, Clone)]
pub struct RadarAdapter {
    client: Client,
    base_url: String,
}

impl RadarAdapter {
    /// Create a new builder for configuring the adapter.
    pub fn builder() -> RadarAdapterBuilder {
        RadarAdapterBuilder::default()
    }

    /// The endpoint queried by this adapter.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the full reading history of `service` from `datacenter`.
    pub async fn fetch_statistics(
        &self,
        datacenter: &Datacenter,
        service: Service,
    ) -> Result<ServiceStatistics, FetchError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("isp", datacenter.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        let body = response.bytes().await?;
        parse_statistics(&body, service)
    }
}

#[async_trait]
impl StatsFetcher for RadarAdapter {
    async fn fetch(&self, datacenter: &Datacenter, service: Service) -> Result<Sample, FetchError> {
        let stats = self.fetch_statistics(datacenter, service).await?;
        stats.latest().ok_or(FetchError::MissingService(service))
    }
}

/// Builder for RadarAdapter.
#[derive(Debug, Default)]
pub struct RadarAdapterBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
}

impl RadarAdapterBuilder {
    /// Set the API endpoint (default: [`DEFAULT_BASE_URL`]).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the adapter.
    pub fn build(self) -> Result<RadarAdapter, FetchError> {
        let timeout = self.timeout.unwrap_or(Duration::from_secs(10));

        let client = Client::builder()
            .timeout(timeout)
            .cookie_store(true)
            .build()
            .map_err(|e| FetchError::Http(format!("failed to build HTTP client: {}", e)))?;

        Ok(RadarAdapter {
            client,
            base_url: self
                .base_url
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        })
    }
}
