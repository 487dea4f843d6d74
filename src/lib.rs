//! # radar-notif
//!
//! Outage alerts for internet services as measured by Arvan Cloud Radar.
//!
//! The radar publishes, for each Iranian ISP/datacenter, whether well-known
//! services (Google, GitHub, ...) are currently reachable. This crate polls
//! it for one service across all datacenters and notifies when a datacenter
//! enters or leaves an outage.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────────┐
//! │                           Monitor (round)                          │
//! │        one task per datacenter, joined before the next round       │
//! │                                                                    │
//! │  ┌──────────────┐   ┌───────────┐   ┌───────────────┐   ┌────────┐ │
//! │  │ StatsFetcher │──▶│  Sample   │──▶│ OutageTracker │──▶│Notifier│ │
//! │  │ (radar API)  │   │(classify) │   │ (hysteresis)  │   │(group) │ │
//! │  └──────────────┘   └───────────┘   └───────────────┘   └────────┘ │
//! └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`monitor`]**: round orchestration and the polling loop
//! - **[`tracker`]**: per-datacenter debounce state and [`OutageEvent`]s
//! - **[`notify`]**: console and desktop backends plus [`NotifierGroup`]
//! - **[`config`]**: layered [`Settings`] (defaults, file, env, flags)
//!
//! Fetching lives in `radar-adapters`, shared types in `radar-types`.
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Watch GitHub from every datacenter, checking every 2 minutes
//! radar-notif --service github --delay 2
//!
//! # List the services the radar reports
//! radar-notif --services
//! ```
//!
//! ### As a library
//!
//! ```
//! use radar_notif::{OutagePolicy, OutageTracker};
//! use radar_types::{Datacenter, Service};
//!
//! # tokio_test::block_on(async {
//! let tracker = OutageTracker::new(OutagePolicy::default());
//! let mci = Datacenter::new("mci");
//!
//! assert!(tracker.observe(&mci, Service::Google, false).await.is_none());
//! assert!(tracker.observe(&mci, Service::Google, false).await.is_none());
//! let event = tracker.observe(&mci, Service::Google, false).await.unwrap();
//! assert_eq!(event.message(), "Google is unreachable from mci");
//! # });
//! ```

pub mod config;
pub mod error;
pub mod monitor;
pub mod notify;
pub mod tracker;

// Re-export main types for convenience
pub use config::{Settings, SettingsOverrides, PROGRAM_NAME};
pub use error::{ConfigError, NotifyError};
pub use monitor::{Monitor, MonitorBuilder, RoundReport};
pub use notify::{ConsoleNotifier, DesktopNotifier, Notifier, NotifierGroup};
pub use tracker::{
    DatacenterGuard, DatacenterState, OutageEvent, OutagePolicy, OutageTracker, ThresholdMode,
};
