//! Outage detection.
//!
//! Each datacenter runs its own hysteresis filter over the boolean
//! "accessible now" signal. Entering an outage takes a confirmed streak of
//! failures, leaving one takes a single good sample.
//!
//! ```text
//!            failure (streak meets policy) / Started
//!   ┌─────────┐ ─────────────────────────────▶ ┌────────┐
//!   │ Healthy │                                │ Outage │
//!   └─────────┘ ◀───────────────────────────── └────────┘
//!        ▲ │        success / Cleared              │ ▲
//!        └─┘ success, or failure under policy      └─┘ failure
//! ```
//!
//! The tracker owns one lock per datacenter. Callers that must pair a state
//! change with a side effect hold the [`DatacenterGuard`] across both.

mod state;

pub use state::{DatacenterState, OutagePolicy, ThresholdMode, Transition};

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use radar_types::{Datacenter, Service};
use tokio::sync::{Mutex, OwnedMutexGuard};

/// A state transition for one (datacenter, service) pair, ready to be reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutageEvent {
    OutageStarted {
        datacenter: Datacenter,
        service: Service,
    },
    OutageCleared {
        datacenter: Datacenter,
        service: Service,
    },
}

impl OutageEvent {
    fn from_transition(transition: Transition, datacenter: Datacenter, service: Service) -> Self {
        match transition {
            Transition::Started => OutageEvent::OutageStarted { datacenter, service },
            Transition::Cleared => OutageEvent::OutageCleared { datacenter, service },
        }
    }

    pub fn datacenter(&self) -> &Datacenter {
        match self {
            OutageEvent::OutageStarted { datacenter, .. }
            | OutageEvent::OutageCleared { datacenter, .. } => datacenter,
        }
    }

    pub fn service(&self) -> Service {
        match self {
            OutageEvent::OutageStarted { service, .. }
            | OutageEvent::OutageCleared { service, .. } => *service,
        }
    }

    pub fn is_started(&self) -> bool {
        matches!(self, OutageEvent::OutageStarted { .. })
    }

    /// Notification title.
    pub fn title(&self) -> &'static str {
        match self {
            OutageEvent::OutageStarted { .. } => "🔴 Internet Outage",
            OutageEvent::OutageCleared { .. } => "🟢 Internet Restored",
        }
    }

    /// Notification body.
    pub fn message(&self) -> String {
        match self {
            OutageEvent::OutageStarted {
                datacenter,
                service,
            } => format!("{} is unreachable from {}", service.display_name(), datacenter),
            OutageEvent::OutageCleared {
                datacenter,
                service,
            } => format!(
                "{} is reachable again from {}",
                service.display_name(),
                datacenter
            ),
        }
    }
}

impl fmt::Display for OutageEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title(), self.message())
    }
}

/// Owned store of per-datacenter debounce state.
///
/// Datacenters passed at construction are seeded in the healthy state; any
/// other datacenter gets a fresh entry on first use. Entries live as long as
/// the tracker.
#[derive(Debug, Default)]
pub struct OutageTracker {
    policy: OutagePolicy,
    states: RwLock<BTreeMap<Datacenter, Arc<Mutex<DatacenterState>>>>,
}

impl OutageTracker {
    pub fn new(policy: OutagePolicy) -> Self {
        Self {
            policy,
            states: RwLock::new(BTreeMap::new()),
        }
    }

    /// Create a tracker with healthy entries for `datacenters`.
    pub fn with_datacenters(
        policy: OutagePolicy,
        datacenters: impl IntoIterator<Item = Datacenter>,
    ) -> Self {
        let states = datacenters
            .into_iter()
            .map(|dc| (dc, Arc::new(Mutex::new(DatacenterState::new()))))
            .collect();
        Self {
            policy,
            states: RwLock::new(states),
        }
    }

    pub fn policy(&self) -> OutagePolicy {
        self.policy
    }

    /// Datacenters that currently have an entry.
    pub fn datacenters(&self) -> Vec<Datacenter> {
        self.states.read().keys().cloned().collect()
    }

    fn get_or_create(&self, datacenter: &Datacenter) -> Arc<Mutex<DatacenterState>> {
        // Fast path: check if it exists
        {
            let states = self.states.read();
            if let Some(state) = states.get(datacenter) {
                return state.clone();
            }
        }

        let mut states = self.states.write();
        states
            .entry(datacenter.clone())
            .or_insert_with(|| Arc::new(Mutex::new(DatacenterState::new())))
            .clone()
    }

    /// Take exclusive access to one datacenter's state.
    ///
    /// Other datacenters stay available while the guard is held.
    pub async fn lock(&self, datacenter: &Datacenter) -> DatacenterGuard {
        let state = self.get_or_create(datacenter).lock_owned().await;
        DatacenterGuard {
            datacenter: datacenter.clone(),
            policy: self.policy,
            state,
        }
    }

    /// Record one sample and return the event to report, if any.
    pub async fn observe(
        &self,
        datacenter: &Datacenter,
        service: Service,
        accessible: bool,
    ) -> Option<OutageEvent> {
        self.lock(datacenter).await.observe(service, accessible)
    }

    /// Copy of the current state, or `None` if the datacenter was never seen.
    pub async fn state(&self, datacenter: &Datacenter) -> Option<DatacenterState> {
        let entry = self.states.read().get(datacenter).cloned()?;
        let state = *entry.lock().await;
        Some(state)
    }

    /// Datacenters currently in an outage.
    pub async fn outages(&self) -> Vec<Datacenter> {
        let entries: Vec<_> = self
            .states
            .read()
            .iter()
            .map(|(dc, state)| (dc.clone(), state.clone()))
            .collect();

        let mut outages = Vec::new();
        for (dc, state) in entries {
            if state.lock().await.in_outage() {
                outages.push(dc);
            }
        }
        outages
    }
}

/// Exclusive access to one datacenter's state.
pub struct DatacenterGuard {
    datacenter: Datacenter,
    policy: OutagePolicy,
    state: OwnedMutexGuard<DatacenterState>,
}

impl DatacenterGuard {
    pub fn datacenter(&self) -> &Datacenter {
        &self.datacenter
    }

    pub fn state(&self) -> DatacenterState {
        *self.state
    }

    pub fn observe(&mut self, service: Service, accessible: bool) -> Option<OutageEvent> {
        self.state
            .observe(accessible, &self.policy)
            .map(|t| OutageEvent::from_transition(t, self.datacenter.clone(), service))
    }
}

impl fmt::Debug for DatacenterGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatacenterGuard")
            .field("datacenter", &self.datacenter)
            .field("state", &*self.state)
            .finish()
    }
}
