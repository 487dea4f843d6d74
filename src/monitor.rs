//! Round-based polling of every datacenter.
//!
//! A round spawns one task per datacenter, each running
//! fetch → classify → track → (maybe) notify, and waits for all of them
//! before returning. [`Monitor::run`] repeats rounds with a fixed delay in
//! between until shut down.

use std::collections::BTreeSet;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use radar_adapters::{FetchError, StatsFetcher};
use radar_types::{Datacenter, Service};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::notify::{Notifier, NotifierGroup};
use crate::tracker::{OutageEvent, OutagePolicy, OutageTracker};

/// What happened during one round.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RoundReport {
    /// Datacenters that produced a sample.
    pub observed: Vec<Datacenter>,
    /// Datacenters skipped because the fetch failed or timed out.
    pub failed: Vec<Datacenter>,
    /// Events emitted this round, ordered by datacenter.
    pub events: Vec<OutageEvent>,
    /// Events whose notification could not be delivered.
    pub notify_failures: usize,
}

enum Outcome {
    Observed {
        event: Option<OutageEvent>,
        notified: bool,
    },
    FetchFailed,
}

/// Polls the radar for one service across a set of datacenters.
///
/// # Example
///
/// ```rust,no_run
/// use std::time::Duration;
/// use radar_adapters::arvan::RadarAdapter;
/// use radar_notif::{ConsoleNotifier, Monitor, NotifierGroup};
/// use radar_types::Service;
///
/// # tokio_test::block_on(async {
/// let fetcher = RadarAdapter::builder().build().unwrap();
/// let monitor = Monitor::builder(Service::Google, fetcher)
///     .notifier(NotifierGroup::new().with(ConsoleNotifier::new()))
///     .interval(Duration::from_secs(60))
///     .build();
///
/// monitor.run(async { tokio::signal::ctrl_c().await.ok(); }).await;
/// # });
/// ```
#[derive(Debug)]
pub struct Monitor {
    fetcher: Arc<dyn StatsFetcher>,
    notifier: Arc<dyn Notifier>,
    tracker: Arc<OutageTracker>,
    service: Service,
    datacenters: Vec<Datacenter>,
    interval: Duration,
    fetch_timeout: Duration,
    align_to_minute: bool,
}

impl Monitor {
    /// Create a builder for monitoring `service` with `fetcher`.
    pub fn builder(service: Service, fetcher: impl StatsFetcher + 'static) -> MonitorBuilder {
        MonitorBuilder::new(service, Arc::new(fetcher))
    }

    pub fn service(&self) -> Service {
        self.service
    }

    pub fn datacenters(&self) -> &[Datacenter] {
        &self.datacenters
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn tracker(&self) -> &OutageTracker {
        &self.tracker
    }

    /// Run one round over all datacenters and wait for it to finish.
    pub async fn run_round(&self) -> RoundReport {
        let mut tasks = JoinSet::new();

        for datacenter in &self.datacenters {
            let fetcher = self.fetcher.clone();
            let notifier = self.notifier.clone();
            let tracker = self.tracker.clone();
            let datacenter = datacenter.clone();
            let service = self.service;
            let fetch_timeout = self.fetch_timeout;

            tasks.spawn(async move {
                let outcome = check_datacenter(
                    fetcher.as_ref(),
                    notifier.as_ref(),
                    &tracker,
                    &datacenter,
                    service,
                    fetch_timeout,
                )
                .await;
                (datacenter, outcome)
            });
        }

        let mut report = RoundReport::default();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((datacenter, Outcome::Observed { event, notified })) => {
                    if let Some(event) = event {
                        if !notified {
                            report.notify_failures += 1;
                        }
                        report.events.push(event);
                    }
                    report.observed.push(datacenter);
                }
                Ok((datacenter, Outcome::FetchFailed)) => report.failed.push(datacenter),
                Err(e) => warn!(error = %e, "Datacenter check task failed"),
            }
        }

        report.observed.sort();
        report.failed.sort();
        report.events.sort_by(|a, b| a.datacenter().cmp(b.datacenter()));
        report
    }

    /// Poll until `shutdown` resolves.
    ///
    /// A round in flight is always allowed to finish; shutdown takes effect
    /// while waiting for the next one.
    pub async fn run(&self, shutdown: impl Future<Output = ()>) {
        tokio::pin!(shutdown);

        if self.align_to_minute {
            let wait = duration_until_next_minute(SystemTime::now());
            debug!(wait_ms = wait.as_millis() as u64, "Waiting for the next minute");
            tokio::select! {
                _ = tokio::time::sleep(wait) => {}
                _ = &mut shutdown => {
                    info!("Shutting down");
                    return;
                }
            }
        }

        let mut round: u64 = 0;
        loop {
            round += 1;
            info!(round, service = %self.service, "Checking {} datacenters", self.datacenters.len());

            let report = self.run_round().await;
            info!(
                round,
                observed = report.observed.len(),
                failed = report.failed.len(),
                events = report.events.len(),
                "Round complete"
            );

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = &mut shutdown => {
                    info!("Shutting down");
                    return;
                }
            }
        }
    }
}

async fn check_datacenter(
    fetcher: &dyn StatsFetcher,
    notifier: &dyn Notifier,
    tracker: &OutageTracker,
    datacenter: &Datacenter,
    service: Service,
    fetch_timeout: Duration,
) -> Outcome {
    let fetched = tokio::time::timeout(fetch_timeout, fetcher.fetch(datacenter, service))
        .await
        .unwrap_or(Err(FetchError::Timeout));

    let sample = match fetched {
        Ok(sample) => sample,
        Err(e) => {
            warn!(datacenter = %datacenter, error = %e, "Statistics unavailable");
            return Outcome::FetchFailed;
        }
    };

    debug!(datacenter = %datacenter, value = sample.value(), "Sample");

    // Held until the notification is out so no other sample for this
    // datacenter can interleave between the decision and its report.
    let mut guard = tracker.lock(datacenter).await;
    let event = guard.observe(service, sample.is_accessible());

    let mut notified = true;
    if let Some(event) = &event {
        info!(datacenter = %datacenter, "{}", event);
        if let Err(e) = notifier.notify(event.title(), &event.message()).await {
            warn!(datacenter = %datacenter, error = %e, "Notification failed");
            notified = false;
        }
    }
    drop(guard);

    Outcome::Observed { event, notified }
}

/// Time left until the next wall-clock minute boundary.
pub fn duration_until_next_minute(now: SystemTime) -> Duration {
    let since_epoch = now.duration_since(UNIX_EPOCH).unwrap_or_default();
    let into_minute = Duration::new(since_epoch.as_secs() % 60, since_epoch.subsec_nanos());
    Duration::from_secs(60) - into_minute
}

/// Builder for [`Monitor`].
#[derive(Debug)]
pub struct MonitorBuilder {
    service: Service,
    fetcher: Arc<dyn StatsFetcher>,
    notifier: Option<Arc<dyn Notifier>>,
    datacenters: Option<Vec<Datacenter>>,
    policy: OutagePolicy,
    interval: Option<Duration>,
    fetch_timeout: Option<Duration>,
    align_to_minute: bool,
}

impl MonitorBuilder {
    fn new(service: Service, fetcher: Arc<dyn StatsFetcher>) -> Self {
        Self {
            service,
            fetcher,
            notifier: None,
            datacenters: None,
            policy: OutagePolicy::default(),
            interval: None,
            fetch_timeout: None,
            align_to_minute: false,
        }
    }

    /// Where events are delivered (default: an empty [`NotifierGroup`]).
    pub fn notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Some(Arc::new(notifier));
        self
    }

    /// Datacenters to poll (default: [`Datacenter::known`]).
    pub fn datacenters(mut self, datacenters: impl IntoIterator<Item = Datacenter>) -> Self {
        self.datacenters = Some(datacenters.into_iter().collect());
        self
    }

    /// Outage threshold policy (default: 3 failures, inclusive).
    pub fn policy(mut self, policy: OutagePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Delay between the end of one round and the start of the next (default: 1 minute).
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = Some(interval);
        self
    }

    /// Upper bound on a single fetch (default: 10 seconds).
    pub fn fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = Some(timeout);
        self
    }

    /// Start the first round on a minute boundary.
    pub fn align_to_minute(mut self, align: bool) -> Self {
        self.align_to_minute = align;
        self
    }

    pub fn build(self) -> Monitor {
        let mut datacenters = self.datacenters.unwrap_or_else(Datacenter::known);
        let mut seen = BTreeSet::new();
        datacenters.retain(|dc| seen.insert(dc.clone()));
        let tracker = OutageTracker::with_datacenters(self.policy, datacenters.iter().cloned());

        Monitor {
            fetcher: self.fetcher,
            notifier: self
                .notifier
                .unwrap_or_else(|| Arc::new(NotifierGroup::new())),
            tracker: Arc::new(tracker),
            service: self.service,
            datacenters,
            interval: self.interval.unwrap_or(Duration::from_secs(60)),
            fetch_timeout: self.fetch_timeout.unwrap_or(Duration::from_secs(10)),
            align_to_minute: self.align_to_minute,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_until_next_minute() {
        let at = |secs: u64, millis: u64| {
            UNIX_EPOCH + Duration::from_secs(secs) + Duration::from_millis(millis)
        };

        assert_eq!(duration_until_next_minute(at(120, 0)), Duration::from_secs(60));
        assert_eq!(duration_until_next_minute(at(125, 0)), Duration::from_secs(55));
        assert_eq!(
            duration_until_next_minute(at(179, 500)),
            Duration::from_millis(500)
        );
    }
}
