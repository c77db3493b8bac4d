//! Monitor facade: owns the arbitrator, the feed client, and the poller
//! tasks, and exposes the surface the rest of the dashboard uses.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use alert_audio::{AlertSynth, ToneOutput};
use hazard_core::{EewEvent, EewIssueKind, FeedType, RawEventRecord};
use quake_feed::{FeedClient, FeedError};

use crate::arbitrator::{ApplyOutcome, Arbitrator};
use crate::poller;
use crate::state::MonitorSnapshot;

/// Place name injected by the test controller.
const TEST_EPICENTER: &str = "SIMULATED DRILL";

struct Inner {
    arbitrator: Mutex<Arbitrator>,
    client: FeedClient,
    tasks: std::sync::Mutex<Vec<JoinHandle<()>>>,
}

/// The alert monitor.
///
/// Cheap to clone; clones share the same state and tasks. All mutation of
/// the monitor state funnels through the arbitrator behind one mutex, so
/// updates for a feed type are never processed concurrently.
#[derive(Clone)]
pub struct Monitor {
    inner: Arc<Inner>,
}

impl Monitor {
    /// Create a monitor. Pollers are not running until [`Monitor::start`].
    pub fn new(client: FeedClient, output: Arc<dyn ToneOutput>) -> Self {
        Self {
            inner: Arc::new(Inner {
                arbitrator: Mutex::new(Arbitrator::new(AlertSynth::new(output))),
                client,
                tasks: std::sync::Mutex::new(Vec::new()),
            }),
        }
    }

    /// Create a monitor with feed configuration from environment variables.
    pub fn from_env(output: Arc<dyn ToneOutput>) -> Result<Self, FeedError> {
        Ok(Self::new(FeedClient::from_env()?, output))
    }

    /// Start the poller tasks (EEW, quake/tsunami, display rotation).
    pub fn start(&self) {
        let mut tasks = self.inner.tasks.lock().expect("task list lock poisoned");
        if !tasks.is_empty() {
            warn!("monitor already started");
            return;
        }
        tasks.extend(poller::spawn_all(self.clone()));
        info!("monitor started");
    }

    /// Stop the monitor: abort all poller tasks. State stays readable.
    pub fn shutdown(&self) {
        let mut tasks = self.inner.tasks.lock().expect("task list lock poisoned");
        for task in tasks.drain(..) {
            task.abort();
        }
        info!("monitor stopped");
    }

    /// Read-only snapshot for the UI projection.
    pub async fn snapshot(&self) -> MonitorSnapshot {
        self.inner.arbitrator.lock().await.state().snapshot()
    }

    /// Whether test mode is currently active.
    pub async fn test_mode(&self) -> bool {
        self.inner.arbitrator.lock().await.state().test_mode
    }

    /// Current quake/tsunami poll cadence. The poller re-reads this at the
    /// start of every cycle.
    pub async fn poll_cadence_ms(&self) -> u64 {
        self.inner.arbitrator.lock().await.state().poll_cadence_ms
    }

    /// The arbitrator's single update entry point. Poll results and test
    /// injections are delivered here; tests may call it directly.
    pub async fn apply_record(&self, record: &RawEventRecord, now: DateTime<Utc>) -> ApplyOutcome {
        self.inner.arbitrator.lock().await.apply_raw(record, now)
    }

    /// Poll all feeds now, concurrently, and wait for all of them.
    ///
    /// Used for the dashboard-wide "force sync" action and by
    /// [`Monitor::exit_test`]. Independent of the scheduled timers (does not
    /// reset them) and a no-op while test mode is active.
    pub async fn manual_refresh(&self) {
        debug!("manual refresh requested");
        self.poll_cycle(&FeedType::ALL).await;
    }

    /// One poll cycle over the given feeds. Fetches run concurrently and
    /// outside the state lock; results are applied serially. Skipped
    /// entirely while test mode is active so resuming produces no burst of
    /// stale results.
    pub(crate) async fn poll_cycle(&self, feeds: &[FeedType]) {
        if self.test_mode().await {
            debug!("test mode active, skipping poll cycle");
            return;
        }

        let fetched = match feeds {
            [a] => vec![self.inner.client.poll(*a).await],
            [a, b] => {
                let (ra, rb) = tokio::join!(self.inner.client.poll(*a), self.inner.client.poll(*b));
                vec![ra, rb]
            }
            [a, b, c] => {
                let (ra, rb, rc) = tokio::join!(
                    self.inner.client.poll(*a),
                    self.inner.client.poll(*b),
                    self.inner.client.poll(*c)
                );
                vec![ra, rb, rc]
            }
            _ => Vec::new(),
        };

        let now = Utc::now();
        let mut arbitrator = self.inner.arbitrator.lock().await;
        if arbitrator.state().test_mode {
            // Test mode was entered while the fetches were in flight.
            return;
        }
        for record in fetched.into_iter().flatten() {
            let outcome = arbitrator.apply_raw(&record, now);
            debug!(feed = %record.feed_type(), ?outcome, "poll result applied");
        }
        // Even an empty cycle re-resolves display and cadence against now.
        arbitrator.heartbeat(now);
    }

    /// Rotation timer tick.
    pub(crate) async fn rotation_tick(&self, now: DateTime<Utc>) {
        self.inner.arbitrator.lock().await.rotation_tick(now);
    }

    /// Enter test mode: suspend polling and inject one synthetic emergency
    /// EEW through the normal dedup/fire path, so it plays audio exactly
    /// once and forces the display to EEW.
    pub async fn enter_test(&self) {
        let now = Utc::now();
        let mut arbitrator = self.inner.arbitrator.lock().await;
        if arbitrator.state().test_mode {
            warn!("test mode already active");
            return;
        }
        let record = RawEventRecord::Eew(EewEvent {
            occurred_at: now,
            epicenter_raw: TEST_EPICENTER.to_string(),
            cancelled: false,
            issue_kind: EewIssueKind::Warning,
        });
        arbitrator.enter_test(&record, now);
    }

    /// Exit test mode: clear the synthetic state, resume polling, and issue
    /// one manual poll so live data returns immediately instead of waiting
    /// for the next scheduled tick.
    pub async fn exit_test(&self) {
        {
            let mut arbitrator = self.inner.arbitrator.lock().await;
            if !arbitrator.state().test_mode {
                return;
            }
            arbitrator.exit_test(Utc::now());
        }
        self.manual_refresh().await;
    }

    /// Subscribe to a dashboard-wide resync signal. Each received signal
    /// triggers the manual-refresh path. The listener stops when the sender
    /// side is dropped or on [`Monitor::shutdown`].
    pub fn listen_resync(&self, mut signals: mpsc::Receiver<()>) {
        let monitor = self.clone();
        let task = tokio::spawn(async move {
            while signals.recv().await.is_some() {
                info!("resync signal received");
                monitor.manual_refresh().await;
            }
            debug!("resync channel closed");
        });
        self.inner
            .tasks
            .lock()
            .expect("task list lock poisoned")
            .push(task);
    }
}

impl std::fmt::Debug for Monitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Monitor")
            .field("client", &self.inner.client)
            .finish()
    }
}
