// ABOUTME: Periodically re-resolves a member's shift and publishes the latest snapshot
// ABOUTME: Request tokens discard results that finish after a newer resolution started

use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use choreboard_core::{week_start_of, ShiftInfo};

use crate::shift::ShiftResolver;

/// Default interval between shift re-resolutions
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Source of "now" in household-local time
pub type Clock = Arc<dyn Fn() -> NaiveDateTime + Send + Sync>;

pub fn local_clock() -> Clock {
    Arc::new(|| Local::now().naive_local())
}

/// Hands out monotonically increasing request tokens
#[derive(Debug, Default)]
pub struct RequestTracker {
    latest: AtomicU64,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a token newer than every token issued before it
    pub fn next(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Whether `token` is still the most recently issued one
    pub fn is_current(&self, token: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == token
    }
}

/// Result of one resolution. When the week could not be fetched, `info` is
/// empty and `error` carries the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftSnapshot {
    pub token: u64,
    pub computed_at: NaiveDateTime,
    pub info: Option<ShiftInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ShiftSnapshot {
    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}

struct PollerShared {
    resolver: ShiftResolver,
    user_id: String,
    clock: Clock,
    tracker: RequestTracker,
    tx: watch::Sender<Option<ShiftSnapshot>>,
}

impl PollerShared {
    async fn resolve_once(&self) {
        let token = self.tracker.next();
        let now = (self.clock)();
        let week_start = week_start_of(now.date());

        let snapshot = match self.resolver.source().fetch_week(week_start).await {
            Ok(week) => ShiftSnapshot {
                token,
                computed_at: now,
                info: self.resolver.resolve(now, &self.user_id, &week).await,
                error: None,
            },
            Err(e) => {
                warn!("Failed to fetch week {} for shift poll: {}", week_start, e);
                ShiftSnapshot {
                    token,
                    computed_at: now,
                    info: None,
                    error: Some(e.to_string()),
                }
            }
        };

        if !self.tracker.is_current(token) {
            debug!("Discarding stale shift resolution {}", token);
            return;
        }

        self.tx.send_replace(Some(snapshot));
    }
}

/// Owns the recurring shift poll. Dropping the poller stops it, along with
/// any refresh still in flight.
pub struct ShiftPoller {
    shared: Arc<PollerShared>,
    ticker: JoinHandle<()>,
    refresh: Mutex<Option<JoinHandle<()>>>,
}

impl ShiftPoller {
    pub fn start(resolver: ShiftResolver, user_id: impl Into<String>, interval: Duration) -> Self {
        Self::start_with_clock(resolver, user_id, interval, local_clock())
    }

    /// Start polling with an injected clock. The first resolution runs immediately.
    pub fn start_with_clock(
        resolver: ShiftResolver,
        user_id: impl Into<String>,
        interval: Duration,
        clock: Clock,
    ) -> Self {
        let (tx, _rx) = watch::channel(None);
        let shared = Arc::new(PollerShared {
            resolver,
            user_id: user_id.into(),
            clock,
            tracker: RequestTracker::new(),
            tx,
        });

        info!(
            "Starting shift poller for {} every {}s",
            shared.user_id,
            interval.as_secs()
        );

        let task_shared = Arc::clone(&shared);
        let ticker = tokio::spawn(async move {
            let mut interval = tokio::time::interval(interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                task_shared.resolve_once().await;
            }
        });

        Self {
            shared,
            ticker,
            refresh: Mutex::new(None),
        }
    }

    /// Re-resolve now, outside the regular cadence. A refresh still running
    /// is aborted since its result would be discarded anyway.
    pub fn refresh(&self) {
        let shared = Arc::clone(&self.shared);
        let handle = tokio::spawn(async move {
            shared.resolve_once().await;
        });

        let previous = self
            .refresh
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(handle);
        if let Some(previous) = previous {
            previous.abort();
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<ShiftSnapshot>> {
        self.shared.tx.subscribe()
    }

    pub fn latest(&self) -> Option<ShiftSnapshot> {
        self.shared.tx.borrow().clone()
    }

    pub fn stop(&self) {
        self.ticker.abort();
        let pending = self
            .refresh
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = pending {
            handle.abort();
        }
    }
}

impl Drop for ShiftPoller {
    fn drop(&mut self) {
        self.stop();
    }
}
