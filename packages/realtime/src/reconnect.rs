// ABOUTME: Exponential reconnect backoff and the single-slot reconnect timer
// ABOUTME: At most one reconnect is ever pending; dropping the timer cancels it

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

pub const INITIAL_DELAY_MS: u64 = 1_000;
pub const MAX_DELAY_MS: u64 = 30_000;
pub const DEFAULT_MAX_RECONNECT_ATTEMPTS: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub max_attempts: u32,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            initial_delay_ms: INITIAL_DELAY_MS,
            max_delay_ms: MAX_DELAY_MS,
            max_attempts: DEFAULT_MAX_RECONNECT_ATTEMPTS,
        }
    }
}

impl BackoffPolicy {
    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Self::default()
        }
    }

    /// Delay in milliseconds before reconnect attempt number `attempt`
    pub fn calculate_delay(&self, attempt: u32) -> u64 {
        let factor = 2u64.checked_pow(attempt).unwrap_or(u64::MAX);
        self.initial_delay_ms
            .saturating_mul(factor)
            .min(self.max_delay_ms)
    }

    pub fn delay(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.calculate_delay(attempt))
    }

    /// Whether `attempts` already reconnects have been used up
    pub fn is_exhausted(&self, attempts: u32) -> bool {
        attempts >= self.max_attempts
    }
}

#[derive(Default)]
struct TimerSlot {
    handle: Option<JoinHandle<()>>,
    generation: u64,
}

/// Runs one delayed action at a time
#[derive(Default)]
pub struct ReconnectTimer {
    slot: Arc<Mutex<TimerSlot>>,
}

fn lock(slot: &Mutex<TimerSlot>) -> MutexGuard<'_, TimerSlot> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ReconnectTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `action` after `delay`. Returns false without scheduling anything
    /// if an action is already pending.
    pub fn schedule<F>(&self, delay: Duration, action: F) -> bool
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut slot = lock(&self.slot);
        if slot.handle.is_some() {
            debug!("Reconnect already pending, ignoring schedule request");
            return false;
        }

        slot.generation += 1;
        let generation = slot.generation;
        let task_slot = Arc::clone(&self.slot);

        slot.handle = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            {
                let mut slot = lock(&task_slot);
                if slot.generation != generation {
                    return;
                }
                slot.handle = None;
            }
            action.await;
        }));
        true
    }

    /// Cancel the pending action, if any. Returns whether one was pending.
    pub fn cancel(&self) -> bool {
        let mut slot = lock(&self.slot);
        slot.generation += 1;
        match slot.handle.take() {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        lock(&self.slot).handle.is_some()
    }
}

impl Drop for ReconnectTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
