// ABOUTME: Reconnecting realtime client that feeds the notification log and subscribers
// ABOUTME: Background tasks hold weak references so dropping the client tears everything down

use futures::future::BoxFuture;
use futures::{FutureExt, StreamExt};
use serde::Serialize;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use choreboard_config::ClientConfig;

use crate::error::{RealtimeError, RealtimeResult};
use crate::events::EventKind;
use crate::notifications::{Notification, NotificationLog};
use crate::reconnect::{BackoffPolicy, ReconnectTimer};
use crate::subscribers::{EventHandler, SubscriberRegistry, SubscriptionToken};
use crate::transport::{EventStream, EventTransport, SseTransport};

const NOTIFICATION_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

struct Inner {
    transport: Arc<dyn EventTransport>,
    policy: BackoffPolicy,
    state_tx: watch::Sender<ConnectionState>,
    token: Mutex<Option<String>>,
    attempts: AtomicU32,
    manual_disconnect: AtomicBool,
    /// Bumped for every opened stream so a superseded reader cannot act
    session: AtomicU64,
    timer: ReconnectTimer,
    reader: Mutex<Option<JoinHandle<()>>>,
    subscribers: SubscriberRegistry,
    notifications: Mutex<NotificationLog>,
    notification_tx: broadcast::Sender<Notification>,
}

impl Inner {
    fn state(&self) -> ConnectionState {
        *self.state_tx.borrow()
    }

    fn set_state(&self, state: ConnectionState) {
        let previous = self.state_tx.send_replace(state);
        if previous != state {
            debug!("Realtime connection {:?} -> {:?}", previous, state);
        }
    }

    fn stop_reader(&self) {
        if let Some(handle) = lock(&self.reader).take() {
            handle.abort();
        }
    }

    fn dispatch(&self, event: &str, data: &Value) {
        let kind = match EventKind::from_name(event) {
            Some(kind) => kind,
            None => {
                debug!("Forwarding unrecognized event {}", event);
                self.subscribers.emit(event, data);
                return;
            }
        };

        if kind.creates_notification() {
            let notification =
                Notification::new(kind.name(), kind.notification_message(data), data.clone());
            lock(&self.notifications).add(notification.clone());
            // No receivers is fine
            let _ = self.notification_tx.send(notification);
        }

        if kind.fans_out() {
            let delivered = self.subscribers.emit(event, data);
            debug!("Dispatched {} to {} subscriber(s)", event, delivered);
        }
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        self.stop_reader();
        self.timer.cancel();
    }
}

/// Try to open the stream once, scheduling a reconnect on failure
fn attempt_connect(inner: Arc<Inner>) -> BoxFuture<'static, ()> {
    async move {
        if inner.manual_disconnect.load(Ordering::SeqCst) {
            return;
        }

        let token = lock(&inner.token).clone();
        let token = match token {
            Some(token) => token,
            None => {
                inner.set_state(ConnectionState::Disconnected);
                return;
            }
        };

        inner.set_state(ConnectionState::Connecting);

        match inner.transport.open(&token).await {
            Ok(stream) => {
                if inner.manual_disconnect.load(Ordering::SeqCst) {
                    return;
                }
                inner.timer.cancel();
                inner.attempts.store(0, Ordering::SeqCst);
                inner.set_state(ConnectionState::Connected);
                info!("Realtime connection established");

                let session = inner.session.fetch_add(1, Ordering::SeqCst) + 1;
                let reader = tokio::spawn(read_events(Arc::downgrade(&inner), stream, session));
                if let Some(previous) = lock(&inner.reader).replace(reader) {
                    previous.abort();
                }
            }
            Err(e) => {
                warn!("Realtime connection failed: {}", e);
                schedule_reconnect(&inner);
            }
        }
    }
    .boxed()
}

fn schedule_reconnect(inner: &Arc<Inner>) {
    if inner.manual_disconnect.load(Ordering::SeqCst) {
        return;
    }

    let attempts = inner.attempts.load(Ordering::SeqCst);
    if inner.policy.is_exhausted(attempts) {
        warn!(
            "Giving up on realtime connection after {} reconnect attempts",
            attempts
        );
        inner.set_state(ConnectionState::Disconnected);
        return;
    }

    if inner.timer.is_pending() {
        return;
    }

    let attempt = attempts + 1;
    let delay = inner.policy.delay(attempt);
    let weak = Arc::downgrade(inner);
    let scheduled = inner.timer.schedule(delay, async move {
        if let Some(inner) = weak.upgrade() {
            attempt_connect(inner).await;
        }
    });

    if scheduled {
        inner.attempts.store(attempt, Ordering::SeqCst);
        inner.set_state(ConnectionState::Connecting);
        info!(
            "Reconnecting in {}ms (attempt {}/{})",
            delay.as_millis(),
            attempt,
            inner.policy.max_attempts
        );
    }
}

async fn read_events(inner: Weak<Inner>, mut stream: EventStream, session: u64) {
    while let Some(item) = stream.next().await {
        let Some(inner) = inner.upgrade() else {
            return;
        };
        match item {
            Ok(frame) => inner.dispatch(&frame.event, &frame.data),
            Err(e) => {
                warn!("Realtime stream error: {}", e);
                break;
            }
        }
    }

    let Some(inner) = inner.upgrade() else {
        return;
    };
    if inner.session.load(Ordering::SeqCst) != session
        || inner.manual_disconnect.load(Ordering::SeqCst)
    {
        return;
    }

    info!("Realtime connection lost");
    // This task is the reader being replaced
    lock(&inner.reader).take();
    inner.set_state(ConnectionState::Connecting);
    schedule_reconnect(&inner);
}

/// Realtime client for family, join-request and schedule events.
///
/// Keeps one event stream open, reconnecting with exponential backoff when
/// it drops. Every recognised event may add a [`Notification`] to a bounded
/// log and is fanned out to the handlers registered with [`on`](Self::on).
pub struct RealtimeSyncClient {
    inner: Arc<Inner>,
}

impl RealtimeSyncClient {
    pub fn new(transport: Arc<dyn EventTransport>, policy: BackoffPolicy) -> Self {
        let (state_tx, _) = watch::channel(ConnectionState::Disconnected);
        let (notification_tx, _) = broadcast::channel(NOTIFICATION_CHANNEL_CAPACITY);

        Self {
            inner: Arc::new(Inner {
                transport,
                policy,
                state_tx,
                token: Mutex::new(None),
                attempts: AtomicU32::new(0),
                manual_disconnect: AtomicBool::new(false),
                session: AtomicU64::new(0),
                timer: ReconnectTimer::new(),
                reader: Mutex::new(None),
                subscribers: SubscriberRegistry::new(),
                notifications: Mutex::new(NotificationLog::new()),
                notification_tx,
            }),
        }
    }

    /// Client using the server-sent events transport at `config.events_url`
    pub fn from_config(config: &ClientConfig) -> RealtimeResult<Self> {
        let transport = SseTransport::new(config.events_url.clone(), config.http_timeout)?;
        Ok(Self::new(
            Arc::new(transport),
            BackoffPolicy::with_max_attempts(config.max_reconnect_attempts),
        ))
    }

    /// Connect with `token`.
    ///
    /// Does nothing when already connected. Transport failures are not
    /// returned; they move the client to `Connecting` and schedule a
    /// reconnect. Calling this after reconnects were exhausted starts over
    /// with a fresh attempt budget.
    pub async fn connect(&self, token: &str) -> RealtimeResult<()> {
        let token = token.trim();
        if token.is_empty() {
            return Err(RealtimeError::MissingCredential);
        }

        if self.inner.state() == ConnectionState::Connected {
            debug!("Already connected, ignoring connect");
            return Ok(());
        }

        *lock(&self.inner.token) = Some(token.to_string());
        self.inner.manual_disconnect.store(false, Ordering::SeqCst);
        self.inner.attempts.store(0, Ordering::SeqCst);
        self.inner.timer.cancel();

        attempt_connect(Arc::clone(&self.inner)).await;
        Ok(())
    }

    /// Close the stream and stay disconnected
    pub fn disconnect(&self) {
        self.inner.manual_disconnect.store(true, Ordering::SeqCst);
        self.inner.timer.cancel();
        self.inner.session.fetch_add(1, Ordering::SeqCst);
        self.inner.stop_reader();
        *lock(&self.inner.token) = None;
        self.inner.set_state(ConnectionState::Disconnected);
        info!("Realtime client disconnected");
    }

    pub fn state(&self) -> ConnectionState {
        self.inner.state()
    }

    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    pub fn watch_state(&self) -> watch::Receiver<ConnectionState> {
        self.inner.state_tx.subscribe()
    }

    pub fn reconnect_attempts(&self) -> u32 {
        self.inner.attempts.load(Ordering::SeqCst)
    }

    pub fn has_pending_reconnect(&self) -> bool {
        self.inner.timer.is_pending()
    }

    pub fn on(&self, event: &str, handler: EventHandler) -> SubscriptionToken {
        self.inner.subscribers.on(event, handler)
    }

    pub fn off(&self, event: &str, token: Option<SubscriptionToken>) -> usize {
        self.inner.subscribers.off(event, token)
    }

    /// Apply an event as if the server had pushed it
    pub fn handle_event(&self, event: &str, data: &Value) {
        self.inner.dispatch(event, data);
    }

    /// Newest first
    pub fn notifications(&self) -> Vec<Notification> {
        lock(&self.inner.notifications).entries()
    }

    /// Receive notifications as they are added to the log
    pub fn subscribe_notifications(&self) -> broadcast::Receiver<Notification> {
        self.inner.notification_tx.subscribe()
    }

    pub fn unread_count(&self) -> usize {
        lock(&self.inner.notifications).unread_count()
    }

    pub fn mark_as_read(&self, id: &str) -> bool {
        lock(&self.inner.notifications).mark_as_read(id)
    }

    pub fn mark_all_as_read(&self) {
        lock(&self.inner.notifications).mark_all_as_read();
    }

    pub fn clear_notifications(&self) {
        lock(&self.inner.notifications).clear();
    }
}
