// ABOUTME: Realtime synchronization for family membership, join requests and schedule changes
// ABOUTME: Reconnecting event client, notification log, subscriber registry and SSE transport

pub mod client;
pub mod error;
pub mod events;
pub mod notifications;
pub mod reconnect;
pub mod subscribers;
pub mod transport;

pub use client::{ConnectionState, RealtimeSyncClient};
pub use error::{RealtimeError, RealtimeResult};
pub use events::EventKind;
pub use notifications::{Notification, NotificationLog, MAX_NOTIFICATIONS};
pub use reconnect::{BackoffPolicy, ReconnectTimer};
pub use subscribers::{EventHandler, SubscriberRegistry, SubscriptionToken};
pub use transport::{EventFrame, EventStream, EventTransport, SseParser, SseTransport};
