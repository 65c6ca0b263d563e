// ABOUTME: Per-event subscriber registry with token based unsubscription
// ABOUTME: Registering the same handler twice for an event is a no-op

use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

pub type EventHandler = Arc<dyn Fn(&Value) + Send + Sync>;

/// Handle returned by [`SubscriberRegistry::on`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionToken(u64);

#[derive(Default)]
pub struct SubscriberRegistry {
    next_id: AtomicU64,
    subscribers: RwLock<HashMap<String, Vec<(SubscriptionToken, EventHandler)>>>,
}

fn same_handler(a: &EventHandler, b: &EventHandler) -> bool {
    std::ptr::eq(Arc::as_ptr(a) as *const (), Arc::as_ptr(b) as *const ())
}

impl SubscriberRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `handler` to `event`. Returns the existing token if this
    /// exact handler is already subscribed to the event.
    pub fn on(&self, event: &str, handler: EventHandler) -> SubscriptionToken {
        let mut subscribers = self
            .subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let handlers = subscribers.entry(event.to_string()).or_default();

        if let Some((token, _)) = handlers.iter().find(|(_, h)| same_handler(h, &handler)) {
            return *token;
        }

        let token = SubscriptionToken(self.next_id.fetch_add(1, Ordering::Relaxed));
        handlers.push((token, handler));
        token
    }

    /// Remove one subscription, or every subscription to `event` when
    /// `token` is `None`. Returns how many were removed.
    pub fn off(&self, event: &str, token: Option<SubscriptionToken>) -> usize {
        let mut subscribers = self
            .subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        let removed = match token {
            None => subscribers.remove(event).map(|h| h.len()).unwrap_or(0),
            Some(token) => match subscribers.get_mut(event) {
                Some(handlers) => {
                    let before = handlers.len();
                    handlers.retain(|(t, _)| *t != token);
                    before - handlers.len()
                }
                None => 0,
            },
        };

        if subscribers.get(event).is_some_and(Vec::is_empty) {
            subscribers.remove(event);
        }
        removed
    }

    /// Call every handler for `event` in registration order.
    /// Handlers run outside the lock so they may subscribe or unsubscribe.
    pub fn emit(&self, event: &str, data: &Value) -> usize {
        let handlers: Vec<EventHandler> = {
            let subscribers = self
                .subscribers
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            match subscribers.get(event) {
                Some(handlers) => handlers.iter().map(|(_, h)| Arc::clone(h)).collect(),
                None => return 0,
            }
        };

        for handler in &handlers {
            handler(data);
        }
        handlers.len()
    }

    pub fn count(&self, event: &str) -> usize {
        self.subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(event)
            .map_or(0, Vec::len)
    }
}
