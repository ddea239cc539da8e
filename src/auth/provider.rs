//! Session-change subscription capability.

use crate::auth::session::Session;
use parking_lot::{Mutex, ReentrantMutex};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver};

/// Handle returned by [`AuthProvider::subscribe`].
pub type SubscriptionId = u64;

/// Callback invoked with the new session state on every change.
pub type SessionHandler = Arc<dyn Fn(Option<Session>) + Send + Sync>;

/// Source of session-state notifications.
///
/// A fresh subscriber is told the current state right away, so the first
/// notification doubles as the initial-load signal.
pub trait AuthProvider: Send + Sync {
    fn subscribe(&self, handler: SessionHandler) -> SubscriptionId;

    /// Returns false when the id was not (or no longer) subscribed.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;

    fn current_session(&self) -> Option<Session>;
}

/// Subscribe and forward every notification onto an unbounded channel.
pub fn subscribe_channel(
    provider: &dyn AuthProvider,
) -> (SubscriptionId, UnboundedReceiver<Option<Session>>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let id = provider.subscribe(Arc::new(move |session: Option<Session>| {
        // Receiver gone means the consumer shut down.
        let _ = tx.send(session);
    }));
    (id, rx)
}

struct HubInner {
    current: Option<Session>,
    handlers: Vec<(SubscriptionId, SessionHandler)>,
    next_id: SubscriptionId,
}

/// Notifications waiting to be handed to their recipients, oldest first.
#[derive(Default)]
struct Delivery {
    queue: VecDeque<(Option<Session>, Vec<SessionHandler>)>,
    draining: bool,
}

/// Shared bookkeeping for providers: current session plus registered handlers.
///
/// State changes and their deliveries happen under one reentrant lock, so every
/// subscriber sees notifications in the order the state changed. A handler may
/// call back into the hub; anything it publishes is queued behind the
/// notification being delivered.
pub struct SessionHub {
    inner: Mutex<HubInner>,
    delivery: ReentrantMutex<RefCell<Delivery>>,
}

impl Default for SessionHub {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionHub {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(HubInner {
                current: None,
                handlers: Vec::new(),
                next_id: 1,
            }),
            delivery: ReentrantMutex::new(RefCell::new(Delivery::default())),
        }
    }

    /// Hub that starts out signed in, for demos and tests.
    pub fn with_session(session: Session) -> Self {
        let hub = Self::new();
        hub.inner.lock().current = Some(session);
        hub
    }

    /// Record a new session state and notify every subscriber.
    pub fn publish(&self, session: Option<Session>) {
        let delivery = self.delivery.lock();
        let handlers: Vec<SessionHandler> = {
            let mut inner = self.inner.lock();
            inner.current = session.clone();
            inner
                .handlers
                .iter()
                .map(|(_, handler)| Arc::clone(handler))
                .collect()
        };

        log::debug!(
            "session changed: {}, notifying {} subscriber(s)",
            if session.is_some() { "present" } else { "absent" },
            handlers.len()
        );

        delivery.borrow_mut().queue.push_back((session, handlers));
        Self::drain(&delivery);
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().handlers.len()
    }

    /// Deliver queued notifications unless an outer call on this thread is
    /// already doing so. The `RefCell` borrow is never held across a handler.
    fn drain(delivery: &RefCell<Delivery>) {
        if std::mem::replace(&mut delivery.borrow_mut().draining, true) {
            return;
        }
        loop {
            let next = delivery.borrow_mut().queue.pop_front();
            let Some((session, handlers)) = next else {
                break;
            };
            for handler in handlers {
                handler(session.clone());
            }
        }
        delivery.borrow_mut().draining = false;
    }
}

impl AuthProvider for SessionHub {
    fn subscribe(&self, handler: SessionHandler) -> SubscriptionId {
        let delivery = self.delivery.lock();
        let (id, current) = {
            let mut inner = self.inner.lock();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.handlers.push((id, Arc::clone(&handler)));
            (id, inner.current.clone())
        };
        delivery.borrow_mut().queue.push_back((current, vec![handler]));
        Self::drain(&delivery);
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut inner = self.inner.lock();
        let before = inner.handlers.len();
        inner.handlers.retain(|(handler_id, _)| *handler_id != id);
        inner.handlers.len() != before
    }

    fn current_session(&self) -> Option<Session> {
        self.inner.lock().current.clone()
    }
}
