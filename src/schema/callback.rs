/// Event callbacks: ordered, multi-subscriber, zero-argument handles.
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use log::warn;

/// A single subscriber bound to an event.
pub type Subscriber = Rc<dyn Fn()>;

/// An ordered list of zero-argument subscribers invoked together.
///
/// Cloning shares the subscriber handles, so a clone fires the same bindings
/// as the original. Use [`EventCallback::unbound`] for an empty binding.
#[derive(Clone, Default)]
pub struct EventCallback {
    subscribers: Vec<Subscriber>,
}

impl EventCallback {
    /// A callback with no subscribers.
    pub fn unbound() -> Self {
        Self::default()
    }

    /// A callback with a single subscriber.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn() + 'static,
    {
        let mut callback = Self::unbound();
        callback.subscribe(f);
        callback
    }

    /// Append a subscriber. Subscribers fire in subscription order.
    pub fn subscribe<F>(&mut self, f: F)
    where
        F: Fn() + 'static,
    {
        self.subscribers.push(Rc::new(f));
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_bound(&self) -> bool {
        !self.subscribers.is_empty()
    }

    /// True when both callbacks hold the very same subscriber handles.
    pub fn shares_bindings_with(&self, other: &EventCallback) -> bool {
        self.subscribers.len() == other.subscribers.len()
            && self
                .subscribers
                .iter()
                .zip(&other.subscribers)
                .all(|(a, b)| Rc::ptr_eq(a, b))
    }

    /// Invoke every subscriber once, in order.
    ///
    /// A panicking subscriber is caught and logged; the remaining subscribers
    /// still run. Returns the number of subscribers that failed.
    pub fn invoke(&self) -> usize {
        let mut failures = 0;
        for (i, subscriber) in self.subscribers.iter().enumerate() {
            let result = panic::catch_unwind(AssertUnwindSafe(|| subscriber()));
            if let Err(payload) = result {
                failures += 1;
                warn!(
                    "[dialogue] event subscriber {} panicked: {}",
                    i,
                    panic_message(payload.as_ref())
                );
            }
        }
        failures
    }
}

impl fmt::Debug for EventCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventCallback")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        *s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "<non-string panic payload>"
    }
}
