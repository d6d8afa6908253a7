//! Navigation state shared across the dashboard.
//!
//! The original web UI carried the selected session in a URL parameter
//! watched by multiple controllers. Here that surface is an explicit
//! observable: subscribers get `(new, old)` on every change and their
//! registration is released when the [`Subscription`] handle drops.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

type Callback = Rc<RefCell<dyn FnMut(Option<&str>, Option<&str>)>>;

struct RouteInner {
    session_id: Option<String>,
    next_id: u64,
    subscribers: Vec<(u64, Callback)>,
}

/// The routing-state surface: a single `session_id` parameter. Cloning
/// shares the underlying state; all access happens on the UI thread.
#[derive(Clone)]
pub struct RouteParams {
    inner: Rc<RefCell<RouteInner>>,
}

impl RouteParams {
    pub fn new(session_id: Option<String>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(RouteInner {
                session_id,
                next_id: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    pub fn session_id(&self) -> Option<String> {
        self.inner.borrow().session_id.clone()
    }

    /// Updates the parameter and notifies subscribers. Setting the current
    /// value again is a no-op.
    pub fn set_session_id(&self, session_id: Option<String>) {
        let (old, callbacks) = {
            let mut inner = self.inner.borrow_mut();
            if inner.session_id == session_id {
                return;
            }
            let old = std::mem::replace(&mut inner.session_id, session_id.clone());
            let callbacks: Vec<Callback> = inner
                .subscribers
                .iter()
                .map(|(_, callback)| Rc::clone(callback))
                .collect();
            (old, callbacks)
        };
        // inner is released before callbacks run so they may read or
        // subscribe without re-borrowing panics
        for callback in callbacks {
            (&mut *callback.borrow_mut())(session_id.as_deref(), old.as_deref());
        }
    }

    /// Registers a change observer. The callback fires immediately with
    /// the current value (old value `None`), then on every change until
    /// the returned handle is dropped.
    pub fn subscribe<F>(&self, mut callback: F) -> Subscription
    where
        F: FnMut(Option<&str>, Option<&str>) + 'static,
    {
        let current = self.session_id();
        callback(current.as_deref(), None);

        let callback: Callback = Rc::new(RefCell::new(callback));
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.subscribers.push((id, callback));
        Subscription {
            id,
            inner: Rc::downgrade(&self.inner),
        }
    }

    #[cfg(test)]
    fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }
}

/// Keeps a subscription alive; dropping it unsubscribes.
pub struct Subscription {
    id: u64,
    inner: Weak<RefCell<RouteInner>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            inner
                .borrow_mut()
                .subscribers
                .retain(|(id, _)| *id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscriber_sees_initial_value() {
        let route = RouteParams::new(Some("abc123".to_string()));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let _subscription = route.subscribe(move |new, old| {
            sink.borrow_mut()
                .push((new.map(str::to_owned), old.map(str::to_owned)));
        });
        assert_eq!(
            seen.borrow().as_slice(),
            &[(Some("abc123".to_string()), None)]
        );
    }

    #[test]
    fn subscriber_sees_every_change_with_old_value() {
        let route = RouteParams::new(None);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let _subscription = route.subscribe(move |new, old| {
            sink.borrow_mut()
                .push((new.map(str::to_owned), old.map(str::to_owned)));
        });

        route.set_session_id(Some("a".to_string()));
        route.set_session_id(Some("b".to_string()));
        route.set_session_id(None);

        assert_eq!(
            seen.borrow().as_slice(),
            &[
                (None, None),
                (Some("a".to_string()), None),
                (Some("b".to_string()), Some("a".to_string())),
                (None, Some("b".to_string())),
            ]
        );
    }

    #[test]
    fn setting_same_value_does_not_notify() {
        let route = RouteParams::new(Some("a".to_string()));
        let count = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&count);
        let _subscription = route.subscribe(move |_, _| *sink.borrow_mut() += 1);
        assert_eq!(*count.borrow(), 1); // initial delivery

        route.set_session_id(Some("a".to_string()));
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn dropping_subscription_unsubscribes() {
        let route = RouteParams::new(None);
        let count = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&count);
        let subscription = route.subscribe(move |_, _| *sink.borrow_mut() += 1);
        assert_eq!(route.subscriber_count(), 1);

        drop(subscription);
        assert_eq!(route.subscriber_count(), 0);

        route.set_session_id(Some("a".to_string()));
        assert_eq!(*count.borrow(), 1); // only the initial delivery
    }
}
