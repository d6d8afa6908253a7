//! Mirrors the selected session out of the route state for navigation
//! display. Lives for as long as the enclosing view and keeps tracking
//! changes the whole time.

use std::cell::RefCell;
use std::rc::Rc;

use log::debug;

use crate::route::{RouteParams, Subscription};

pub struct NavState {
    session_id: Rc<RefCell<Option<String>>>,
    _subscription: Subscription,
}

impl NavState {
    pub fn new(route: &RouteParams) -> Self {
        let session_id = Rc::new(RefCell::new(None));
        let mirror = Rc::clone(&session_id);
        let subscription = route.subscribe(move |new, _old| {
            debug!("nav: session changed to {new:?}");
            *mirror.borrow_mut() = new.map(str::to_owned);
        });
        Self {
            session_id,
            _subscription: subscription,
        }
    }

    pub fn session_id(&self) -> Option<String> {
        self.session_id.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initializes_from_current_route_state() {
        let route = RouteParams::new(Some("abc123".to_string()));
        let nav = NavState::new(&route);
        assert_eq!(nav.session_id().as_deref(), Some("abc123"));
    }

    #[test]
    fn tracks_every_route_change() {
        let route = RouteParams::new(None);
        let nav = NavState::new(&route);
        assert_eq!(nav.session_id(), None);

        route.set_session_id(Some("a".to_string()));
        assert_eq!(nav.session_id().as_deref(), Some("a"));

        route.set_session_id(Some("b".to_string()));
        assert_eq!(nav.session_id().as_deref(), Some("b"));

        route.set_session_id(None);
        assert_eq!(nav.session_id(), None);
    }

    #[test]
    fn dropped_nav_state_stops_observing() {
        let route = RouteParams::new(None);
        let nav = NavState::new(&route);
        drop(nav);
        // must not panic on a dangling subscriber
        route.set_session_id(Some("a".to_string()));
    }
}
