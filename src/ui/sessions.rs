//! View-model for the sessions list: one fetch on construction, no
//! refresh or pagination.

use log::warn;

use crate::client::types::Session;
use crate::client::{ApiRequest, ApiResponse};
use crate::fetch::{FetchEvent, FetchState, Fetcher};

pub struct SessionsViewModel {
    pub sessions: FetchState<Vec<Session>>,
}

impl SessionsViewModel {
    pub fn new(fetcher: &dyn Fetcher) -> Self {
        fetcher.submit(ApiRequest::Sessions);
        Self {
            sessions: FetchState::Loading,
        }
    }

    /// Routes a fetch completion into this view-model. Returns false when
    /// the event belongs to someone else.
    pub fn apply(&mut self, event: &FetchEvent) -> bool {
        if !matches!(event.request, ApiRequest::Sessions) {
            return false;
        }
        match &event.result {
            Ok(ApiResponse::Sessions(sessions)) => {
                self.sessions = FetchState::Loaded(sessions.clone());
            }
            Ok(other) => warn!("unexpected payload for sessions fetch: {other:?}"),
            Err(message) => self.sessions = FetchState::Failed(message.clone()),
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::testing::RecordingFetcher;

    #[test]
    fn fetches_sessions_once_on_construction() {
        let fetcher = RecordingFetcher::default();
        let vm = SessionsViewModel::new(&fetcher);
        assert_eq!(fetcher.requests(), vec![ApiRequest::Sessions]);
        assert!(vm.sessions.is_loading());
    }

    #[test]
    fn resolves_into_sessions_field() {
        let fetcher = RecordingFetcher::default();
        let mut vm = SessionsViewModel::new(&fetcher);

        let sessions = vec![Session {
            id: "abc123".to_string(),
            ..Default::default()
        }];
        let applied = vm.apply(&FetchEvent {
            request: ApiRequest::Sessions,
            result: Ok(ApiResponse::Sessions(sessions.clone())),
        });
        assert!(applied);
        assert_eq!(vm.sessions.value(), Some(&sessions));
    }

    #[test]
    fn failure_is_surfaced_not_swallowed() {
        let fetcher = RecordingFetcher::default();
        let mut vm = SessionsViewModel::new(&fetcher);
        vm.apply(&FetchEvent {
            request: ApiRequest::Sessions,
            result: Err("connection refused".to_string()),
        });
        assert_eq!(vm.sessions.error(), Some("connection refused"));
    }

    #[test]
    fn ignores_unrelated_events() {
        let fetcher = RecordingFetcher::default();
        let mut vm = SessionsViewModel::new(&fetcher);
        let applied = vm.apply(&FetchEvent {
            request: ApiRequest::SettingsIndex,
            result: Err("nope".to_string()),
        });
        assert!(!applied);
        assert!(vm.sessions.is_loading());
    }
}
