//! Fetch plumbing between the backend client and the UI thread.
//!
//! Every fetch goes through a [`Fetcher`]; the production implementation
//! runs each request on its own worker thread and reports completion as a
//! [`FetchEvent`] on an mpsc channel the UI drains once per frame. Events
//! from concurrent requests arrive in no particular order.

use std::sync::{Arc, mpsc::Sender};
use std::thread;

use log::debug;

use crate::client::{ApiClient, ApiRequest, ApiResponse};
use crate::errors::PaddockError;

/// Lifecycle of one backend fetch. Failures are explicit so the UI can
/// show them instead of leaving fields silently empty.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum FetchState<T> {
    #[default]
    NotStarted,
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> FetchState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            FetchState::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            FetchState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Completion of one request. `result` carries the parsed payload or a
/// display-ready error message.
#[derive(Clone, Debug)]
pub struct FetchEvent {
    pub request: ApiRequest,
    pub result: Result<ApiResponse, String>,
}

impl FetchEvent {
    pub fn session_id(&self) -> Option<&str> {
        self.request.session_id()
    }
}

pub trait Fetcher {
    fn submit(&self, request: ApiRequest);
}

/// Runs requests against a live backend. Each submit spawns a short-lived
/// worker thread that blocks on the async client and sends the completion
/// event back, waking egui so the result is painted promptly.
pub struct HttpFetcher {
    client: Arc<ApiClient>,
    events: Sender<FetchEvent>,
    repaint: Option<egui::Context>,
}

impl HttpFetcher {
    pub fn new(client: ApiClient, events: Sender<FetchEvent>) -> Self {
        Self {
            client: Arc::new(client),
            events,
            repaint: None,
        }
    }

    pub fn with_repaint(mut self, ctx: egui::Context) -> Self {
        self.repaint = Some(ctx);
        self
    }
}

impl Fetcher for HttpFetcher {
    fn submit(&self, request: ApiRequest) {
        let client = Arc::clone(&self.client);
        let events = self.events.clone();
        let repaint = self.repaint.clone();
        thread::spawn(move || {
            let result = tokio::runtime::Runtime::new()
                .map_err(|e| PaddockError::FetchRuntimeError { source: e })
                .and_then(|runtime| runtime.block_on(client.execute(&request)))
                .map_err(|e| e.to_string());
            if events.send(FetchEvent { request, result }).is_err() {
                debug!("fetch completed after UI shutdown, dropping event");
                return;
            }
            if let Some(ctx) = repaint {
                ctx.request_repaint();
            }
        });
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;

    use super::Fetcher;
    use crate::client::ApiRequest;

    /// Records submitted requests instead of running them, so view-model
    /// tests can assert on fetch behavior without a backend.
    #[derive(Default)]
    pub(crate) struct RecordingFetcher {
        pub(crate) requests: RefCell<Vec<ApiRequest>>,
    }

    impl RecordingFetcher {
        pub(crate) fn requests(&self) -> Vec<ApiRequest> {
            self.requests.borrow().clone()
        }
    }

    impl Fetcher for RecordingFetcher {
        fn submit(&self, request: ApiRequest) {
            self.requests.borrow_mut().push(request);
        }
    }
}
