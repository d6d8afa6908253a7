// Library interface for paddock
// This allows integration tests to access internal modules

pub mod client;
pub mod config;
pub mod errors;
pub mod fetch;
pub mod plot;
pub mod route;
pub mod ui;

// Re-export commonly used types
pub use client::{ApiClient, ApiRequest, ApiResponse, PlotKind};
pub use errors::PaddockError;
pub use fetch::{FetchEvent, FetchState, Fetcher, HttpFetcher};
pub use plot::PlotAdapter;
pub use route::RouteParams;
