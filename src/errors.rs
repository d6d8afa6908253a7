// Error types for paddock

use snafu::Snafu;
use std::io;

#[derive(Debug, Snafu)]
pub enum PaddockError {
    // Errors for the backend HTTP client
    #[snafu(display("Invalid backend URL: {reason}"))]
    InvalidBackendUrl { reason: String },
    #[snafu(display("HTTP request failed"))]
    HttpError { source: reqwest::Error },
    #[snafu(display("Backend returned status {status} for {path}"))]
    ResponseStatus { status: u16, path: String },
    #[snafu(display("Could not decode response body for {path}"))]
    DecodeError {
        path: String,
        source: serde_json::Error,
    },

    // Errors for the fetch worker threads
    #[snafu(display("Could not start fetch runtime"))]
    FetchRuntimeError { source: io::Error },

    // Config management errors
    #[snafu(display("Could not find application data directory to save config file"))]
    NoConfigDir,
    #[snafu(display("Error writing config file"))]
    ConfigIOError { source: io::Error },
    #[snafu(display("Error serializing config file"))]
    ConfigSerializeError { source: serde_json::Error },

    // Settings editor errors
    #[snafu(display("Configuration profile is not valid JSON"))]
    InvalidProfileJson { source: serde_json::Error },
}
