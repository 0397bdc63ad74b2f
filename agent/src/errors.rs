//! Error types for the session layer: the boundary below `assistant-core`.

use thiserror::Error;

/// Fatal configuration errors, surfaced from `Run` before any socket I/O.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// `INFLUX_TOKEN` was not set in the environment.
    #[error("INFLUX_TOKEN is not set")]
    MissingBearerToken,

    /// A CLI flag value could not be parsed (e.g. a non-numeric retry interval).
    #[error("invalid value for {flag}: {value}")]
    InvalidFlagValue { flag: &'static str, value: String },
}

/// Transient errors from dialing or operating the websocket transport.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("failed to dial {url}: {source}")]
    DialFailed { url: String, #[source] source: tokio_tungstenite::tungstenite::Error },

    #[error("read failed: {0}")]
    ReadFailed(#[source] tokio_tungstenite::tungstenite::Error),

    #[error("write failed: {0}")]
    WriteFailed(#[source] tokio_tungstenite::tungstenite::Error),

    #[error("connection closed by peer")]
    Closed,

    #[error("bearer token is not a valid HTTP header value")]
    InvalidBearerToken,
}
