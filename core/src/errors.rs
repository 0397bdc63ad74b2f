//! Error types shared across the session layer and the agent facade.
//!
//! Transport- and session-level errors live in the `assistant` binary crate;
//! these two enums cover the narrower boundary between the dispatcher and
//! whatever implements [`crate::facade::AgentFacade`].

use thiserror::Error;

/// Errors the dispatcher itself can produce while interpreting a `Request`.
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// `operation` did not match any known variant.
    #[error("invalid operation request")]
    UnknownOperation,

    /// `type` was present but not one of the recognised plugin types.
    #[error("did not provide a valid plugin type")]
    InvalidPluginType,

    /// A required field for this operation was missing (e.g. `uniqueId`, `name`).
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// `config` was required but absent or null.
    #[error("no config specified!")]
    MissingConfig,
}

/// Errors an [`crate::facade::AgentFacade`] implementation returns.
#[derive(Error, Debug)]
pub enum FacadeError {
    /// No plugin registered under this name.
    #[error("unknown plugin: {0}")]
    UnknownPlugin(String),

    /// No running instance under this uniqueId.
    #[error("unknown plugin instance: {0}")]
    UnknownInstance(String),

    /// The facade refused to apply a config (validation failure, etc.).
    #[error("update rejected: {0}")]
    UpdateRejected(String),

    /// Catch-all for facade-internal failures not covered above.
    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_error_display() {
        assert_eq!(ProtocolError::UnknownOperation.to_string(), "invalid operation request");
        assert_eq!(
            ProtocolError::InvalidPluginType.to_string(),
            "did not provide a valid plugin type"
        );
        assert_eq!(ProtocolError::MissingConfig.to_string(), "no config specified!");
        assert_eq!(
            ProtocolError::MissingField("uniqueId").to_string(),
            "missing required field: uniqueId"
        );
    }

    #[test]
    fn facade_error_display() {
        let err = FacadeError::UnknownPlugin("memcached".into());
        assert_eq!(err.to_string(), "unknown plugin: memcached");

        let err = FacadeError::UnknownInstance("in-42".into());
        assert_eq!(err.to_string(), "unknown plugin instance: in-42");

        let err = FacadeError::UpdateRejected("bad servers list".into());
        assert_eq!(err.to_string(), "update rejected: bad servers list");
    }
}
