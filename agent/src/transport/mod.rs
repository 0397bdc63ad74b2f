pub mod websocket;

use async_trait::async_trait;
use assistant_core::message::Response;

use crate::errors::TransportError;

pub use websocket::WsTransport;

/// Delivers JSON objects to and from the control plane. Exactly one reader
/// and one writer may be active at a time; the session layer enforces this
/// by construction (only the reader task ever touches a `Transport`).
///
/// `read_frame` hands back the raw text of one JSON frame rather than a
/// parsed `Request`: a frame that fails to parse is a protocol error the
/// reader loop answers with a `FAILURE` response, not a transport failure
/// that should trigger a reconnect.
#[async_trait]
pub trait Transport: Send {
    /// Blocking suspension point: does not return until one complete JSON
    /// frame has arrived or the socket errors.
    async fn read_frame(&mut self) -> Result<String, TransportError>;

    async fn write_json(&mut self, response: &Response) -> Result<(), TransportError>;

    /// Closing must unblock a `read_frame` in progress on another task.
    async fn close(&mut self);
}
