//! The reader loop: read -> dispatch -> write, one request at a time.
//!
//! Malformed JSON or an unparseable request never crashes the loop; it
//! produces a `FAILURE` response with `uuid` echoed when it can be
//! recovered from the raw frame, empty otherwise. Transport-level errors
//! propagate to the caller, which is the session's cue to reconnect.

use assistant_core::message::{Request, Response};
use tracing::warn;

use crate::dispatcher::Dispatcher;
use crate::errors::TransportError;
use crate::transport::Transport;

pub async fn serve_one(transport: &mut dyn Transport, dispatcher: &Dispatcher) -> Result<(), TransportError> {
    let frame = transport.read_frame().await?;

    let response = match serde_json::from_str::<Request>(&frame) {
        Ok(request) => dispatcher.dispatch(request).await,
        Err(_) => {
            warn!("received malformed request frame");
            Response::failure(extract_uuid(&frame), "invalid operation request")
        }
    };

    transport.write_json(&response).await
}

/// Best-effort extraction of `Uuid` from a frame that didn't fully parse as
/// a `Request`, so the peer can still correlate the failure response.
fn extract_uuid(frame: &str) -> String {
    serde_json::from_str::<serde_json::Value>(frame)
        .ok()
        .and_then(|value| value.get("Uuid").and_then(|v| v.as_str()).map(str::to_string))
        .unwrap_or_default()
}
