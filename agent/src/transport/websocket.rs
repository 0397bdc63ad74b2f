//! The websocket `Transport` implementation: dials an outbound `ws://` URL
//! with a bearer header, then drives reads and writes over the resulting
//! stream.

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use assistant_core::message::Response;

use crate::errors::TransportError;
use crate::transport::Transport;

pub struct WsTransport {
    stream: WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>,
}

impl WsTransport {
    /// Dials `url` (scheme `ws`), attaching `Authorization: Token <bearer>`
    /// to the upgrade request.
    pub async fn dial(url: &str, bearer: &str) -> Result<Self, TransportError> {
        let mut request = url
            .into_client_request()
            .map_err(|source| TransportError::DialFailed { url: url.to_string(), source })?;
        let header_value = format!("Token {bearer}")
            .parse()
            .map_err(|_| TransportError::InvalidBearerToken)?;
        request.headers_mut().insert("Authorization", header_value);

        let (stream, _response) = connect_async(request)
            .await
            .map_err(|source| TransportError::DialFailed { url: url.to_string(), source })?;
        Ok(WsTransport { stream })
    }
}

#[async_trait]
impl Transport for WsTransport {
    /// Only `Text` yields a frame. `Ping`/`Pong` are answered transparently
    /// by the underlying stream and skipped here; a stray `Binary`/`Frame`
    /// message is outside the wire contract but not a transport failure, so
    /// it's skipped too rather than tearing down a live session over it.
    async fn read_frame(&mut self) -> Result<String, TransportError> {
        loop {
            match self.stream.next().await {
                Some(Ok(Message::Text(text))) => return Ok(text.to_string()),
                Some(Ok(Message::Ping(_) | Message::Pong(_))) => continue,
                Some(Ok(Message::Close(_))) | None => return Err(TransportError::Closed),
                Some(Ok(Message::Binary(_) | Message::Frame(_))) => continue,
                Some(Err(source)) => return Err(TransportError::ReadFailed(source)),
            }
        }
    }

    async fn write_json(&mut self, response: &Response) -> Result<(), TransportError> {
        let text = serde_json::to_string(response).expect("Response always serializes");
        self.stream
            .send(Message::Text(text.into()))
            .await
            .map_err(TransportError::WriteFailed)
    }

    async fn close(&mut self) {
        let _ = self.stream.close(None).await;
    }
}
