//! The connect/reconnect state machine. Lifetime equal to one `run`
//! invocation: a long-lived owner of a single websocket transport behind a
//! state cell.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::SessionConfig;
use crate::dispatcher::Dispatcher;
use crate::errors::TransportError;
use crate::reader;
use crate::session::state::{SessionState, SessionStateCell};
use crate::transport::{Transport, WsTransport};

/// Indirection over `WsTransport::dial` so tests can substitute a scripted
/// dialer instead of a real socket.
#[async_trait]
pub trait Dialer: Send + Sync {
    async fn dial(&self, url: &str, bearer: &str) -> Result<Box<dyn Transport>, TransportError>;
}

pub struct WsDialer;

#[async_trait]
impl Dialer for WsDialer {
    async fn dial(&self, url: &str, bearer: &str) -> Result<Box<dyn Transport>, TransportError> {
        WsTransport::dial(url, bearer).await.map(|t| Box::new(t) as Box<dyn Transport>)
    }
}

pub struct Session {
    config: SessionConfig,
    bearer: String,
    dialer: Arc<dyn Dialer>,
    dispatcher: Arc<Dispatcher>,
    state: SessionStateCell,
}

impl Session {
    pub fn new(config: SessionConfig, bearer: String, dialer: Arc<dyn Dialer>, dispatcher: Arc<Dispatcher>) -> Self {
        Session { config, bearer, dialer, dispatcher, state: SessionStateCell::new(SessionState::Idle) }
    }

    pub fn state(&self) -> SessionState {
        self.state.load()
    }

    /// Runs until the shutdown token is cancelled. Cancellation is not an
    /// error: `run` always returns `Ok(())` in that case, the same nil
    /// result a local `Stop()` would produce.
    pub async fn run(&self, shutdown: CancellationToken) -> Result<(), TransportError> {
        let url = self.config.url();

        loop {
            self.state.store(SessionState::Dialing);
            info!(url = %url, "dialing control plane");
            let mut transport = match self.dial_with_retry(&url, &shutdown).await {
                Some(transport) => transport,
                None => {
                    self.state.store(SessionState::Stopped);
                    return Ok(());
                }
            };
            self.state.store(SessionState::Live);
            info!("session live");

            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => {
                        transport.close().await;
                        self.state.store(SessionState::Stopped);
                        return Ok(());
                    }
                    result = reader::serve_one(transport.as_mut(), &self.dispatcher) => {
                        if let Err(err) = result {
                            if shutdown.is_cancelled() {
                                transport.close().await;
                                self.state.store(SessionState::Stopped);
                                return Ok(());
                            }
                            warn!(error = %err, "transport error, reconnecting");
                            self.state.store(SessionState::Reconnecting);
                            break;
                        }
                    }
                }
            }
        }
    }

    /// Bounded-interval retry with a cancellable sleep between attempts.
    /// Returns `None` only when the ambient context was cancelled mid-wait.
    async fn dial_with_retry(&self, url: &str, shutdown: &CancellationToken) -> Option<Box<dyn Transport>> {
        loop {
            match self.dialer.dial(url, &self.bearer).await {
                Ok(transport) => return Some(transport),
                Err(err) => {
                    warn!(error = %err, retry_in_seconds = self.config.retry_interval_seconds, "dial failed");
                    tokio::select! {
                        _ = tokio::time::sleep(Duration::from_secs(self.config.retry_interval_seconds)) => continue,
                        _ = shutdown.cancelled() => return None,
                    }
                }
            }
        }
    }
}
