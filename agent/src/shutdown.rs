//! Fuses the ambient process signal, a local `Stop()`, and (via the
//! `Session`'s own check of `shutdown.is_cancelled()`) a terminal transport
//! failure into the single `CancellationToken` the rest of the session layer
//! treats as the sole cancellation authority.
//!
//! Listens for SIGINT/SIGTERM on Unix and Ctrl+C elsewhere, cancelling a
//! cloned token from a spawned task.

use tokio_util::sync::CancellationToken;
use tracing::info;

pub struct ShutdownArbiter {
    token: CancellationToken,
}

impl ShutdownArbiter {
    /// Spawns the signal-watching task and returns an arbiter sharing its
    /// token with every clone handed out via [`ShutdownArbiter::token`].
    pub fn install() -> Self {
        let token = CancellationToken::new();
        let token_clone = token.clone();

        tokio::spawn(async move {
            let ctrl_c = tokio::signal::ctrl_c();

            #[cfg(unix)]
            {
                use tokio::signal::unix::{signal, SignalKind};
                let mut sigterm = signal(SignalKind::terminate()).expect("failed to register SIGTERM handler");

                tokio::select! {
                    _ = ctrl_c => info!("received SIGINT, initiating shutdown"),
                    _ = sigterm.recv() => info!("received SIGTERM, initiating shutdown"),
                }
            }

            #[cfg(not(unix))]
            {
                let _ = ctrl_c.await;
                info!("received Ctrl+C, initiating shutdown");
            }

            token_clone.cancel();
        });

        ShutdownArbiter { token }
    }

    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Local equivalent of external cancellation. Idempotent: calling this
    /// twice produces the same terminal state as calling it once.
    pub fn stop(&self) {
        self.token.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.token.is_cancelled()
    }
}
