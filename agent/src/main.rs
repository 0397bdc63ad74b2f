use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use assistant_core::mock::InMemoryAgent;

use assistant::config::{self, SessionConfig};
use assistant::dispatcher::Dispatcher;
use assistant::session::manager::{Session, WsDialer};
use assistant::shutdown::ShutdownArbiter;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn print_usage() {
    eprintln!("Usage: assistant [--host HOST] [--path PATH] [--retry-interval-seconds N]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --host HOST                     control plane host:port (default: localhost:8080)");
    eprintln!("  --path PATH                     control plane URL path (default: /echo)");
    eprintln!("  --retry-interval-seconds N       dial retry interval in seconds (default: 15)");
    eprintln!("  --version                        print version and exit");
    eprintln!("  --help                           print this help message");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.iter().any(|a| a == "--version") {
        println!("assistant {}", VERSION);
        return Ok(());
    }
    if args.iter().any(|a| a == "--help") {
        print_usage();
        return Ok(());
    }

    init_tracing();

    // Resolved before any socket I/O: a missing token is a fatal
    // configuration error, never retried.
    let bearer = match config::bearer_token() {
        Ok(bearer) => bearer,
        Err(err) => {
            error!(error = %err, "fatal configuration error");
            return Err(err.into());
        }
    };

    let session_config = SessionConfig::from_args(&args)?;
    info!(host = %session_config.host, path = %session_config.path, "assistant {} starting", VERSION);

    let facade = Arc::new(InMemoryAgent::new());
    let dispatcher = Arc::new(Dispatcher::new(facade));
    let dialer = Arc::new(WsDialer);
    let session = Session::new(session_config, bearer, dialer, dispatcher);

    let arbiter = ShutdownArbiter::install();
    let result = session.run(arbiter.token()).await;

    match result {
        Ok(()) => {
            info!("assistant stopped");
            Ok(())
        }
        Err(err) => {
            error!(error = %err, "assistant stopped after unrecoverable transport failure");
            Err(err.into())
        }
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
}
