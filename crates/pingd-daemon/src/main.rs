// SPDX-License-Identifier: MIT

//! `pingd`: host-liveness monitoring daemon.
//!
//! Maintains a dynamic population of target hosts, probes them with ICMP
//! echo requests on three cadences, and broadcasts `NOPING` failure
//! notifications to every connected controller over a local control
//! socket. Takes one positional argument naming the local socket to
//! create; exits 1 on bind failure or a startup error.

mod bucket;
mod env;
mod framing;
mod listener;
mod notifier;
mod probe;
mod scheduler;
mod state;

use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use clap::Parser;
use tokio::net::UnixListener;
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::{Mutex, Notify};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::listener::ListenCtx;
use crate::notifier::Notifier;
use crate::probe::{ProbeBackend, SurgePingBackend};
use crate::state::SharedState;

/// Host-liveness monitoring daemon.
#[derive(Parser, Debug)]
#[command(name = "pingd", author, version, about)]
struct Cli {
    /// Filesystem path of the local control socket to create.
    socket_path: PathBuf,

    /// Override the DEFUNCT bucket's probe cadence, in milliseconds.
    /// Falls back to `PINGD_DEFUNCT_TICK_MS`, then to a ~5-hour reference
    /// period, if unset.
    #[arg(long, env = "PINGD_DEFUNCT_TICK_MS")]
    defunct_tick_ms: Option<u64>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            error!(error = %e, "failed to start the async runtime");
            std::process::exit(1);
        }
    };

    let exit_code = runtime.block_on(run(cli));
    std::process::exit(exit_code);
}

async fn run(cli: Cli) -> i32 {
    let socket_path = cli.socket_path;

    if socket_path.exists() {
        if let Err(e) = std::fs::remove_file(&socket_path) {
            error!(path = %socket_path.display(), error = %e, "failed to remove stale socket file");
            return 1;
        }
    }

    let listener = match UnixListener::bind(&socket_path) {
        Ok(listener) => listener,
        Err(e) => {
            error!(path = %socket_path.display(), error = %e, "failed to bind control socket");
            return 1;
        }
    };

    // World-accessible: connection-level access control is left to
    // filesystem permissions at deployment, not enforced here.
    if let Err(e) = std::fs::set_permissions(&socket_path, std::fs::Permissions::from_mode(0o666)) {
        error!(path = %socket_path.display(), error = %e, "failed to set world-access permissions on socket");
    }

    let backend: Arc<dyn ProbeBackend> = match SurgePingBackend::new() {
        Ok(backend) => Arc::new(backend),
        Err(e) => {
            error!(error = %e, "failed to open ICMP client (raw-socket privileges not available?)");
            let _ = std::fs::remove_file(&socket_path);
            return 1;
        }
    };

    let state = Arc::new(Mutex::new(SharedState::default()));
    let notifier = Arc::new(Notifier::new());
    let shutdown = Arc::new(Notify::new());
    let shutting_down = Arc::new(AtomicBool::new(false));

    scheduler::spawn(Arc::clone(&state), Arc::clone(&backend), Arc::clone(&notifier), cli.defunct_tick_ms);

    let ctx = Arc::new(ListenCtx {
        state,
        notifier,
        shutdown: Arc::clone(&shutdown),
        shutting_down,
    });

    info!(path = %socket_path.display(), "pingd listening");
    let accept_task = tokio::spawn(listener::run(listener, ctx));

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(sigterm) => sigterm,
        Err(e) => {
            error!(error = %e, "failed to install SIGTERM handler");
            accept_task.abort();
            let _ = std::fs::remove_file(&socket_path);
            return 1;
        }
    };

    tokio::select! {
        _ = shutdown.notified() => {
            info!("shutting down: controller sent !SHUTDOWN!");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("shutting down: received SIGINT");
        }
        _ = sigterm.recv() => {
            info!("shutting down: received SIGTERM");
        }
    }

    accept_task.abort();
    let _ = std::fs::remove_file(&socket_path);
    info!("pingd shut down cleanly");
    0
}
