//! Graceful shutdown: wait for a stop signal, then give the server task a
//! bounded window to finish in-flight requests.

use std::{io, time::Duration};

use anyhow::Result;
use tokio::task::JoinHandle;

/// Wait for the server task to finish, aborting it once `grace` elapses.
pub async fn drain(mut server: JoinHandle<io::Result<()>>, grace: Duration) -> Result<()> {
    match tokio::time::timeout(grace, &mut server).await {
        Ok(res) => res??,
        Err(_) => {
            tracing::warn!("Grace period elapsed; forcing remaining connections closed");
            server.abort();
        }
    }
    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to listen for SIGTERM: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
