//! Shutdown triggers
//!
//! A running service waits on two sources at once: an external shutdown
//! future (OS signals by default) and the cancellation token from its
//! configuration. Whichever completes first wins.

use std::future::Future;
use strum_macros::Display;
use tokio::signal;
use tokio_util::sync::CancellationToken;

/// Why a running service was asked to stop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum WakeReason {
    /// The shutdown future completed (usually an OS signal)
    Signal,
    /// The configured cancellation token fired
    Cancelled,
}

/// Create a future that completes when a termination signal is received
///
/// Listens for Ctrl+C and, on unix, SIGTERM. SIGKILL cannot be caught by a
/// process and is therefore not part of this set. If a handler cannot be
/// installed, that source is logged and treated as one that never fires.
///
/// # Example
///
/// ```rust,ignore
/// use svckit::lifecycle::shutdown_signal;
///
/// tokio::select! {
///     _ = shutdown_signal() => {
///         println!("Shutdown signal received");
///     }
///     _ = server.serve() => {}
/// }
/// ```
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal");
        },
    }
}

/// Wait until either `shutdown` completes or `cancellation` fires
pub async fn wait_for_shutdown<F>(shutdown: F, cancellation: &CancellationToken) -> WakeReason
where
    F: Future<Output = ()>,
{
    tokio::select! {
        _ = shutdown => WakeReason::Signal,
        _ = cancellation.cancelled() => WakeReason::Cancelled,
    }
}
