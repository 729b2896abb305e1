//! Action Scope
//!
//! The lifetime of a screen. User actions run inside it; tearing the scope
//! down abandons every action still waiting on the platform.

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Returned by [`ActionScope::run`] when the scope was torn down first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("scope cancelled")]
pub struct ScopeCancelled;

/// Cancellation scope for user actions.
///
/// Tracks running actions and signals cancellation to all of them.
#[derive(Clone)]
pub struct ActionScope {
    /// Whether the scope has been torn down
    cancelled: Arc<AtomicBool>,
    /// Number of running actions
    active_actions: Arc<AtomicUsize>,
    /// Broadcast channel for the cancel signal
    cancel_tx: broadcast::Sender<()>,
}

impl ActionScope {
    /// Create a new, live scope.
    pub fn new() -> Self {
        let (cancel_tx, _) = broadcast::channel(1);
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            active_actions: Arc::new(AtomicUsize::new(0)),
            cancel_tx,
        }
    }

    /// Subscribe to the cancel signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.cancel_tx.subscribe()
    }

    /// Tear the scope down.
    pub fn cancel(&self) {
        if !self.cancelled.swap(true, Ordering::SeqCst) {
            tracing::info!(
                active = self.active_actions(),
                "cancelling action scope"
            );
            let _ = self.cancel_tx.send(());
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Number of actions currently running in this scope.
    pub fn active_actions(&self) -> usize {
        self.active_actions.load(Ordering::SeqCst)
    }

    fn action_started(&self) {
        self.active_actions.fetch_add(1, Ordering::SeqCst);
    }

    fn action_ended(&self) {
        self.active_actions.fetch_sub(1, Ordering::SeqCst);
    }

    /// Drive `fut` to completion unless the scope is cancelled first.
    ///
    /// On cancellation `fut` is dropped at its current suspension point.
    pub async fn run<F>(&self, fut: F) -> Result<F::Output, ScopeCancelled>
    where
        F: Future,
    {
        let mut cancel_rx = self.subscribe();
        if self.is_cancelled() {
            return Err(ScopeCancelled);
        }

        tokio::select! {
            biased;
            _ = cancel_rx.recv() => Err(ScopeCancelled),
            out = fut => Ok(out),
        }
    }

    /// Create an action guard that auto-decrements on drop.
    pub fn action_guard(&self) -> ActionGuard {
        self.action_started();
        ActionGuard {
            scope: self.clone(),
        }
    }
}

impl Default for ActionScope {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII guard for tracking a running action.
pub struct ActionGuard {
    scope: ActionScope,
}

impl Drop for ActionGuard {
    fn drop(&mut self) {
        self.scope.action_ended();
    }
}

/// Cancel `scope` when the process is asked to stop.
#[cfg_attr(coverage_nightly, coverage(off))]
pub async fn cancel_on_signal(scope: ActionScope) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("received Ctrl+C, closing screen");
        }
        _ = terminate => {
            tracing::info!("received SIGTERM, closing screen");
        }
    }

    scope.cancel();
}
