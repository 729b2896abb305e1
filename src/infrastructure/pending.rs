//! One-shot Pending Requests
//!
//! Turns a single-shot platform callback into something a sequential flow
//! can `.await`. The platform side holds a [`Completer`], the caller holds
//! the [`PendingRequest`] future.

use parking_lot::Mutex;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::oneshot;

/// Why a resolution was not delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// The request was already resolved once; the value was discarded.
    #[error("request already resolved")]
    AlreadyResolved,
    /// The waiting caller went away before the result arrived.
    #[error("caller cancelled before resolution")]
    Cancelled,
}

/// Why a waiting caller got no value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PendingError {
    /// Every completer was dropped without resolving.
    #[error("request dropped without resolution")]
    Dropped,
}

type CancelHook = Box<dyn FnOnce() + Send>;

struct Slot<T> {
    label: &'static str,
    sender: Mutex<Option<oneshot::Sender<T>>>,
}

/// Resolving half of a pending request.
///
/// Cheap to clone so it can live inside `Fn` listeners; only the first
/// `resolve` across all clones is delivered.
pub struct Completer<T> {
    slot: Arc<Slot<T>>,
}

impl<T> Clone for Completer<T> {
    fn clone(&self) -> Self {
        Self {
            slot: self.slot.clone(),
        }
    }
}

impl<T> Completer<T> {
    /// Deliver `value` to the waiting caller.
    pub fn resolve(&self, value: T) -> Result<(), ResolveError> {
        let sender = self.slot.sender.lock().take();
        let Some(tx) = sender else {
            tracing::warn!(request = self.slot.label, "duplicate resolution ignored");
            return Err(ResolveError::AlreadyResolved);
        };

        if tx.send(value).is_err() {
            tracing::warn!(
                request = self.slot.label,
                "result arrived after caller was cancelled"
            );
            return Err(ResolveError::Cancelled);
        }
        Ok(())
    }

    /// Whether the request can no longer deliver anything, either because it
    /// was resolved or because the caller went away.
    pub fn is_detached(&self) -> bool {
        self.slot
            .sender
            .lock()
            .as_ref()
            .map_or(true, |tx| tx.is_closed())
    }
}

/// Waiting half of a pending request.
///
/// Resolves once with the completer's value. Dropping it before that counts
/// as cancellation: the completer is detached and the `on_cancel` hook runs.
pub struct PendingRequest<T> {
    label: &'static str,
    rx: oneshot::Receiver<T>,
    finished: bool,
    on_cancel: Option<CancelHook>,
}

impl<T> PendingRequest<T> {
    /// Run `hook` if this request is dropped before it resolves.
    pub fn on_cancel<F>(mut self, hook: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        self.on_cancel = Some(Box::new(hook));
        self
    }
}

impl<T> Future for PendingRequest<T> {
    type Output = Result<T, PendingError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        match Pin::new(&mut this.rx).poll(cx) {
            Poll::Ready(Ok(value)) => {
                this.finished = true;
                Poll::Ready(Ok(value))
            }
            Poll::Ready(Err(_)) => {
                this.finished = true;
                Poll::Ready(Err(PendingError::Dropped))
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl<T> Drop for PendingRequest<T> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        self.rx.close();
        // Delivered but never polled: nothing was lost.
        if self.rx.try_recv().is_ok() {
            return;
        }
        tracing::debug!(request = self.label, "pending request cancelled");
        if let Some(hook) = self.on_cancel.take() {
            hook();
        }
    }
}

/// Create a linked completer / pending request pair.
///
/// `label` names the request in logs.
pub fn pending_request<T>(label: &'static str) -> (Completer<T>, PendingRequest<T>) {
    let (tx, rx) = oneshot::channel();
    let completer = Completer {
        slot: Arc::new(Slot {
            label,
            sender: Mutex::new(Some(tx)),
        }),
    };
    let pending = PendingRequest {
        label,
        rx,
        finished: false,
        on_cancel: None,
    };
    (completer, pending)
}
