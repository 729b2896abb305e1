//! Permission Gate - location consent use case
//!
//! Turns the event based permission dialog into a single awaitable answer:
//! was fine or coarse location granted.

use crate::domain::entities::{PermissionGrants, PermissionKind, LOCATION_PERMISSIONS};
use crate::domain::ports::PermissionPrompt;
use crate::domain::value_objects::{PermissionPolicy, RequestId};
use crate::infrastructure::pending::{pending_request, Completer, PendingError};
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Permission request failures. Denial is not one of them: it is `Ok(false)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PermissionError {
    #[error("a permission request is already in flight")]
    Busy,
    #[error("permission request superseded by a newer one")]
    Superseded,
}

type PendingTable = DashMap<RequestId, Completer<bool>>;

/// Location permission gate.
///
/// Every outstanding request has an entry in a table keyed by [`RequestId`];
/// the prompt's single registered handler routes results through it. What
/// happens to a request made while another is outstanding is decided by the
/// [`PermissionPolicy`].
pub struct PermissionGate {
    prompt: Arc<dyn PermissionPrompt>,
    policy: PermissionPolicy,
    pending: Arc<PendingTable>,
    next_id: AtomicU64,
    /// Serializes the policy check with the table insert.
    admission: Mutex<()>,
}

impl PermissionGate {
    /// Create a gate and register its result handler with `prompt`.
    pub fn new(prompt: Arc<dyn PermissionPrompt>, policy: PermissionPolicy) -> Self {
        let pending: Arc<PendingTable> = Arc::new(DashMap::new());

        let table = pending.clone();
        prompt.register(Arc::new(move |id, grants| {
            on_permission_result(&table, id, &grants);
        }));

        Self {
            prompt,
            policy,
            pending,
            next_id: AtomicU64::new(1),
            admission: Mutex::new(()),
        }
    }

    pub fn policy(&self) -> PermissionPolicy {
        self.policy
    }

    /// Number of requests waiting for the platform.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Ask for fine and coarse location and wait for the user's answer.
    ///
    /// Resolves to `true` if either kind was granted. Dropping the returned
    /// future withdraws the request; a late answer is then discarded.
    #[tracing::instrument(skip_all, fields(policy = %self.policy))]
    pub async fn request_location_permission(&self) -> Result<bool, PermissionError> {
        let id = RequestId::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        let (completer, pending) = pending_request::<bool>("location_permission");

        {
            let _admission = self.admission.lock();
            match self.policy {
                PermissionPolicy::RejectIfBusy => {
                    if !self.pending.is_empty() {
                        tracing::debug!(%id, "permission request rejected: another is in flight");
                        return Err(PermissionError::Busy);
                    }
                }
                PermissionPolicy::OverwriteAndDrop => {
                    let dropped = self.pending.len();
                    if dropped > 0 {
                        // Dropping the completers wakes the old callers with `Superseded`.
                        self.pending.clear();
                        tracing::warn!(%id, dropped, "outstanding permission requests dropped");
                    }
                }
                PermissionPolicy::Queue => {}
            }
            self.pending.insert(id, completer);
        }

        let table = self.pending.clone();
        let pending = pending.on_cancel(move || {
            table.remove(&id);
            tracing::warn!(%id, "permission request withdrawn");
        });

        self.prompt.launch(id, &LOCATION_PERMISSIONS);
        tracing::trace!(%id, "permission prompt launched");

        match pending.await {
            Ok(granted) => Ok(granted),
            Err(PendingError::Dropped) => Err(PermissionError::Superseded),
        }
    }
}

/// Registered prompt handler: resolve the matching table entry.
fn on_permission_result(table: &PendingTable, id: RequestId, grants: &PermissionGrants) {
    let granted = match grants.strongest() {
        Some(PermissionKind::Fine) => {
            tracing::trace!(%id, "ACCESS_FINE_LOCATION");
            true
        }
        Some(PermissionKind::Coarse) => {
            tracing::trace!(%id, "ACCESS_COARSE_LOCATION");
            true
        }
        None => {
            tracing::trace!(%id, "no location permission granted");
            false
        }
    };

    match table.remove(&id) {
        Some((_, completer)) => {
            if let Err(e) = completer.resolve(granted) {
                tracing::debug!(%id, error = %e, "permission result not delivered");
            }
        }
        None => {
            tracing::debug!(%id, "permission result for unknown request discarded");
        }
    }
}
