//! Simulated Permission Prompt
//!
//! Implements PermissionPrompt without a device: the "user" answers with a
//! preconfigured set of grants, asynchronously, like the real dialog.

use crate::adapters::outbound::DashMapPermissionStatus;
use crate::domain::entities::{PermissionGrants, PermissionKind};
use crate::domain::ports::{PermissionPrompt, PermissionResultHandler};
use crate::domain::value_objects::RequestId;
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Permission dialog driven by configuration instead of a user.
///
/// Answers are written to the shared status store before the handler runs,
/// the same order the platform uses. With [`hold_results`](Self::hold_results)
/// the prompt stays open until [`release`](Self::release) is called.
pub struct SimulatedPermissionPrompt {
    status: Arc<DashMapPermissionStatus>,
    answer: RwLock<PermissionGrants>,
    delay: Duration,
    hold: bool,
    handler: RwLock<Option<PermissionResultHandler>>,
    held: Mutex<Vec<RequestId>>,
    launches: AtomicUsize,
    duplicate: AtomicBool,
}

impl SimulatedPermissionPrompt {
    /// Create a prompt that answers every launch with `answer`.
    pub fn new(status: Arc<DashMapPermissionStatus>, answer: PermissionGrants) -> Self {
        Self {
            status,
            answer: RwLock::new(answer),
            delay: Duration::ZERO,
            hold: false,
            handler: RwLock::new(None),
            held: Mutex::new(Vec::new()),
            launches: AtomicUsize::new(0),
            duplicate: AtomicBool::new(false),
        }
    }

    /// Time the "user" takes to answer.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Keep prompts open until released by hand.
    pub fn hold_results(mut self) -> Self {
        self.hold = true;
        self
    }

    /// Change the answer given to later prompts.
    pub fn set_answer(&self, answer: PermissionGrants) {
        *self.answer.write() = answer;
    }

    /// Deliver every result twice, like a misbehaving platform.
    pub fn deliver_duplicates(&self, enabled: bool) {
        self.duplicate.store(enabled, Ordering::SeqCst);
    }

    /// Number of prompts shown so far.
    pub fn launch_count(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }

    /// Prompts waiting for [`release`](Self::release).
    pub fn held_requests(&self) -> Vec<RequestId> {
        self.held.lock().clone()
    }

    /// Answer a held prompt with the configured grants.
    ///
    /// Returns false if `id` is not held.
    pub fn release(&self, id: RequestId) -> bool {
        let found = {
            let mut held = self.held.lock();
            match held.iter().position(|h| *h == id) {
                Some(pos) => {
                    held.remove(pos);
                    true
                }
                None => false,
            }
        };
        if found {
            let answer = self.answer.read().clone();
            self.deliver(id, answer);
        }
        found
    }

    /// Answer every held prompt, oldest first.
    pub fn release_all(&self) -> usize {
        let ids: Vec<RequestId> = std::mem::take(&mut *self.held.lock());
        let answer = self.answer.read().clone();
        for id in &ids {
            self.deliver(*id, answer.clone());
        }
        ids.len()
    }

    /// Push a result to the registered handler right now.
    pub fn deliver(&self, id: RequestId, grants: PermissionGrants) {
        let handler = self.handler.read().clone();
        let duplicate = self.duplicate.load(Ordering::SeqCst);
        dispatch(&self.status, handler, id, grants, duplicate);
    }
}

fn dispatch(
    status: &DashMapPermissionStatus,
    handler: Option<PermissionResultHandler>,
    id: RequestId,
    grants: PermissionGrants,
    duplicate: bool,
) {
    status.record(&grants);
    let Some(handler) = handler else {
        tracing::warn!(%id, "permission result dropped: no handler registered");
        return;
    };

    tracing::debug!(%id, ?grants, "permission prompt answered");
    if duplicate {
        handler(id, grants.clone());
    }
    handler(id, grants);
}

impl PermissionPrompt for SimulatedPermissionPrompt {
    fn register(&self, handler: PermissionResultHandler) {
        *self.handler.write() = Some(handler);
    }

    fn launch(&self, id: RequestId, kinds: &[PermissionKind]) {
        self.launches.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(%id, ?kinds, "permission prompt shown");

        if self.hold {
            self.held.lock().push(id);
            return;
        }

        let status = self.status.clone();
        let handler = self.handler.read().clone();
        let answer = self.answer.read().clone();
        let duplicate = self.duplicate.load(Ordering::SeqCst);
        let delay = self.delay;

        tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            dispatch(&status, handler, id, answer, duplicate);
        });
    }
}
