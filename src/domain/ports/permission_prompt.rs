//! Permission Prompt Port
//!
//! Defines the interface to the platform's runtime permission dialog.

use crate::domain::entities::{PermissionGrants, PermissionKind};
use crate::domain::value_objects::RequestId;
use std::sync::Arc;

/// Callback receiving the outcome of a prompt.
///
/// Registered once; every result the platform produces comes back through it.
pub type PermissionResultHandler = Arc<dyn Fn(RequestId, PermissionGrants) + Send + Sync>;

/// Platform permission dialog.
///
/// This is an outbound port. The dialog is event based: `launch` returns
/// immediately and the user's answer is delivered later, on some other
/// thread, to the handler passed to `register`.
pub trait PermissionPrompt: Send + Sync {
    /// Install the result handler. Called once when the gate is built;
    /// a later registration replaces the earlier one.
    fn register(&self, handler: PermissionResultHandler);

    /// Show the consent prompt for `kinds`.
    ///
    /// The result is delivered to the registered handler tagged with `id`.
    fn launch(&self, id: RequestId, kinds: &[PermissionKind]);
}
