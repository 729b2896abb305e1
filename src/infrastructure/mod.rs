//! Infrastructure Layer
//!
//! Cross-cutting primitives: one-shot callback bridging and action scopes.

pub mod pending;
pub mod scope;

pub use pending::{pending_request, Completer, PendingError, PendingRequest, ResolveError};
pub use scope::{cancel_on_signal, ActionGuard, ActionScope, ScopeCancelled};
