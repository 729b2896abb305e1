//! DashMap Permission Status
//!
//! Implements PermissionStatus using DashMap for lock-free concurrent access.

use crate::domain::entities::{PermissionGrants, PermissionKind};
use crate::domain::ports::PermissionStatus;
use dashmap::DashMap;

/// DashMap-backed grant state.
///
/// Plays the platform's permission database: the simulated prompt writes
/// the user's answers here and the location fetcher reads them back.
pub struct DashMapPermissionStatus {
    grants: DashMap<PermissionKind, bool>,
}

impl DashMapPermissionStatus {
    /// Create a store where nothing is granted.
    pub fn new() -> Self {
        Self {
            grants: DashMap::new(),
        }
    }

    pub fn grant(&self, kind: PermissionKind) {
        self.grants.insert(kind, true);
    }

    pub fn revoke(&self, kind: PermissionKind) {
        self.grants.insert(kind, false);
    }

    /// Apply every answer from a prompt result.
    pub fn record(&self, grants: &PermissionGrants) {
        for (kind, granted) in grants.iter() {
            self.grants.insert(kind, granted);
        }
    }
}

impl Default for DashMapPermissionStatus {
    fn default() -> Self {
        Self::new()
    }
}

impl PermissionStatus for DashMapPermissionStatus {
    fn is_granted(&self, kind: PermissionKind) -> bool {
        self.grants.get(&kind).map(|e| *e.value()).unwrap_or(false)
    }
}
