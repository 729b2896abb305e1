//! Domain Entities - Core location objects
//!
//! These entities describe what the platform hands back to us: which
//! permissions the user granted and where the device last was.
//! They have no external dependencies and contain only business logic.

use serde::Deserialize;
use std::collections::HashMap;

/// Granularity of location consent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PermissionKind {
    /// Precise position (GPS)
    Fine,
    /// Approximate position (network / cell)
    Coarse,
}

/// Permission kinds requested by the gate, in priority order.
pub const LOCATION_PERMISSIONS: [PermissionKind; 2] = [PermissionKind::Fine, PermissionKind::Coarse];

impl PermissionKind {
    /// Platform identifier for this permission.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fine => "ACCESS_FINE_LOCATION",
            Self::Coarse => "ACCESS_COARSE_LOCATION",
        }
    }
}

impl std::fmt::Display for PermissionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result map delivered by the platform permission prompt.
///
/// Kinds missing from the map count as denied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionGrants {
    grants: HashMap<PermissionKind, bool>,
}

impl PermissionGrants {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    pub fn with(mut self, kind: PermissionKind, granted: bool) -> Self {
        self.set(kind, granted);
        self
    }

    pub fn set(&mut self, kind: PermissionKind, granted: bool) {
        self.grants.insert(kind, granted);
    }

    pub fn is_granted(&self, kind: PermissionKind) -> bool {
        self.grants.get(&kind).copied().unwrap_or(false)
    }

    /// Whether fine or coarse location was granted.
    pub fn any_location_granted(&self) -> bool {
        LOCATION_PERMISSIONS.iter().any(|k| self.is_granted(*k))
    }

    /// The highest priority granted kind, if any.
    pub fn strongest(&self) -> Option<PermissionKind> {
        LOCATION_PERMISSIONS.iter().copied().find(|k| self.is_granted(*k))
    }

    /// Iterate over every reported kind and its flag.
    pub fn iter(&self) -> impl Iterator<Item = (PermissionKind, bool)> + '_ {
        self.grants.iter().map(|(k, v)| (*k, *v))
    }
}

/// A position on Earth as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Renders as `<lat>,<lon>`, the text shown on screen.
impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}
