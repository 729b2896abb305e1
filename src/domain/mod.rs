//! Domain Layer
//!
//! Entities, value objects and the ports through which the platform is reached.

pub mod entities;
pub mod ports;
pub mod value_objects;

pub use entities::{Coordinate, PermissionGrants, PermissionKind, LOCATION_PERMISSIONS};
pub use value_objects::{PermissionPolicy, RequestId};
