//! location-bridge Library
//!
//! Asks for location permission and reads the device's last known location,
//! bridging the platform's callback APIs into plain `async` calls.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used types
pub use adapters::inbound::LocationScreen;
pub use application::{
    FlowError, LocationError, LocationFetcher, LocationFlow, LocationResult, PermissionError,
    PermissionGate,
};
pub use config::{load_config, Config, ConfigError};
pub use domain::entities::{Coordinate, PermissionGrants, PermissionKind};
pub use domain::ports::{LocationProvider, PermissionPrompt, PermissionStatus};
pub use domain::value_objects::{PermissionPolicy, RequestId};
pub use infrastructure::{pending_request, ActionScope, Completer, PendingRequest};
