//! Application Layer
//!
//! Use cases: the permission gate, the location fetcher and the flow that
//! chains them for one button press.

pub mod location_fetcher;
pub mod location_flow;
pub mod permission_gate;

pub use location_fetcher::{LocationError, LocationFetcher, LocationResult};
pub use location_flow::{FlowError, LocationFlow};
pub use permission_gate::{PermissionError, PermissionGate};
