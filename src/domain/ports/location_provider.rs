//! Location Provider Port
//!
//! Defines the interface to the platform's fused location client.

use crate::domain::entities::Coordinate;
use std::sync::Arc;

/// Success listener for a last-location query.
///
/// `None` means the platform has no cached position. Platforms are not
/// trusted to call the listener exactly once.
pub type LocationListener = Arc<dyn Fn(Option<Coordinate>) + Send + Sync>;

/// Platform location client.
///
/// This is an outbound port. The query is callback based: the call returns
/// immediately and the listener fires later from a platform thread.
pub trait LocationProvider: Send + Sync {
    /// Ask for the last known location without requesting a new fix.
    fn last_location(&self, listener: LocationListener);
}
