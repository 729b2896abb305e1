//! Simulated Location Provider
//!
//! Implements LocationProvider with a fixed last known position.

use crate::domain::entities::Coordinate;
use crate::domain::ports::{LocationListener, LocationProvider};
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

/// Location client that answers from configuration.
///
/// `None` as the last known position models a device that has never had a
/// fix. Listeners fire on a tokio task after `delay`, or are parked until
/// [`release_all`](Self::release_all) when holding.
pub struct SimulatedLocationProvider {
    last_known: RwLock<Option<Coordinate>>,
    delay: Duration,
    hold: bool,
    held: Mutex<Vec<LocationListener>>,
    queries: AtomicUsize,
    duplicate: AtomicBool,
}

impl SimulatedLocationProvider {
    pub fn new(last_known: Option<Coordinate>) -> Self {
        Self {
            last_known: RwLock::new(last_known),
            delay: Duration::ZERO,
            hold: false,
            held: Mutex::new(Vec::new()),
            queries: AtomicUsize::new(0),
            duplicate: AtomicBool::new(false),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Park listeners until released by hand.
    pub fn hold_results(mut self) -> Self {
        self.hold = true;
        self
    }

    pub fn set_last_known(&self, location: Option<Coordinate>) {
        *self.last_known.write() = location;
    }

    /// Fire every listener twice.
    pub fn deliver_duplicates(&self, enabled: bool) {
        self.duplicate.store(enabled, Ordering::SeqCst);
    }

    /// Number of `last_location` queries received.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    pub fn held_count(&self) -> usize {
        self.held.lock().len()
    }

    /// Answer every parked query with the current last known position.
    pub fn release_all(&self) -> usize {
        let listeners: Vec<LocationListener> = std::mem::take(&mut *self.held.lock());
        let location = *self.last_known.read();
        let duplicate = self.duplicate.load(Ordering::SeqCst);
        for listener in &listeners {
            fire(listener, location, duplicate);
        }
        listeners.len()
    }
}

fn fire(listener: &LocationListener, location: Option<Coordinate>, duplicate: bool) {
    tracing::debug!(?location, "last location answered");
    listener(location);
    if duplicate {
        listener(location);
    }
}

impl LocationProvider for SimulatedLocationProvider {
    fn last_location(&self, listener: LocationListener) {
        self.queries.fetch_add(1, Ordering::SeqCst);

        if self.hold {
            self.held.lock().push(listener);
            return;
        }

        let location = *self.last_known.read();
        let duplicate = self.duplicate.load(Ordering::SeqCst);
        let delay = self.delay;

        tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            fire(&listener, location, duplicate);
        });
    }
}
