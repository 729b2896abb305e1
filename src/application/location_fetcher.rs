//! Location Fetcher - last known location use case
//!
//! Checks consent, then turns the platform's callback based "last location"
//! query into a single awaitable result.

use crate::domain::entities::Coordinate;
use crate::domain::ports::{LocationListener, LocationProvider, PermissionStatus};
use crate::infrastructure::pending::{pending_request, PendingError};
use std::sync::{Arc, OnceLock};

/// Why no coordinate was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LocationError {
    /// Neither fine nor coarse location is granted; the platform was not asked.
    #[error("permission denied.")]
    PermissionDenied,
    /// The platform has no cached position.
    #[error("location is null")]
    LocationUnavailable,
    /// The caller was torn down while the query was pending. Logged only.
    #[error("cancelled while pending")]
    CancelledWhilePending,
    /// The platform dropped the query without ever answering.
    #[error("location request abandoned by the platform")]
    Abandoned,
}

/// Outcome of one fetch attempt.
pub type LocationResult = Result<Coordinate, LocationError>;

type ClientFactory = Box<dyn Fn() -> Arc<dyn LocationProvider> + Send + Sync>;

/// Last known location fetcher.
///
/// The platform client is built on first use from `factory` and then shared
/// by every fetch.
pub struct LocationFetcher {
    status: Arc<dyn PermissionStatus>,
    client: OnceLock<Arc<dyn LocationProvider>>,
    factory: ClientFactory,
}

impl LocationFetcher {
    /// Create a fetcher whose client is built lazily by `factory`.
    pub fn new<F>(status: Arc<dyn PermissionStatus>, factory: F) -> Self
    where
        F: Fn() -> Arc<dyn LocationProvider> + Send + Sync + 'static,
    {
        Self {
            status,
            client: OnceLock::new(),
            factory: Box::new(factory),
        }
    }

    /// Create a fetcher around an already built client.
    pub fn with_client(status: Arc<dyn PermissionStatus>, client: Arc<dyn LocationProvider>) -> Self {
        let fetcher = Self::new(status, {
            let client = client.clone();
            move || client.clone()
        });
        let _ = fetcher.client.set(client);
        fetcher
    }

    /// Whether the platform client has been built yet.
    pub fn is_client_initialized(&self) -> bool {
        self.client.get().is_some()
    }

    fn client(&self) -> &Arc<dyn LocationProvider> {
        self.client.get_or_init(|| {
            tracing::debug!("creating location client");
            (self.factory)()
        })
    }

    /// Fetch the device's last known location.
    ///
    /// Fails fast with `PermissionDenied` when neither location permission is
    /// granted. A missing location is `LocationUnavailable`, never `0,0`.
    #[tracing::instrument(skip_all)]
    pub async fn fetch_location(&self) -> LocationResult {
        if !self.status.any_location_granted() {
            return Err(LocationError::PermissionDenied);
        }

        let (completer, pending) = pending_request::<Option<Coordinate>>("last_location");
        let pending = pending.on_cancel(|| {
            tracing::warn!(
                error = %LocationError::CancelledWhilePending,
                "location query detached"
            );
        });

        let listener: LocationListener = Arc::new(move |location| {
            tracing::debug!(?location, "location delivered");
            if let Err(e) = completer.resolve(location) {
                tracing::debug!(error = %e, "location not delivered");
            }
        });
        self.client().last_location(listener);

        match pending.await {
            Ok(Some(coordinate)) => Ok(coordinate),
            Ok(None) => Err(LocationError::LocationUnavailable),
            Err(PendingError::Dropped) => Err(LocationError::Abandoned),
        }
    }
}
