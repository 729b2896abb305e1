//! Location Flow - the "get location" user action
//!
//! Permission first, then the fetch, strictly in sequence. Every failure is
//! caught here and turned into the text shown to the user.

use crate::application::location_fetcher::{LocationError, LocationFetcher};
use crate::application::permission_gate::{PermissionError, PermissionGate};
use crate::domain::entities::Coordinate;
use crate::infrastructure::scope::{ActionScope, ScopeCancelled};
use std::sync::Arc;

/// Failures of the composed action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FlowError {
    /// The user refused both location permissions.
    #[error("denied.")]
    Denied,
    #[error(transparent)]
    Permission(#[from] PermissionError),
    #[error(transparent)]
    Location(#[from] LocationError),
    /// The enclosing scope was torn down; nobody is waiting for the text.
    #[error("cancelled")]
    Cancelled,
}

impl From<ScopeCancelled> for FlowError {
    fn from(_: ScopeCancelled) -> Self {
        Self::Cancelled
    }
}

/// Location flow - main application use case.
///
/// This service orchestrates one button press:
/// 1. Asks the permission gate for location consent
/// 2. Fetches the last known location if consent was given
/// 3. Renders the outcome as display text
pub struct LocationFlow {
    gate: Arc<PermissionGate>,
    fetcher: Arc<LocationFetcher>,
}

impl LocationFlow {
    pub fn new(gate: Arc<PermissionGate>, fetcher: Arc<LocationFetcher>) -> Self {
        Self { gate, fetcher }
    }

    pub fn gate(&self) -> &PermissionGate {
        &self.gate
    }

    pub fn fetcher(&self) -> &LocationFetcher {
        &self.fetcher
    }

    /// Run the action: permission, then location.
    ///
    /// The fetch is only issued after the gate has answered `true`.
    #[tracing::instrument(name = "get_location", skip_all)]
    pub async fn run(&self) -> Result<Coordinate, FlowError> {
        tracing::trace!("get location started");
        let granted = self.gate.request_location_permission().await?;
        if !granted {
            return Err(FlowError::Denied);
        }
        Ok(self.fetcher.fetch_location().await?)
    }

    /// Run the action inside `scope`; tearing the scope down yields `Cancelled`.
    pub async fn run_in(&self, scope: &ActionScope) -> Result<Coordinate, FlowError> {
        scope.run(self.run()).await?
    }

    /// Text shown for an outcome: `<lat>,<lon>` or the error message.
    pub fn display(result: &Result<Coordinate, FlowError>) -> String {
        match result {
            Ok(coordinate) => coordinate.to_string(),
            Err(e) => e.to_string(),
        }
    }

    /// Log a finished outcome and return its display text.
    pub fn render(result: &Result<Coordinate, FlowError>) -> String {
        match result {
            Ok(coordinate) => tracing::info!(%coordinate, "location shown"),
            Err(e) => tracing::error!(error = %e, "get location failed"),
        }
        Self::display(result)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::domain::entities::{PermissionGrants, PermissionKind};
    use crate::domain::ports::{
        LocationListener, LocationProvider, PermissionPrompt, PermissionResultHandler,
        PermissionStatus,
    };
    use crate::domain::value_objects::{PermissionPolicy, RequestId};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;
    use tracing_test::traced_test;

    // ===== Mock Implementations =====

    /// Prompt that answers synchronously with a fixed result and flips the
    /// shared grant flag, like the platform would.
    struct InstantPrompt {
        answer: PermissionGrants,
        granted: Arc<AtomicBool>,
        handler: Mutex<Option<PermissionResultHandler>>,
    }

    impl PermissionPrompt for InstantPrompt {
        fn register(&self, handler: PermissionResultHandler) {
            *self.handler.lock().unwrap() = Some(handler);
        }

        fn launch(&self, id: RequestId, _kinds: &[PermissionKind]) {
            self.granted
                .store(self.answer.any_location_granted(), Ordering::SeqCst);
            let handler = self.handler.lock().unwrap().clone();
            if let Some(handler) = handler {
                handler(id, self.answer.clone());
            }
        }
    }

    struct FlagStatus(Arc<AtomicBool>);

    impl PermissionStatus for FlagStatus {
        fn is_granted(&self, _kind: PermissionKind) -> bool {
            self.0.load(Ordering::SeqCst)
        }
    }

    /// Provider that answers immediately, or never when `location` is `Err`.
    struct FixedProvider {
        location: Result<Option<Coordinate>, ()>,
        calls: AtomicUsize,
        parked: Mutex<Vec<LocationListener>>,
    }

    impl LocationProvider for FixedProvider {
        fn last_location(&self, listener: LocationListener) {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.location {
                Ok(location) => listener(location),
                Err(()) => self.parked.lock().unwrap().push(listener),
            }
        }
    }

    fn build(
        answer: PermissionGrants,
        location: Result<Option<Coordinate>, ()>,
    ) -> (LocationFlow, Arc<FixedProvider>) {
        let granted = Arc::new(AtomicBool::new(false));
        let prompt = Arc::new(InstantPrompt {
            answer,
            granted: granted.clone(),
            handler: Mutex::new(None),
        });
        let provider = Arc::new(FixedProvider {
            location,
            calls: AtomicUsize::new(0),
            parked: Mutex::new(Vec::new()),
        });

        let gate = Arc::new(PermissionGate::new(prompt, PermissionPolicy::default()));
        let fetcher = Arc::new(LocationFetcher::with_client(
            Arc::new(FlagStatus(granted)),
            provider.clone(),
        ));
        (LocationFlow::new(gate, fetcher), provider)
    }

    fn granted() -> PermissionGrants {
        PermissionGrants::new().with(PermissionKind::Coarse, true)
    }

    #[tokio::test]
    async fn test_success_shows_coordinate() {
        let (flow, _) = build(granted(), Ok(Some(Coordinate::new(37.7749, -122.4194))));

        let result = flow.run().await;
        assert_eq!(result, Ok(Coordinate::new(37.7749, -122.4194)));
        assert_eq!(LocationFlow::display(&result), "37.7749,-122.4194");
    }

    #[tokio::test]
    async fn test_denial_never_fetches() {
        let (flow, provider) = build(PermissionGrants::new(), Ok(Some(Coordinate::new(1.0, 1.0))));

        assert_eq!(flow.run().await, Err(FlowError::Denied));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
        assert_eq!(LocationFlow::render(&flow.run().await), "denied.");
    }

    #[tokio::test]
    async fn test_null_location_text() {
        let (flow, _) = build(granted(), Ok(None));

        assert_eq!(
            flow.run().await,
            Err(FlowError::Location(LocationError::LocationUnavailable))
        );
        assert_eq!(LocationFlow::render(&flow.run().await), "location is null");
    }

    #[tokio::test]
    async fn test_run_in_cancelled_scope() {
        let (flow, provider) = build(granted(), Err(()));
        let scope = ActionScope::new();
        let ctrl = scope.clone();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            ctrl.cancel();
        });

        let result = flow.run_in(&scope).await;
        assert_eq!(result, Err(FlowError::Cancelled));

        // Late platform answer goes nowhere.
        let parked = provider.parked.lock().unwrap().clone();
        assert_eq!(parked.len(), 1);
        parked[0](Some(Coordinate::new(1.0, 1.0)));
    }

    #[tokio::test]
    async fn test_run_in_live_scope() {
        let (flow, _) = build(granted(), Ok(Some(Coordinate::new(0.5, 0.25))));
        let scope = ActionScope::new();

        assert_eq!(flow.run_in(&scope).await, Ok(Coordinate::new(0.5, 0.25)));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_render_logs_outcome() {
        let (flow, _) = build(PermissionGrants::new(), Ok(None));
        assert_eq!(LocationFlow::render(&flow.run().await), "denied.");
        assert!(logs_contain("get location failed"));

        let ok = Ok(Coordinate::new(1.5, -2.5));
        assert_eq!(LocationFlow::render(&ok), "1.5,-2.5");
        assert!(logs_contain("location shown"));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_run_is_traced_in_its_own_span() {
        let (flow, _) = build(granted(), Ok(Some(Coordinate::new(0.5, 0.25))));

        assert_eq!(flow.run().await, Ok(Coordinate::new(0.5, 0.25)));
        assert!(logs_contain("get_location"));
        assert!(logs_contain("permission prompt launched"));
    }

    #[test]
    fn test_error_display() {
        assert_eq!(FlowError::Denied.to_string(), "denied.");
        assert_eq!(
            FlowError::from(LocationError::PermissionDenied).to_string(),
            "permission denied."
        );
        assert_eq!(
            FlowError::from(PermissionError::Busy).to_string(),
            "a permission request is already in flight"
        );
        assert_eq!(FlowError::from(ScopeCancelled), FlowError::Cancelled);
    }
}
