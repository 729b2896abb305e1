//! Location Screen Adapter
//!
//! The single screen: one "get location" button and one text area, driven
//! through the application flow.

use crate::application::{FlowError, LocationFlow};
use crate::infrastructure::scope::ActionScope;
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Location screen - inbound adapter for the user.
///
/// This adapter:
/// 1. Launches the location flow when the button is pressed
/// 2. Runs it inside the screen's scope so closing the screen abandons it
/// 3. Shows `<lat>,<lon>` or the error message in the text area
pub struct LocationScreen {
    flow: Arc<LocationFlow>,
    scope: ActionScope,
    text: Arc<RwLock<String>>,
}

impl LocationScreen {
    /// Create a screen with an empty text area.
    pub fn new(flow: Arc<LocationFlow>) -> Self {
        Self {
            flow,
            scope: ActionScope::new(),
            text: Arc::new(RwLock::new(String::new())),
        }
    }

    /// Current content of the text area.
    pub fn text(&self) -> String {
        self.text.read().clone()
    }

    pub fn scope(&self) -> &ActionScope {
        &self.scope
    }

    /// Handle a press of the "get location" button.
    ///
    /// The returned handle completes once the text area has been updated,
    /// or the action was abandoned because the screen closed.
    pub fn press_button(&self) -> JoinHandle<()> {
        let flow = self.flow.clone();
        let scope = self.scope.clone();
        let text = self.text.clone();
        let guard = scope.action_guard();

        tokio::spawn(async move {
            let _guard = guard;
            let result = flow.run_in(&scope).await;
            if let Err(FlowError::Cancelled) = result {
                tracing::debug!("get location abandoned, screen closed");
                return;
            }
            *text.write() = LocationFlow::render(&result);
        })
    }

    /// Close the screen, abandoning any action still waiting.
    pub fn close(&self) {
        self.scope.cancel();
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::adapters::outbound::{
        DashMapPermissionStatus, SimulatedLocationProvider, SimulatedPermissionPrompt,
    };
    use crate::application::{LocationFetcher, PermissionGate};
    use crate::domain::entities::{Coordinate, PermissionGrants, PermissionKind};
    use crate::domain::value_objects::PermissionPolicy;
    use std::time::Duration;

    fn screen(
        answer: PermissionGrants,
        last_known: Option<Coordinate>,
        location_delay: Duration,
    ) -> (LocationScreen, Arc<SimulatedLocationProvider>) {
        let status = Arc::new(DashMapPermissionStatus::new());
        let prompt = Arc::new(SimulatedPermissionPrompt::new(status.clone(), answer));
        let provider = Arc::new(SimulatedLocationProvider::new(last_known).with_delay(location_delay));

        let gate = Arc::new(PermissionGate::new(prompt, PermissionPolicy::default()));
        let fetcher = Arc::new(LocationFetcher::with_client(status, provider.clone()));
        let flow = Arc::new(LocationFlow::new(gate, fetcher));
        (LocationScreen::new(flow), provider)
    }

    fn both_granted() -> PermissionGrants {
        PermissionGrants::new()
            .with(PermissionKind::Fine, true)
            .with(PermissionKind::Coarse, true)
    }

    #[tokio::test]
    async fn test_text_starts_empty() {
        let (screen, _) = screen(both_granted(), None, Duration::ZERO);
        assert_eq!(screen.text(), "");
    }

    #[tokio::test]
    async fn test_press_shows_coordinate() {
        let (screen, _) = screen(
            both_granted(),
            Some(Coordinate::new(37.7749, -122.4194)),
            Duration::ZERO,
        );

        screen.press_button().await.unwrap();
        assert_eq!(screen.text(), "37.7749,-122.4194");
        assert_eq!(screen.scope().active_actions(), 0);
    }

    #[tokio::test]
    async fn test_press_shows_denied() {
        let (screen, provider) = screen(PermissionGrants::new(), None, Duration::ZERO);

        screen.press_button().await.unwrap();
        assert_eq!(screen.text(), "denied.");
        assert_eq!(provider.query_count(), 0);
    }

    #[tokio::test]
    async fn test_press_shows_null_location() {
        let (screen, _) = screen(both_granted(), None, Duration::ZERO);

        screen.press_button().await.unwrap();
        assert_eq!(screen.text(), "location is null");
    }

    #[tokio::test]
    async fn test_close_before_callback_keeps_text() {
        let (screen, _) = screen(
            both_granted(),
            Some(Coordinate::new(1.0, 2.0)),
            Duration::from_millis(200),
        );

        let handle = screen.press_button();
        tokio::time::sleep(Duration::from_millis(20)).await;
        screen.close();

        handle.await.unwrap();
        assert_eq!(screen.text(), "");

        // The provider's late answer must not reach the screen either.
        tokio::time::sleep(Duration::from_millis(250)).await;
        assert_eq!(screen.text(), "");
    }

    #[tokio::test]
    async fn test_second_press_replaces_text() {
        let (screen, provider) = screen(both_granted(), None, Duration::ZERO);

        screen.press_button().await.unwrap();
        assert_eq!(screen.text(), "location is null");

        provider.set_last_known(Some(Coordinate::new(3.0, 4.0)));
        screen.press_button().await.unwrap();
        assert_eq!(screen.text(), "3,4");
    }
}
