//! location-bridge - single-screen "get location" demo
//!
//! This is the composition root that wires the simulated platform to the
//! permission gate, the location fetcher and the screen.

use location_bridge::adapters::inbound::LocationScreen;
use location_bridge::adapters::outbound::{
    DashMapPermissionStatus, SimulatedLocationProvider, SimulatedPermissionPrompt,
};
use location_bridge::application::{LocationFetcher, LocationFlow, PermissionGate};
use location_bridge::domain::entities::{PermissionGrants, PermissionKind};
use location_bridge::domain::ports::LocationProvider;
use location_bridge::infrastructure::cancel_on_signal;
use location_bridge::load_config;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::fmt::format::FmtSpan;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment
    let cfg = load_config()?;

    // Setup logging
    let log_level = if cfg.debug {
        tracing::Level::TRACE
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_span_events(FmtSpan::CLOSE)
        .init();

    tracing::info!(
        "starting location-bridge policy={} fine={} coarse={}",
        cfg.permission_policy,
        cfg.grant_fine,
        cfg.grant_coarse
    );

    // ===== COMPOSITION ROOT =====

    // 1. Simulated platform
    let status = Arc::new(DashMapPermissionStatus::new());

    let answer = PermissionGrants::new()
        .with(PermissionKind::Fine, cfg.grant_fine)
        .with(PermissionKind::Coarse, cfg.grant_coarse);
    let prompt = Arc::new(
        SimulatedPermissionPrompt::new(status.clone(), answer)
            .with_delay(Duration::from_millis(cfg.prompt_delay_ms)),
    );

    // Location client is built on first fetch, like the platform singleton
    let last_known = cfg.last_known;
    let location_delay = Duration::from_millis(cfg.location_delay_ms);
    let fetcher = Arc::new(LocationFetcher::new(status, move || {
        Arc::new(SimulatedLocationProvider::new(last_known).with_delay(location_delay))
            as Arc<dyn LocationProvider>
    }));

    // 2. Application services
    let gate = Arc::new(PermissionGate::new(prompt, cfg.permission_policy));
    let flow = Arc::new(LocationFlow::new(gate, fetcher));

    // 3. Screen: press the button once and show the text
    let screen = LocationScreen::new(flow);
    tokio::spawn(cancel_on_signal(screen.scope().clone()));

    screen.press_button().await?;

    if screen.scope().is_cancelled() {
        tracing::info!("screen closed before the location arrived");
    } else {
        println!("{}", screen.text());
    }

    Ok(())
}
