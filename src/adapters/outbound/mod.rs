mod dashmap_permission_status;
mod simulated_location_provider;
mod simulated_permission_prompt;

pub use dashmap_permission_status::DashMapPermissionStatus;
pub use simulated_location_provider::SimulatedLocationProvider;
pub use simulated_permission_prompt::SimulatedPermissionPrompt;
