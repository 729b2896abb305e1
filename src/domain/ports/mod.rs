mod location_provider;
mod permission_prompt;
mod permission_status;

pub use location_provider::{LocationListener, LocationProvider};
pub use permission_prompt::{PermissionPrompt, PermissionResultHandler};
pub use permission_status::PermissionStatus;
