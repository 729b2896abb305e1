//! Adapters Layer
//!
//! Inbound adapters drive the application (the screen); outbound adapters
//! stand in for the platform behind the domain ports.

pub mod inbound;
pub mod outbound;
