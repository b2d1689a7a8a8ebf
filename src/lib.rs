//! SOS Guardian - a personal-safety daemon
//!
//! Hosts the SOS alert lifecycle (countdown, activation, deactivation and
//! quick actions) together with the supporting screens of a safety app:
//! emergency contacts, theme preference, status check-ins and smart tracking.

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod sos;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use sos::SosSession;
pub use state::AppState;
pub use utils::signals::shutdown_signal;
