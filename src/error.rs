//! Error types shared across the daemon

use std::path::PathBuf;
use thiserror::Error;

use crate::state::Phase;

/// Errors raised by the SOS alert lifecycle
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SosError {
    /// An operation was requested from a phase that does not allow it.
    /// The machine is left untouched.
    #[error("cannot {operation} while SOS is {phase}")]
    InvalidTransition {
        operation: &'static str,
        phase: Phase,
    },

    /// A tick from a countdown that has since been cancelled or replaced
    #[error("countdown timer {timer} is stale, current is {current}")]
    StaleCountdown { timer: u64, current: u64 },
}

/// Failures reported by device capabilities (location, messaging, haptics, ...)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// The user refused location access
    #[error("permission to access location was denied")]
    PermissionDenied,

    /// No location fix could be obtained
    #[error("location is unavailable")]
    LocationUnavailable,

    /// The messaging/SMS capability is absent on this device
    #[error("messaging is not available on this device")]
    ChannelUnavailable,

    /// The capability exists but the call failed
    #[error("{capability} failed: {message}")]
    Failed {
        capability: &'static str,
        message: String,
    },
}

impl ServiceError {
    /// Create a failure for the named capability
    pub fn failed(capability: &'static str, message: impl Into<String>) -> Self {
        Self::Failed {
            capability,
            message: message.into(),
        }
    }
}

/// Validation and lookup errors of the contacts store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContactError {
    #[error("please enter both name and phone number")]
    MissingField,

    #[error("contact {0} not found")]
    NotFound(u64),

    #[error("you cannot delete your primary emergency contact")]
    PrimaryProtected,
}

/// Settings persistence errors
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write settings file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("settings file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("settings store lock poisoned")]
    Poisoned,
}

/// Rejected check-in or tracking settings
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionError {
    #[error("{minutes} minutes is not one of the offered intervals {allowed:?}")]
    UnsupportedInterval {
        minutes: u64,
        allowed: &'static [u64],
    },
}
