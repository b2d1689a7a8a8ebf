//! Vibration capability

use std::{
    sync::atomic::{AtomicBool, Ordering},
    time::Duration,
};

use tracing::{debug, info};

use crate::error::ServiceError;

/// Short buzz on every countdown second
pub const COUNTDOWN_PULSE: Duration = Duration::from_millis(200);

/// Wait/on/off intervals of the active-alert pattern, repeated until cancelled
pub const SOS_PATTERN: [Duration; 6] = [
    Duration::from_millis(0),
    Duration::from_millis(300),
    Duration::from_millis(200),
    Duration::from_millis(300),
    Duration::from_millis(200),
    Duration::from_millis(300),
];

pub trait HapticDevice: Send + Sync {
    fn vibrate_once(&self, duration: Duration) -> Result<(), ServiceError>;
    fn vibrate_pattern(&self, intervals: &[Duration], repeat: bool) -> Result<(), ServiceError>;
    /// Stop any running pattern. Calling it with nothing running is fine.
    fn cancel_vibration(&self) -> Result<(), ServiceError>;
}

/// Stand-in for hosts without a vibration motor: logs what it would do
#[derive(Debug, Default)]
pub struct LogHaptics {
    running: AtomicBool,
}

impl HapticDevice for LogHaptics {
    fn vibrate_once(&self, duration: Duration) -> Result<(), ServiceError> {
        debug!("Vibrate {}ms", duration.as_millis());
        Ok(())
    }

    fn vibrate_pattern(&self, intervals: &[Duration], repeat: bool) -> Result<(), ServiceError> {
        let millis: Vec<u128> = intervals.iter().map(Duration::as_millis).collect();
        info!("Vibration pattern {:?} (repeat={})", millis, repeat);
        self.running.store(repeat, Ordering::SeqCst);
        Ok(())
    }

    fn cancel_vibration(&self) -> Result<(), ServiceError> {
        if self.running.swap(false, Ordering::SeqCst) {
            info!("Vibration cancelled");
        }
        Ok(())
    }
}
