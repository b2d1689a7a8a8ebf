//! Smart tracking session state

use serde::{Deserialize, Serialize};

use crate::{error::OptionError, utils::format_mm_ss};

/// Tracking durations offered to the user, in minutes
pub const TRACKING_DURATIONS: &[u64] = &[15, 30, 60, 120];

/// How often a running session shares its location when sharing is on
pub const SHARE_EVERY_SECONDS: u64 = 60;

/// Outcome of advancing the tracking clock by one second
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingTick {
    Idle,
    Running { share_location_now: bool },
    Finished,
}

/// Tracking state for a timed journey
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingState {
    pub active: bool,
    pub share_location: bool,
    pub duration_minutes: u64,
    pub elapsed_seconds: u64,
}

impl TrackingState {
    /// Create a new inactive tracking state
    pub fn new() -> Self {
        Self {
            active: false,
            share_location: false,
            duration_minutes: 30,
            elapsed_seconds: 0,
        }
    }

    fn check_duration(minutes: u64) -> Result<(), OptionError> {
        if TRACKING_DURATIONS.contains(&minutes) {
            Ok(())
        } else {
            Err(OptionError::UnsupportedInterval {
                minutes,
                allowed: TRACKING_DURATIONS,
            })
        }
    }

    /// Start tracking, optionally with a new duration
    pub fn start(&mut self, duration_minutes: Option<u64>) -> Result<(), OptionError> {
        if let Some(minutes) = duration_minutes {
            Self::check_duration(minutes)?;
            self.duration_minutes = minutes;
        }
        self.active = true;
        self.elapsed_seconds = 0;
        Ok(())
    }

    pub fn stop(&mut self) {
        self.active = false;
        self.elapsed_seconds = 0;
    }

    /// Change the duration; a running session restarts its clock
    pub fn select_duration(&mut self, minutes: u64) -> Result<(), OptionError> {
        Self::check_duration(minutes)?;
        self.duration_minutes = minutes;
        if self.active {
            self.elapsed_seconds = 0;
        }
        Ok(())
    }

    pub fn total_seconds(&self) -> u64 {
        self.duration_minutes * 60
    }

    /// Seconds left, only while active
    pub fn remaining_seconds(&self) -> Option<u64> {
        if self.active {
            Some(self.total_seconds().saturating_sub(self.elapsed_seconds))
        } else {
            None
        }
    }

    /// Remaining time as `MM:SS`
    pub fn remaining_label(&self) -> String {
        format_mm_ss(self.remaining_seconds().unwrap_or(self.total_seconds()))
    }

    /// Advance one second. Reaching the duration stops tracking.
    pub fn advance(&mut self) -> TrackingTick {
        if !self.active {
            return TrackingTick::Idle;
        }
        if self.elapsed_seconds >= self.total_seconds() {
            self.stop();
            return TrackingTick::Finished;
        }
        self.elapsed_seconds += 1;
        let share_location_now =
            self.share_location && self.elapsed_seconds % SHARE_EVERY_SECONDS == 0;
        TrackingTick::Running { share_location_now }
    }
}

impl Default for TrackingState {
    fn default() -> Self {
        Self::new()
    }
}
