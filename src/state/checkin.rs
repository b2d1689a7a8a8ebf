//! Status check-in board: current status, history and reminder settings

use std::{collections::VecDeque, time::Duration};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::OptionError;

/// Reminder intervals offered to the user, in minutes
pub const CHECK_IN_INTERVALS: &[u64] = &[15, 30, 60, 120];

const HISTORY_LIMIT: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusLevel {
    Safe,
    Caution,
    Emergency,
}

impl StatusLevel {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Safe => "I'm Safe",
            Self::Caution => "Caution",
            Self::Emergency => "Emergency",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusEntry {
    pub level: StatusLevel,
    pub message: Option<String>,
    pub at: DateTime<Utc>,
}

impl StatusEntry {
    /// Text sent to contacts for this update
    pub fn outbound_text(&self) -> String {
        match &self.message {
            Some(message) => format!("Status update: {} - {}", self.level.label(), message),
            None => format!("Status update: {}", self.level.label()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckInSettings {
    pub auto_check_in: bool,
    pub interval_minutes: u64,
    pub notify_contacts: bool,
}

impl CheckInSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_minutes * 60)
    }
}

impl Default for CheckInSettings {
    fn default() -> Self {
        Self {
            auto_check_in: true,
            interval_minutes: 60,
            notify_contacts: true,
        }
    }
}

/// Current status plus newest-first history
#[derive(Debug, Clone, Serialize)]
pub struct CheckInBoard {
    pub current: StatusLevel,
    pub settings: CheckInSettings,
    pub history: VecDeque<StatusEntry>,
}

impl CheckInBoard {
    pub fn new() -> Self {
        Self {
            current: StatusLevel::Safe,
            settings: CheckInSettings::default(),
            history: VecDeque::new(),
        }
    }

    /// Record a status update. Blank messages are dropped.
    pub fn record(&mut self, level: StatusLevel, message: Option<String>) -> StatusEntry {
        let message = message
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty());
        let entry = StatusEntry {
            level,
            message,
            at: Utc::now(),
        };
        self.current = level;
        self.history.push_front(entry.clone());
        self.history.truncate(HISTORY_LIMIT);
        entry
    }

    /// Replace the settings after validating the reminder interval
    pub fn apply_settings(&mut self, settings: CheckInSettings) -> Result<(), OptionError> {
        if !CHECK_IN_INTERVALS.contains(&settings.interval_minutes) {
            return Err(OptionError::UnsupportedInterval {
                minutes: settings.interval_minutes,
                allowed: CHECK_IN_INTERVALS,
            });
        }
        self.settings = settings;
        Ok(())
    }
}

impl Default for CheckInBoard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_is_newest_first() {
        let mut board = CheckInBoard::new();
        board.record(StatusLevel::Safe, Some("Reached home".into()));
        board.record(StatusLevel::Caution, Some("Taking an unfamiliar route".into()));
        assert_eq!(board.current, StatusLevel::Caution);
        assert_eq!(board.history[0].level, StatusLevel::Caution);
        assert_eq!(board.history.len(), 2);
    }

    #[test]
    fn blank_message_is_dropped() {
        let mut board = CheckInBoard::new();
        let entry = board.record(StatusLevel::Safe, Some("   ".into()));
        assert_eq!(entry.message, None);
        assert_eq!(entry.outbound_text(), "Status update: I'm Safe");
    }

    #[test]
    fn history_is_bounded() {
        let mut board = CheckInBoard::new();
        for _ in 0..(HISTORY_LIMIT + 10) {
            board.record(StatusLevel::Safe, None);
        }
        assert_eq!(board.history.len(), HISTORY_LIMIT);
    }

    #[test]
    fn only_offered_intervals_are_accepted() {
        let mut board = CheckInBoard::new();
        let bad = CheckInSettings {
            interval_minutes: 45,
            ..CheckInSettings::default()
        };
        assert!(board.apply_settings(bad).is_err());
        assert_eq!(board.settings.interval_minutes, 60);

        let good = CheckInSettings {
            interval_minutes: 15,
            auto_check_in: false,
            notify_contacts: false,
        };
        board.apply_settings(good).unwrap();
        assert_eq!(board.settings, good);
        assert_eq!(board.settings.interval(), Duration::from_secs(900));
    }
}
