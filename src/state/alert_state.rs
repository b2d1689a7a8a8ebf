//! SOS alert state machine
//!
//! ```text
//!   Idle ──begin_countdown──► CountingDown ──tick→0 / skip──► Active
//!    ▲                            │                             │
//!    └──────cancel_countdown──────┘                             │
//!    └──────────────────────────deactivate──────────────────────┘
//! ```
//!
//! Pure transitions only. Timers and side effects live in
//! [`crate::sos::SosSession`].

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SosError;

/// Discrete phase of the alert lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    CountingDown,
    Active,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::CountingDown => write!(f, "counting down"),
            Self::Active => write!(f, "active"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Inner {
    Idle,
    CountingDown { seconds_remaining: u32 },
    Active { activated_at: DateTime<Utc> },
}

/// Result of a single countdown tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Still counting, this many seconds left
    Remaining(u32),
    /// Countdown elapsed and the alert is now active
    Activated(DateTime<Utc>),
}

/// The alert lifecycle state, owned by exactly one SOS session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertState {
    inner: Inner,
}

impl AlertState {
    /// Create a new idle alert state
    pub fn new() -> Self {
        Self { inner: Inner::Idle }
    }

    pub fn phase(&self) -> Phase {
        match self.inner {
            Inner::Idle => Phase::Idle,
            Inner::CountingDown { .. } => Phase::CountingDown,
            Inner::Active { .. } => Phase::Active,
        }
    }

    /// Seconds left before activation, only while counting down
    pub fn seconds_remaining(&self) -> Option<u32> {
        match self.inner {
            Inner::CountingDown { seconds_remaining } => Some(seconds_remaining),
            _ => None,
        }
    }

    /// When the alert went active, only while active
    pub fn activated_at(&self) -> Option<DateTime<Utc>> {
        match self.inner {
            Inner::Active { activated_at } => Some(activated_at),
            _ => None,
        }
    }

    fn invalid(&self, operation: &'static str) -> SosError {
        SosError::InvalidTransition {
            operation,
            phase: self.phase(),
        }
    }

    /// Idle → CountingDown. A zero-length countdown is allowed; the caller
    /// activates it right away.
    pub fn begin_countdown(&mut self, seconds: u32) -> Result<(), SosError> {
        match self.inner {
            Inner::Idle => {
                self.inner = Inner::CountingDown {
                    seconds_remaining: seconds,
                };
                Ok(())
            }
            _ => Err(self.invalid("start the countdown")),
        }
    }

    /// Decrement the countdown. Reaching zero activates the alert at `now`.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Result<Tick, SosError> {
        match self.inner {
            Inner::CountingDown { seconds_remaining } => {
                let left = seconds_remaining.saturating_sub(1);
                if left == 0 {
                    self.inner = Inner::Active { activated_at: now };
                    Ok(Tick::Activated(now))
                } else {
                    self.inner = Inner::CountingDown {
                        seconds_remaining: left,
                    };
                    Ok(Tick::Remaining(left))
                }
            }
            _ => Err(self.invalid("tick")),
        }
    }

    /// CountingDown → Active, skipping whatever is left of the countdown
    pub fn activate(&mut self, now: DateTime<Utc>) -> Result<DateTime<Utc>, SosError> {
        match self.inner {
            Inner::CountingDown { .. } => {
                self.inner = Inner::Active { activated_at: now };
                Ok(now)
            }
            _ => Err(self.invalid("activate")),
        }
    }

    /// CountingDown → Idle
    pub fn cancel_countdown(&mut self) -> Result<(), SosError> {
        match self.inner {
            Inner::CountingDown { .. } => {
                self.inner = Inner::Idle;
                Ok(())
            }
            _ => Err(self.invalid("cancel the countdown")),
        }
    }

    /// Active → Idle, returning the activation time that was cleared
    pub fn deactivate(&mut self) -> Result<DateTime<Utc>, SosError> {
        match self.inner {
            Inner::Active { activated_at } => {
                self.inner = Inner::Idle;
                Ok(activated_at)
            }
            _ => Err(self.invalid("deactivate")),
        }
    }
}

impl Default for AlertState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn counting(seconds: u32) -> AlertState {
        let mut state = AlertState::new();
        state.begin_countdown(seconds).unwrap();
        state
    }

    #[test]
    fn starts_idle_without_countdown_or_activation() {
        let state = AlertState::new();
        assert_eq!(state.phase(), Phase::Idle);
        assert_eq!(state.seconds_remaining(), None);
        assert_eq!(state.activated_at(), None);
    }

    #[test]
    fn five_ticks_activate() {
        let mut state = counting(5);
        let now = Utc::now();
        for expected in [4, 3, 2, 1] {
            assert_eq!(state.tick(now).unwrap(), Tick::Remaining(expected));
            assert_eq!(state.phase(), Phase::CountingDown);
        }
        assert_eq!(state.tick(now).unwrap(), Tick::Activated(now));
        assert_eq!(state.phase(), Phase::Active);
        assert_eq!(state.activated_at(), Some(now));
        assert_eq!(state.seconds_remaining(), None);
    }

    #[test]
    fn tick_at_one_transitions_instead_of_going_negative() {
        let mut state = counting(1);
        let now = Utc::now();
        assert!(matches!(state.tick(now), Ok(Tick::Activated(_))));
        assert_eq!(state.phase(), Phase::Active);
        assert!(state.tick(now).is_err());
    }

    #[test]
    fn cancel_returns_to_idle() {
        let mut state = counting(5);
        state.tick(Utc::now()).unwrap();
        state.tick(Utc::now()).unwrap();
        state.cancel_countdown().unwrap();
        assert_eq!(state.phase(), Phase::Idle);
        assert_eq!(state.seconds_remaining(), None);
    }

    #[test]
    fn active_is_never_entered_from_idle() {
        let mut state = AlertState::new();
        let err = state.activate(Utc::now()).unwrap_err();
        assert_eq!(
            err,
            SosError::InvalidTransition {
                operation: "activate",
                phase: Phase::Idle
            }
        );
        assert_eq!(state.phase(), Phase::Idle);
        assert!(state.tick(Utc::now()).is_err());
    }

    #[test]
    fn deactivate_is_rejected_unless_active() {
        let mut idle = AlertState::new();
        assert!(idle.deactivate().is_err());
        assert_eq!(idle.phase(), Phase::Idle);

        let mut counting = counting(3);
        assert!(counting.deactivate().is_err());
        assert_eq!(counting.seconds_remaining(), Some(3));
    }

    #[test]
    fn deactivate_clears_activation_time() {
        let mut state = counting(2);
        let at = state.activate(Utc::now()).unwrap();
        assert_eq!(state.deactivate().unwrap(), at);
        assert_eq!(state.phase(), Phase::Idle);
        assert_eq!(state.activated_at(), None);
    }

    #[test]
    fn active_cannot_restart_countdown_or_cancel() {
        let mut state = counting(1);
        state.tick(Utc::now()).unwrap();
        assert!(state.begin_countdown(5).is_err());
        assert!(state.cancel_countdown().is_err());
        assert_eq!(state.phase(), Phase::Active);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Begin(u32),
        Tick,
        Cancel,
        Activate,
        Deactivate,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0u32..6).prop_map(Op::Begin),
            Just(Op::Tick),
            Just(Op::Cancel),
            Just(Op::Activate),
            Just(Op::Deactivate),
        ]
    }

    proptest! {
        #[test]
        fn phase_data_stays_consistent_for_any_sequence(
            ops in prop::collection::vec(op_strategy(), 0..200)
        ) {
            let mut state = AlertState::new();
            let now = Utc::now();
            for op in ops {
                let before = state.clone();
                let outcome = match op {
                    Op::Begin(seconds) => state.begin_countdown(seconds).map(|_| ()),
                    Op::Tick => state.tick(now).map(|_| ()),
                    Op::Cancel => state.cancel_countdown(),
                    Op::Activate => state.activate(now).map(|_| ()),
                    Op::Deactivate => state.deactivate().map(|_| ()),
                };
                if outcome.is_err() {
                    prop_assert_eq!(&state, &before, "rejected operation must not mutate state");
                }
                match state.phase() {
                    Phase::Idle => prop_assert!(
                        state.seconds_remaining().is_none() && state.activated_at().is_none()
                    ),
                    Phase::CountingDown => prop_assert!(
                        state.seconds_remaining().is_some() && state.activated_at().is_none()
                    ),
                    Phase::Active => prop_assert!(
                        state.seconds_remaining().is_none() && state.activated_at().is_some()
                    ),
                }
            }
        }
    }
}
