//! Background tasks module
//!
//! Timers that run alongside the HTTP server: the SOS countdown, the
//! tracking clock and check-in reminders.

pub mod checkin_reminder;
pub mod countdown;
pub mod tracking_timer;

// Re-export main functions
pub use checkin_reminder::checkin_reminder_task;
pub use countdown::countdown_task;
pub use tracking_timer::tracking_timer_task;
