//! State management module
//!
//! This module contains the SOS alert state machine and the state of the
//! supporting screens (contacts, theme, check-ins, tracking, notices).

pub mod alert_state;
pub mod app_state;
pub mod checkin;
pub mod contacts;
pub mod notices;
pub mod theme;
pub mod tracking_state;

// Re-export main types
pub use alert_state::{AlertState, Phase, Tick};
pub use app_state::AppState;
pub use checkin::{CheckInBoard, CheckInSettings, StatusEntry, StatusLevel, CHECK_IN_INTERVALS};
pub use contacts::{Contact, ContactsStore};
pub use notices::{Notice, NoticeBoard, NoticeKind};
pub use theme::{JsonFileStore, KeyValueStore, MemoryStore, Palette, ThemeSettings};
pub use tracking_state::{TrackingState, TrackingTick, TRACKING_DURATIONS};
