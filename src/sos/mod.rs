//! SOS alert lifecycle
//!
//! [`SosSession`] owns the alert state machine together with its countdown,
//! vibration and pulse timers. Quick actions and outbound notifications are
//! best-effort and never feed back into the alert phase.

pub mod dispatch;
pub mod messages;
pub mod pulse;
pub mod quick_action;
pub mod session;

pub use messages::{Choice, Prompt};
pub use quick_action::QuickAction;
pub use session::{AlertSnapshot, Confirmed, SosSession, SosSettings};
