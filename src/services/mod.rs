//! Device capabilities module
//!
//! Location, messaging, vibration, dialing and the alarm, each behind a trait
//! so the SOS lifecycle can run against real hardware, host stand-ins or
//! test fakes.

pub mod emergency;
pub mod haptics;
pub mod location;
pub mod messaging;

#[cfg(test)]
pub mod fakes;

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::Config;

pub use emergency::{Dialer, LogDialer, LogSiren, Siren, ALARM_DURATION};
pub use haptics::{HapticDevice, LogHaptics, COUNTDOWN_PULSE, SOS_PATTERN};
pub use location::{Coordinates, FixedLocationProvider, LocationProvider};
pub use messaging::{compose, CommandMessagingChannel, DispatchReport, MessagingChannel};

/// The capabilities an SOS session and the other screens call into
#[derive(Clone)]
pub struct DeviceServices {
    pub location: Arc<dyn LocationProvider>,
    pub messaging: Arc<dyn MessagingChannel>,
    pub haptics: Arc<dyn HapticDevice>,
    pub dialer: Arc<dyn Dialer>,
    pub siren: Arc<dyn Siren>,
}

impl std::fmt::Debug for DeviceServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceServices").finish_non_exhaustive()
    }
}

impl DeviceServices {
    /// Build the host capabilities described by the command line
    pub fn from_config(config: &Config) -> Self {
        let messaging = CommandMessagingChannel::new(config.sms_command.clone());
        if messaging.is_available() {
            info!("Messaging via {:?}", config.sms_command);
        } else {
            warn!("No --sms-command configured, contact notifications will be unavailable");
        }

        let location = FixedLocationProvider::new(config.fixed_location(), !config.deny_location);

        Self {
            location: Arc::new(location),
            messaging: Arc::new(messaging),
            haptics: Arc::new(LogHaptics::default()),
            dialer: Arc::new(LogDialer),
            siren: Arc::new(LogSiren),
        }
    }
}
