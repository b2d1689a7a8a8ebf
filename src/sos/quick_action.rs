//! Phase-independent emergency shortcuts

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{dispatch, messages};
use crate::{
    services::{DeviceServices, ALARM_DURATION},
    state::{ContactsStore, Notice, NoticeBoard},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuickAction {
    CallEmergencyNumber,
    SendTextAlert,
    SoundAlarm,
    ShareLocationOnce,
}

impl QuickAction {
    pub const ALL: [QuickAction; 4] = [
        Self::CallEmergencyNumber,
        Self::SendTextAlert,
        Self::SoundAlarm,
        Self::ShareLocationOnce,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CallEmergencyNumber => "call-emergency-number",
            Self::SendTextAlert => "send-text-alert",
            Self::SoundAlarm => "sound-alarm",
            Self::ShareLocationOnce => "share-location-once",
        }
    }
}

impl fmt::Display for QuickAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuickAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| format!("unknown quick action: {}", s))
    }
}

/// Everything a quick action may touch. Never the alert state.
#[derive(Clone)]
pub struct QuickActionContext {
    pub services: DeviceServices,
    pub contacts: std::sync::Arc<ContactsStore>,
    pub notices: std::sync::Arc<NoticeBoard>,
    pub emergency_number: String,
}

/// Run one quick action to completion, reporting the outcome as a notice
pub async fn perform(action: QuickAction, ctx: &QuickActionContext) {
    info!("Quick action: {}", action);
    match action {
        QuickAction::CallEmergencyNumber => {
            match ctx.services.dialer.dial(&ctx.emergency_number).await {
                Ok(()) => ctx.notices.publish(Notice::info(
                    "Calling Emergency Services",
                    format!("Dialing {}.", ctx.emergency_number),
                )),
                Err(e) => ctx.notices.publish(Notice::degraded(
                    "Call failed",
                    format!("Could not dial {}: {}", ctx.emergency_number, e),
                )),
            }
        }
        QuickAction::SendTextAlert => {
            let at = dispatch::locate(&ctx.services, &ctx.notices).await;
            dispatch::notify(
                &ctx.services,
                &ctx.contacts,
                &ctx.notices,
                messages::EMERGENCY_TEXT,
                at,
                Notice::info(
                    "SOS Text Sent",
                    "Emergency text messages have been sent to your contacts.",
                ),
            )
            .await;
        }
        QuickAction::SoundAlarm => match ctx.services.siren.sound(ALARM_DURATION).await {
            Ok(()) => ctx
                .notices
                .publish(Notice::info("Alarm Activated", "A loud alarm is sounding.")),
            Err(e) => ctx.notices.publish(Notice::degraded(
                "Alarm failed",
                format!("The alarm could not be sounded: {}", e),
            )),
        },
        QuickAction::ShareLocationOnce => {
            // Nothing worth sending without a position
            let Some(at) = dispatch::locate(&ctx.services, &ctx.notices).await else {
                return;
            };
            dispatch::notify(
                &ctx.services,
                &ctx.contacts,
                &ctx.notices,
                messages::LOCATION_TEXT,
                Some(at),
                Notice::info(
                    "Location Shared",
                    "Your current location has been shared with your emergency contacts.",
                ),
            )
            .await;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{error::ServiceError, services::fakes::Fakes, state::NoticeKind};

    fn context(fakes: &Fakes) -> QuickActionContext {
        QuickActionContext {
            services: fakes.services(),
            contacts: Arc::new(ContactsStore::new("911")),
            notices: Arc::new(NoticeBoard::new()),
            emergency_number: "911".into(),
        }
    }

    #[test]
    fn names_round_trip_through_from_str() {
        for action in QuickAction::ALL {
            assert_eq!(action.as_str().parse::<QuickAction>().unwrap(), action);
        }
        assert!("fly".parse::<QuickAction>().is_err());
    }

    #[tokio::test]
    async fn call_dials_configured_number() {
        let fakes = Fakes::new();
        let ctx = context(&fakes);
        perform(QuickAction::CallEmergencyNumber, &ctx).await;
        assert_eq!(*fakes.dialer.dialed.lock().unwrap(), vec!["911".to_string()]);
        assert_eq!(ctx.notices.recent()[0].title, "Calling Emergency Services");
    }

    #[tokio::test]
    async fn text_alert_goes_out_without_location() {
        let fakes = Fakes::new();
        fakes.set_location(Err(ServiceError::PermissionDenied));
        let ctx = context(&fakes);
        perform(QuickAction::SendTextAlert, &ctx).await;

        let sent = fakes.messaging.messages();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].coordinates, None);
        let kinds: Vec<NoticeKind> = ctx.notices.recent().iter().map(|n| n.kind).collect();
        assert_eq!(kinds, vec![NoticeKind::Info, NoticeKind::Degraded]);
    }

    #[tokio::test]
    async fn share_location_needs_a_fix() {
        let fakes = Fakes::new();
        fakes.set_location(Err(ServiceError::LocationUnavailable));
        let ctx = context(&fakes);
        perform(QuickAction::ShareLocationOnce, &ctx).await;
        assert!(fakes.messaging.messages().is_empty());
        assert_eq!(ctx.notices.recent()[0].kind, NoticeKind::Degraded);
    }

    #[tokio::test]
    async fn alarm_sounds() {
        let fakes = Fakes::new();
        let ctx = context(&fakes);
        perform(QuickAction::SoundAlarm, &ctx).await;
        assert_eq!(*fakes.siren.sounded.lock().unwrap(), 1);
    }
}
