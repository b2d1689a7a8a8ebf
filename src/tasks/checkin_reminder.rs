//! Check-in reminder background task

use std::sync::Arc;

use tokio::time::sleep;
use tracing::{debug, info};

use crate::state::{AppState, Notice};

/// Background task that reminds the user to check in at the chosen interval
pub async fn checkin_reminder_task(state: Arc<AppState>) {
    info!("Starting check-in reminder task");

    let mut settings_rx = state.checkin_tx.subscribe();

    loop {
        let settings = *settings_rx.borrow_and_update();

        if !settings.auto_check_in {
            debug!("Automatic check-in reminders are off");
            if settings_rx.changed().await.is_err() {
                return;
            }
            continue;
        }

        tokio::select! {
            _ = sleep(settings.interval()) => {
                state.notices.publish(Notice::reminder(
                    "Check-in reminder",
                    "Let your emergency contacts know you're safe.",
                ));
            }

            // New settings restart the wait
            changed = settings_rx.changed() => {
                if changed.is_err() {
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::{
        services::fakes::Fakes,
        sos::SosSettings,
        state::{CheckInSettings, MemoryStore, NoticeKind},
    };

    fn reminders(state: &AppState) -> usize {
        state
            .notices
            .recent()
            .iter()
            .filter(|n| n.kind == NoticeKind::Reminder)
            .count()
    }

    #[tokio::test(start_paused = true)]
    async fn reminds_every_interval_until_disabled() {
        let fakes = Fakes::new();
        let state = Arc::new(AppState::new(
            0,
            "127.0.0.1".into(),
            SosSettings::default(),
            fakes.services(),
            Arc::new(MemoryStore::default()),
        ));
        tokio::spawn(checkin_reminder_task(Arc::clone(&state)));

        state
            .apply_checkin_settings(CheckInSettings {
                interval_minutes: 15,
                ..CheckInSettings::default()
            })
            .unwrap();
        tokio::time::sleep(Duration::from_secs(31 * 60)).await;
        assert_eq!(reminders(&state), 2);

        state
            .apply_checkin_settings(CheckInSettings {
                auto_check_in: false,
                interval_minutes: 15,
                notify_contacts: true,
            })
            .unwrap();
        tokio::time::sleep(Duration::from_secs(120 * 60)).await;
        assert_eq!(reminders(&state), 2);
    }
}
