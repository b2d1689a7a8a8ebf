//! Main application state

use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Instant,
};

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{info, warn};

use super::{
    CheckInBoard, CheckInSettings, ContactsStore, KeyValueStore, Notice, NoticeBoard, StatusEntry,
    StatusLevel, ThemeSettings, TrackingState, TrackingTick,
};
use crate::{
    error::OptionError,
    services::DeviceServices,
    sos::{dispatch, messages, SosSession, SosSettings},
    utils::format_uptime,
};

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|p| p.into_inner())
}

/// Everything the daemon serves: the SOS session and the supporting screens
#[derive(Debug)]
pub struct AppState {
    /// The mounted SOS screen
    pub sos: Arc<SosSession>,
    pub contacts: Arc<ContactsStore>,
    pub theme: ThemeSettings,
    pub notices: Arc<NoticeBoard>,
    pub services: DeviceServices,
    /// Status check-in board and its reminder settings
    pub checkin: Mutex<CheckInBoard>,
    pub checkin_tx: watch::Sender<CheckInSettings>,
    /// Smart tracking session; `tracking_tx` carries its active flag
    pub tracking: Mutex<TrackingState>,
    pub tracking_tx: watch::Sender<bool>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Mutex<Option<String>>,
    pub last_action_time: Mutex<Option<DateTime<Utc>>>,
}

impl AppState {
    pub fn new(
        port: u16,
        host: String,
        sos_settings: SosSettings,
        services: DeviceServices,
        settings_store: Arc<dyn KeyValueStore>,
    ) -> Self {
        let contacts = Arc::new(ContactsStore::new(&sos_settings.emergency_number));
        let notices = Arc::new(NoticeBoard::new());
        let sos = SosSession::new(
            sos_settings,
            services.clone(),
            Arc::clone(&contacts),
            Arc::clone(&notices),
        );
        let checkin = CheckInBoard::new();
        let (checkin_tx, _) = watch::channel(checkin.settings);
        let (tracking_tx, _) = watch::channel(false);

        Self {
            sos,
            contacts,
            theme: ThemeSettings::load(settings_store),
            notices,
            services,
            checkin: Mutex::new(checkin),
            checkin_tx,
            tracking: Mutex::new(TrackingState::new()),
            tracking_tx,
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
        }
    }

    /// Remember the last thing a client asked for
    pub fn record_action(&self, action: &str) {
        *locked(&self.last_action) = Some(action.to_string());
        *locked(&self.last_action_time) = Some(Utc::now());
    }

    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        (locked(&self.last_action).clone(), *locked(&self.last_action_time))
    }

    pub fn get_uptime(&self) -> String {
        format_uptime(self.start_time.elapsed())
    }

    pub fn get_checkin(&self) -> CheckInBoard {
        locked(&self.checkin).clone()
    }

    /// Record a status update and, if enabled, tell the contacts about it
    pub async fn update_status(&self, level: StatusLevel, message: Option<String>) -> StatusEntry {
        let (entry, notify) = {
            let mut board = locked(&self.checkin);
            let entry = board.record(level, message);
            (entry, board.settings.notify_contacts)
        };
        info!("Status updated to: {}", level.label());

        if notify {
            dispatch::notify(
                &self.services,
                &self.contacts,
                &self.notices,
                &entry.outbound_text(),
                None,
                Notice::info(
                    "Status Updated",
                    format!("Status updated to: {}", level.label()),
                ),
            )
            .await;
        } else {
            self.notices.publish(Notice::info(
                "Status Updated",
                format!("Status updated to: {}", level.label()),
            ));
        }
        entry
    }

    pub fn apply_checkin_settings(&self, settings: CheckInSettings) -> Result<(), OptionError> {
        locked(&self.checkin).apply_settings(settings)?;
        info!(
            "Check-in settings: auto={}, every {}min, notify={}",
            settings.auto_check_in, settings.interval_minutes, settings.notify_contacts
        );
        self.checkin_tx.send_replace(settings);
        Ok(())
    }

    pub fn get_tracking(&self) -> TrackingState {
        locked(&self.tracking).clone()
    }

    pub fn start_tracking(&self, duration_minutes: Option<u64>) -> Result<TrackingState, OptionError> {
        let state = {
            let mut tracking = locked(&self.tracking);
            tracking.start(duration_minutes)?;
            tracking.clone()
        };
        info!("Tracking started for {} minutes", state.duration_minutes);
        self.tracking_tx.send_replace(true);
        Ok(state)
    }

    pub fn stop_tracking(&self) -> TrackingState {
        let state = {
            let mut tracking = locked(&self.tracking);
            tracking.stop();
            tracking.clone()
        };
        info!("Tracking stopped");
        self.tracking_tx.send_replace(false);
        state
    }

    pub fn select_tracking_duration(&self, minutes: u64) -> Result<TrackingState, OptionError> {
        let mut tracking = locked(&self.tracking);
        tracking.select_duration(minutes)?;
        Ok(tracking.clone())
    }

    pub fn set_share_location(&self, share: bool) -> TrackingState {
        let mut tracking = locked(&self.tracking);
        tracking.share_location = share;
        tracking.clone()
    }

    /// Advance the tracking clock by one second. Called by the tracking timer.
    pub fn advance_tracking(&self) -> TrackingTick {
        let tick = locked(&self.tracking).advance();
        if tick == TrackingTick::Finished {
            info!("Tracking duration elapsed");
            self.tracking_tx.send_replace(false);
            self.notices.publish(Notice::info(
                "Tracking Complete",
                "Your tracking session has ended.",
            ));
        }
        tick
    }

    /// Share the current position with all contacts, best-effort
    pub async fn share_location(&self) {
        let Some(at) = dispatch::locate(&self.services, &self.notices).await else {
            warn!("Skipping location share, no fix");
            return;
        };
        dispatch::notify(
            &self.services,
            &self.contacts,
            &self.notices,
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{services::fakes::Fakes, state::MemoryStore};

    fn app(fakes: &Fakes) -> AppState {
        AppState::new(
            0,
            "127.0.0.1".into(),
            SosSettings::default(),
            fakes.services(),
            Arc::new(MemoryStore::default()),
        )
    }

    #[tokio::test]
    async fn status_update_notifies_contacts_when_enabled() {
        let fakes = Fakes::new();
        let state = app(&fakes);
        state
            .update_status(StatusLevel::Caution, Some("Taking an unfamiliar route".into()))
            .await;

        let sent = fakes.messaging.messages();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].message, "Status update: Caution - Taking an unfamiliar route");
        assert_eq!(state.get_checkin().current, StatusLevel::Caution);
    }

    #[tokio::test]
    async fn status_update_stays_local_when_notify_is_off() {
        let fakes = Fakes::new();
        let state = app(&fakes);
        state
            .apply_checkin_settings(CheckInSettings {
                notify_contacts: false,
                ..CheckInSettings::default()
            })
            .unwrap();
        state.update_status(StatusLevel::Safe, None).await;
        assert!(fakes.messaging.messages().is_empty());
        assert_eq!(state.notices.recent()[0].title, "Status Updated");
    }

    #[tokio::test]
    async fn tracking_flag_follows_start_and_stop() {
        let fakes = Fakes::new();
        let state = app(&fakes);
        let rx = state.tracking_tx.subscribe();
        state.start_tracking(Some(15)).unwrap();
        assert!(*rx.borrow());
        assert!(state.start_tracking(Some(16)).is_err());
        state.stop_tracking();
        assert!(!*rx.borrow());
    }

    #[tokio::test]
    async fn last_action_is_recorded() {
        let fakes = Fakes::new();
        let state = app(&fakes);
        assert_eq!(state.get_last_action().0, None);
        state.record_action("sos-activate");
        let (action, at) = state.get_last_action();
        assert_eq!(action.as_deref(), Some("sos-activate"));
        assert!(at.is_some());
    }
}
