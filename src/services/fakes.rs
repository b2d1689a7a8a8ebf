//! Recording fakes for every device capability

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;

use super::{
    Coordinates, DeviceServices, Dialer, DispatchReport, HapticDevice, LocationProvider,
    MessagingChannel, Siren,
};
use crate::{error::ServiceError, state::Contact};

pub struct FakeLocation {
    pub result: Mutex<Result<Coordinates, ServiceError>>,
}

#[async_trait]
impl LocationProvider for FakeLocation {
    async fn current_location(&self) -> Result<Coordinates, ServiceError> {
        self.result.lock().unwrap().clone()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SentMessage {
    pub phones: Vec<String>,
    pub message: String,
    pub coordinates: Option<Coordinates>,
}

#[derive(Default)]
pub struct RecordingMessaging {
    pub sent: Mutex<Vec<SentMessage>>,
    pub unavailable: Mutex<bool>,
}

impl RecordingMessaging {
    pub fn messages(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessagingChannel for RecordingMessaging {
    async fn notify_contacts(
        &self,
        contacts: &[Contact],
        message: &str,
        coordinates: Option<Coordinates>,
    ) -> Result<DispatchReport, ServiceError> {
        if *self.unavailable.lock().unwrap() {
            return Err(ServiceError::ChannelUnavailable);
        }
        let phones: Vec<String> = contacts.iter().map(|c| c.phone.clone()).collect();
        self.sent.lock().unwrap().push(SentMessage {
            phones: phones.clone(),
            message: message.to_string(),
            coordinates,
        });
        Ok(DispatchReport { recipients: phones })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum HapticEvent {
    Once(Duration),
    Pattern { intervals: Vec<Duration>, repeat: bool },
    Cancel,
}

#[derive(Default)]
pub struct RecordingHaptics {
    pub events: Mutex<Vec<HapticEvent>>,
}

impl RecordingHaptics {
    pub fn events(&self) -> Vec<HapticEvent> {
        self.events.lock().unwrap().clone()
    }

    /// A repeating pattern was started and not cancelled afterwards
    pub fn is_vibrating(&self) -> bool {
        let events = self.events();
        let last_pattern = events
            .iter()
            .rposition(|e| matches!(e, HapticEvent::Pattern { repeat: true, .. }));
        let last_cancel = events.iter().rposition(|e| *e == HapticEvent::Cancel);
        match (last_pattern, last_cancel) {
            (Some(p), Some(c)) => p > c,
            (Some(_), None) => true,
            _ => false,
        }
    }

    pub fn pulses(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, HapticEvent::Once(_)))
            .count()
    }
}

impl HapticDevice for RecordingHaptics {
    fn vibrate_once(&self, duration: Duration) -> Result<(), ServiceError> {
        self.events.lock().unwrap().push(HapticEvent::Once(duration));
        Ok(())
    }

    fn vibrate_pattern(&self, intervals: &[Duration], repeat: bool) -> Result<(), ServiceError> {
        self.events.lock().unwrap().push(HapticEvent::Pattern {
            intervals: intervals.to_vec(),
            repeat,
        });
        Ok(())
    }

    fn cancel_vibration(&self) -> Result<(), ServiceError> {
        self.events.lock().unwrap().push(HapticEvent::Cancel);
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingDialer {
    pub dialed: Mutex<Vec<String>>,
}

#[async_trait]
impl Dialer for RecordingDialer {
    async fn dial(&self, number: &str) -> Result<(), ServiceError> {
        self.dialed.lock().unwrap().push(number.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingSiren {
    pub sounded: Mutex<usize>,
}

#[async_trait]
impl Siren for RecordingSiren {
    async fn sound(&self, _duration: Duration) -> Result<(), ServiceError> {
        *self.sounded.lock().unwrap() += 1;
        Ok(())
    }
}

/// Handles to the fakes behind a [`DeviceServices`]
pub struct Fakes {
    pub location: Arc<FakeLocation>,
    pub messaging: Arc<RecordingMessaging>,
    pub haptics: Arc<RecordingHaptics>,
    pub dialer: Arc<RecordingDialer>,
    pub siren: Arc<RecordingSiren>,
}

impl Fakes {
    pub fn new() -> Self {
        Self {
            location: Arc::new(FakeLocation {
                result: Mutex::new(Ok(Coordinates::new(41.3275, 19.8187))),
            }),
            messaging: Arc::new(RecordingMessaging::default()),
            haptics: Arc::new(RecordingHaptics::default()),
            dialer: Arc::new(RecordingDialer::default()),
            siren: Arc::new(RecordingSiren::default()),
        }
    }

    pub fn set_location(&self, result: Result<Coordinates, ServiceError>) {
        *self.location.result.lock().unwrap() = result;
    }

    pub fn set_messaging_unavailable(&self) {
        *self.messaging.unavailable.lock().unwrap() = true;
    }

    pub fn services(&self) -> DeviceServices {
        DeviceServices {
            location: self.location.clone(),
            messaging: self.messaging.clone(),
            haptics: self.haptics.clone(),
            dialer: self.dialer.clone(),
            siren: self.siren.clone(),
        }
    }
}
