//! One mounted SOS screen: the alert state machine plus the timers it owns
//!
//! Every transition runs under the session lock, and the side effects it
//! triggers are initiated (spawned or started) only after the phase has been
//! written. Timers are cancelled under the same lock, so a deactivation can
//! never interleave with a half-started activation.

use std::{
    sync::{Arc, Mutex, MutexGuard, Weak},
    time::Duration,
};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, error, info, warn};

use super::{
    dispatch,
    messages::{self, Choice, Prompt},
    pulse::{self, REST_SCALE},
    quick_action::{self, QuickAction, QuickActionContext},
};
use crate::{
    error::SosError,
    services::{DeviceServices, COUNTDOWN_PULSE, SOS_PATTERN},
    state::{AlertState, ContactsStore, Notice, NoticeBoard, Phase, Tick},
    tasks::countdown_task,
};

/// Tunables of a session
#[derive(Debug, Clone)]
pub struct SosSettings {
    pub countdown_seconds: u32,
    pub tick_period: Duration,
    pub emergency_number: String,
}

impl Default for SosSettings {
    fn default() -> Self {
        Self {
            countdown_seconds: 5,
            tick_period: Duration::from_secs(1),
            emergency_number: "911".to_string(),
        }
    }
}

/// Point-in-time view of the alert, published on every transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlertSnapshot {
    pub phase: Phase,
    pub seconds_remaining: Option<u32>,
    pub activated_at: Option<DateTime<Utc>>,
}

impl From<&AlertState> for AlertSnapshot {
    fn from(state: &AlertState) -> Self {
        Self {
            phase: state.phase(),
            seconds_remaining: state.seconds_remaining(),
            activated_at: state.activated_at(),
        }
    }
}

/// What a confirmable operation did with the caller's answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirmed {
    /// The user picked cancel; nothing changed
    Declined,
    /// The transition was committed; the session is now in this phase
    Applied(Phase),
}

#[derive(Debug, Default)]
struct Machine {
    alert: AlertState,
    countdown: Option<JoinHandle<()>>,
    /// Bumped whenever a countdown timer is started or stopped, so a tick
    /// already waiting on the lock when its timer was aborted is refused
    countdown_generation: u64,
    pulse: Option<JoinHandle<()>>,
}

impl Machine {
    fn stop_countdown(&mut self) {
        if let Some(timer) = self.countdown.take() {
            timer.abort();
        }
        self.countdown_generation += 1;
    }
}

/// Owner of one `AlertState` and its countdown, vibration and pulse timers.
///
/// Dropping the session (or calling [`teardown`](Self::teardown)) cancels all
/// of them.
pub struct SosSession {
    me: Weak<SosSession>,
    machine: Mutex<Machine>,
    settings: SosSettings,
    services: DeviceServices,
    contacts: Arc<ContactsStore>,
    notices: Arc<NoticeBoard>,
    alert_tx: watch::Sender<AlertSnapshot>,
    pulse_tx: Arc<watch::Sender<f32>>,
}

impl std::fmt::Debug for SosSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SosSession")
            .field("alert", &self.snapshot())
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl SosSession {
    /// Mount a new session in the idle phase
    pub fn new(
        settings: SosSettings,
        services: DeviceServices,
        contacts: Arc<ContactsStore>,
        notices: Arc<NoticeBoard>,
    ) -> Arc<Self> {
        let (alert_tx, _) = watch::channel(AlertSnapshot::from(&AlertState::new()));
        let (pulse_tx, _) = watch::channel(REST_SCALE);
        Arc::new_cyclic(|me| Self {
            me: me.clone(),
            machine: Mutex::new(Machine::default()),
            settings,
            services,
            contacts,
            notices,
            alert_tx,
            pulse_tx: Arc::new(pulse_tx),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Machine> {
        // Transitions never leave the machine half-written, so a poisoned
        // lock still holds a consistent state
        self.machine.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn publish(&self, machine: &Machine) {
        self.alert_tx.send_replace(AlertSnapshot::from(&machine.alert));
    }

    fn reject(&self, err: SosError) -> SosError {
        if cfg!(debug_assertions) {
            error!("UI wiring defect: {}", err);
        } else {
            debug!("Ignored: {}", err);
        }
        err
    }

    pub fn settings(&self) -> &SosSettings {
        &self.settings
    }

    pub fn phase(&self) -> Phase {
        self.lock().alert.phase()
    }

    pub fn snapshot(&self) -> AlertSnapshot {
        AlertSnapshot::from(&self.lock().alert)
    }

    /// Watch every alert transition
    pub fn subscribe(&self) -> watch::Receiver<AlertSnapshot> {
        self.alert_tx.subscribe()
    }

    /// Watch the pulsing indicator scale
    pub fn pulse_scale(&self) -> watch::Receiver<f32> {
        self.pulse_tx.subscribe()
    }

    /// Prompt to show before [`request_activation`](Self::request_activation)
    pub fn activation_prompt(&self) -> Prompt {
        Prompt::activation(self.settings.countdown_seconds)
    }

    /// Prompt to show before [`deactivate`](Self::deactivate)
    pub fn deactivation_prompt(&self) -> Prompt {
        Prompt::deactivation()
    }

    /// Idle → CountingDown once the user continues at the prompt
    pub fn request_activation(&self, choice: Choice) -> Result<Confirmed, SosError> {
        let mut machine = self.lock();
        if machine.alert.phase() != Phase::Idle {
            return Err(self.reject(SosError::InvalidTransition {
                operation: "request activation",
                phase: machine.alert.phase(),
            }));
        }
        if choice == Choice::Cancel {
            info!("SOS activation declined at prompt");
            return Ok(Confirmed::Declined);
        }

        let seconds = self.settings.countdown_seconds;
        machine.alert.begin_countdown(seconds)?;
        info!("SOS countdown started: {}s", seconds);

        if seconds == 0 {
            self.commit_activation(&mut machine)?;
        } else {
            machine.stop_countdown();
            machine.countdown = Some(tokio::spawn(countdown_task(
                self.me.clone(),
                self.settings.tick_period,
                machine.countdown_generation,
            )));
            self.publish(&machine);
        }
        Ok(Confirmed::Applied(machine.alert.phase()))
    }

    /// One countdown second. Called by the countdown timer started as
    /// `generation`; ticks from any other timer are refused.
    pub fn tick(&self, generation: u64) -> Result<Tick, SosError> {
        let mut machine = self.lock();
        if generation != machine.countdown_generation {
            debug!(
                "Dropped tick from countdown timer {} (current {})",
                generation, machine.countdown_generation
            );
            return Err(SosError::StaleCountdown {
                timer: generation,
                current: machine.countdown_generation,
            });
        }
        let tick = machine
            .alert
            .tick(Utc::now())
            .map_err(|e| self.reject(e))?;

        if let Err(e) = self.services.haptics.vibrate_once(COUNTDOWN_PULSE) {
            debug!("Countdown pulse failed: {}", e);
        }

        match tick {
            Tick::Remaining(left) => {
                debug!("SOS activating in {}s", left);
                self.publish(&machine);
            }
            Tick::Activated(at) => {
                // Also stops the timer when it is the caller; it never awaits again
                machine.stop_countdown();
                self.start_active_effects(&mut machine, at);
            }
        }
        Ok(tick)
    }

    /// CountingDown → Idle. No one is notified.
    pub fn cancel_countdown(&self) -> Result<(), SosError> {
        let mut machine = self.lock();
        machine
            .alert
            .cancel_countdown()
            .map_err(|e| self.reject(e))?;
        machine.stop_countdown();
        info!("SOS countdown cancelled");
        self.publish(&machine);
        Ok(())
    }

    /// CountingDown → Active without waiting for the rest of the countdown
    pub fn skip_countdown(&self) -> Result<DateTime<Utc>, SosError> {
        let mut machine = self.lock();
        if machine.alert.phase() != Phase::CountingDown {
            return Err(self.reject(SosError::InvalidTransition {
                operation: "activate",
                phase: machine.alert.phase(),
            }));
        }
        self.commit_activation(&mut machine)
    }

    fn commit_activation(&self, machine: &mut Machine) -> Result<DateTime<Utc>, SosError> {
        let at = machine.alert.activate(Utc::now())?;
        machine.stop_countdown();
        self.start_active_effects(machine, at);
        Ok(at)
    }

    /// Phase is already Active here. Each effect is independent of the others.
    fn start_active_effects(&self, machine: &mut Machine, at: DateTime<Utc>) {
        info!("SOS ACTIVE since {}", at);
        self.publish(machine);

        if let Err(e) = self.services.haptics.vibrate_pattern(&SOS_PATTERN, true) {
            warn!("Failed to start SOS vibration: {}", e);
        }

        if let Some(old) = machine.pulse.replace(tokio::spawn(pulse::pulse_loop(
            Arc::clone(&self.pulse_tx),
        ))) {
            old.abort();
        }

        let services = self.services.clone();
        let contacts = Arc::clone(&self.contacts);
        let notices = Arc::clone(&self.notices);
        tokio::spawn(async move {
            let location = dispatch::locate(&services, &notices).await;
            let message = if location.is_some() {
                "Emergency alerts have been sent to your contacts with your current location."
            } else {
                "Emergency alerts have been sent to your contacts without your location."
            };
            dispatch::notify(
                &services,
                &contacts,
                &notices,
                messages::EMERGENCY_TEXT,
                location,
                Notice::info("SOS Activated", message),
            )
            .await;
        });
    }

    /// Active → Idle once the user confirms at the prompt
    pub fn deactivate(&self, choice: Choice) -> Result<Confirmed, SosError> {
        let mut machine = self.lock();
        if machine.alert.phase() != Phase::Active {
            return Err(self.reject(SosError::InvalidTransition {
                operation: "deactivate",
                phase: machine.alert.phase(),
            }));
        }
        if choice == Choice::Cancel {
            info!("SOS deactivation declined at prompt");
            return Ok(Confirmed::Declined);
        }

        let activated_at = machine.alert.deactivate()?;
        self.stop_active_effects(&mut machine);
        info!(
            "SOS deactivated after {}s",
            (Utc::now() - activated_at).num_seconds()
        );
        self.publish(&machine);

        let services = self.services.clone();
        let contacts = Arc::clone(&self.contacts);
        let notices = Arc::clone(&self.notices);
        tokio::spawn(async move {
            dispatch::notify(
                &services,
                &contacts,
                &notices,
                messages::SAFE_TEXT,
                None,
                Notice::info(
                    "SOS Deactivated",
                    "Your emergency contacts have been notified that you are safe.",
                ),
            )
            .await;
        });

        Ok(Confirmed::Applied(Phase::Idle))
    }

    fn stop_active_effects(&self, machine: &mut Machine) {
        if let Some(pulse) = machine.pulse.take() {
            pulse.abort();
        }
        self.pulse_tx.send_replace(REST_SCALE);
        if let Err(e) = self.services.haptics.cancel_vibration() {
            warn!("Failed to cancel vibration: {}", e);
        }
    }

    /// Fire-and-forget shortcut; the alert phase is neither read nor changed
    pub fn quick_action(&self, action: QuickAction) {
        let ctx = QuickActionContext {
            services: self.services.clone(),
            contacts: Arc::clone(&self.contacts),
            notices: Arc::clone(&self.notices),
            emergency_number: self.settings.emergency_number.clone(),
        };
        tokio::spawn(async move { quick_action::perform(action, &ctx).await });
    }

    /// Unmount: cancel every timer and discard the alert. Safe to call twice.
    pub fn teardown(&self) {
        let mut machine = self.lock();
        let was = machine.alert.phase();
        machine.stop_countdown();
        if was == Phase::Active || machine.pulse.is_some() {
            self.stop_active_effects(&mut machine);
        }
        machine.alert = AlertState::new();
        self.publish(&machine);
        if was != Phase::Idle {
            info!("SOS session torn down while {}", was);
        }
    }
}

impl Drop for SosSession {
    fn drop(&mut self) {
        self.teardown();
    }
}
