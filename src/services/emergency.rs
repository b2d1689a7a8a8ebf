//! Quick-action capabilities: dialing and the audible alarm

use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use crate::error::ServiceError;

/// How long the alarm sounds per trigger
pub const ALARM_DURATION: Duration = Duration::from_secs(30);

#[async_trait]
pub trait Dialer: Send + Sync {
    async fn dial(&self, number: &str) -> Result<(), ServiceError>;
}

#[async_trait]
pub trait Siren: Send + Sync {
    async fn sound(&self, duration: Duration) -> Result<(), ServiceError>;
}

/// Hosts without telephony: the call is logged for an operator
#[derive(Debug, Default, Clone)]
pub struct LogDialer;

#[async_trait]
impl Dialer for LogDialer {
    async fn dial(&self, number: &str) -> Result<(), ServiceError> {
        info!("Dialing emergency number {}", number);
        Ok(())
    }
}

/// Hosts without a speaker: the alarm is logged
#[derive(Debug, Default, Clone)]
pub struct LogSiren;

#[async_trait]
impl Siren for LogSiren {
    async fn sound(&self, duration: Duration) -> Result<(), ServiceError> {
        info!("Sounding alarm for {}s", duration.as_secs());
        Ok(())
    }
}
