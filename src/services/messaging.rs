//! Messaging capability used to reach emergency contacts

use async_trait::async_trait;
use serde::Serialize;
use tokio::process::Command;
use tracing::{debug, info};

use super::location::Coordinates;
use crate::{error::ServiceError, state::Contact};

/// Which contacts a dispatch reached
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchReport {
    pub recipients: Vec<String>,
}

/// Outbound text channel (SMS on a phone)
#[async_trait]
pub trait MessagingChannel: Send + Sync {
    async fn notify_contacts(
        &self,
        contacts: &[Contact],
        message: &str,
        coordinates: Option<Coordinates>,
    ) -> Result<DispatchReport, ServiceError>;
}

/// Full text of an outbound message, with the map link appended when known
pub fn compose(message: &str, coordinates: Option<Coordinates>) -> String {
    match coordinates {
        Some(at) => format!("{} My current location is: {}", message, at.maps_link()),
        None => message.to_string(),
    }
}

/// Hands every message to an external program as
/// `<program> <text> <phone>...`, e.g. a modem or SMS gateway script.
/// Without a program the channel is unavailable.
#[derive(Debug, Clone)]
pub struct CommandMessagingChannel {
    program: Option<String>,
}

impl CommandMessagingChannel {
    pub fn new(program: Option<String>) -> Self {
        Self { program }
    }

    pub fn is_available(&self) -> bool {
        self.program.is_some()
    }
}

#[async_trait]
impl MessagingChannel for CommandMessagingChannel {
    async fn notify_contacts(
        &self,
        contacts: &[Contact],
        message: &str,
        coordinates: Option<Coordinates>,
    ) -> Result<DispatchReport, ServiceError> {
        let program = self.program.as_ref().ok_or(ServiceError::ChannelUnavailable)?;
        let phones: Vec<String> = contacts.iter().map(|c| c.phone.clone()).collect();
        if phones.is_empty() {
            return Err(ServiceError::failed("messaging", "no emergency contacts"));
        }

        let text = compose(message, coordinates);
        debug!("Sending message to {} contacts via {}", phones.len(), program);

        let output = Command::new(program)
            .arg(&text)
            .args(&phones)
            .output()
            .await
            .map_err(|e| ServiceError::failed("messaging", format!("failed to execute {}: {}", program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ServiceError::failed(
                "messaging",
                format!("{} failed: {}", program, stderr.trim()),
            ));
        }

        info!("Message delivered to {} contacts", phones.len());
        Ok(DispatchReport { recipients: phones })
    }
}
