//! Best-effort outbound notifications
//!
//! Every failure ends up as a degraded notice for the user; nothing here
//! returns an error to the caller.

use tracing::debug;

use crate::{
    error::ServiceError,
    services::{Coordinates, DeviceServices},
    state::{ContactsStore, Notice, NoticeBoard},
};

/// Current location, or `None` after telling the user why it is missing
pub async fn locate(services: &DeviceServices, notices: &NoticeBoard) -> Option<Coordinates> {
    match services.location.current_location().await {
        Ok(at) => Some(at),
        Err(ServiceError::PermissionDenied) => {
            notices.publish(Notice::degraded(
                "Location unavailable",
                "Permission to access location was denied. Your contacts will not receive your location.",
            ));
            None
        }
        Err(e) => {
            notices.publish(Notice::degraded(
                "Location unavailable",
                format!("Could not determine your location: {}", e),
            ));
            None
        }
    }
}

/// Send `text` to every contact. Returns whether the message went out.
pub async fn notify(
    services: &DeviceServices,
    contacts: &ContactsStore,
    notices: &NoticeBoard,
    text: &str,
    coordinates: Option<Coordinates>,
    success: Notice,
) -> bool {
    let recipients = contacts.snapshot();
    match services
        .messaging
        .notify_contacts(&recipients, text, coordinates)
        .await
    {
        Ok(report) => {
            debug!("Dispatched to {:?}", report.recipients);
            notices.publish(success);
            true
        }
        Err(ServiceError::ChannelUnavailable) => {
            notices.publish(Notice::degraded(
                "Messaging unavailable",
                "SMS is not available on this device. Your contacts were not notified.",
            ));
            false
        }
        Err(e) => {
            notices.publish(Notice::degraded(
                "Notification failed",
                format!("Your contacts could not be notified: {}", e),
            ));
            false
        }
    }
}
