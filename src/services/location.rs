//! Location capability

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ServiceError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Link that opens the position in a map app
    pub fn maps_link(&self) -> String {
        format!(
            "https://www.google.com/maps?q={},{}",
            self.latitude, self.longitude
        )
    }
}

/// Source of the device's current position
#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn current_location(&self) -> Result<Coordinates, ServiceError>;
}

/// Location provider for a stationary host: a configured fix, or nothing
#[derive(Debug, Clone)]
pub struct FixedLocationProvider {
    fix: Option<Coordinates>,
    permission_granted: bool,
}

impl FixedLocationProvider {
    pub fn new(fix: Option<Coordinates>, permission_granted: bool) -> Self {
        Self {
            fix,
            permission_granted,
        }
    }
}

#[async_trait]
impl LocationProvider for FixedLocationProvider {
    async fn current_location(&self) -> Result<Coordinates, ServiceError> {
        if !self.permission_granted {
            return Err(ServiceError::PermissionDenied);
        }
        let fix = self.fix.ok_or(ServiceError::LocationUnavailable)?;
        debug!("Location fix: {}, {}", fix.latitude, fix.longitude);
        Ok(fix)
    }
}
