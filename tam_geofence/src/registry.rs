use async_trait::async_trait;
use tam_models::reminder::ReminderId;
use thiserror::Error;

use crate::region::WatchedRegion;

#[derive(Debug, Error)]
pub enum GeofenceError {
    #[error("Coordinates out of range: {latitude}, {longitude}")]
    InvalidRegion { latitude: f64, longitude: f64 },

    #[error("Watch radius must be positive, got {0}")]
    InvalidRadius(f64),

    #[error("The location monitor is not running")]
    MonitorStopped,
}

/// Registration surface of region monitoring. The save flow only talks to
/// this trait; what watches locations behind it is opaque to callers.
#[async_trait]
pub trait GeofenceRegistry: Send + Sync {
    /// Watch a region. Registering the same reminder id again replaces the
    /// previously watched region.
    async fn register(&self, region: WatchedRegion) -> Result<(), GeofenceError>;

    async fn remove(&self, reminder_id: ReminderId) -> Result<(), GeofenceError>;

    async fn clear(&self) -> Result<(), GeofenceError>;

    /// Feed a location report into the monitor.
    async fn report_location(&self, latitude: f64, longitude: f64) -> Result<(), GeofenceError>;
}
