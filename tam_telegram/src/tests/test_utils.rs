use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tam_geofence::{GeofenceError, GeofenceRegistry, WatchedRegion};
use tam_models::reminder::{Reminder, ReminderDraft, ReminderId};
use tam_storage::{InMemoryReminderStore, ReminderStore, StoreError};

pub const FAKE_STORE_ERROR: &str = "Intentional error for testing";

/// Registry double that accepts everything.
pub struct NoopGeofenceRegistry;

#[async_trait]
impl GeofenceRegistry for NoopGeofenceRegistry {
    async fn register(&self, _region: WatchedRegion) -> Result<(), GeofenceError> {
        Ok(())
    }

    async fn remove(&self, _reminder_id: ReminderId) -> Result<(), GeofenceError> {
        Ok(())
    }

    async fn clear(&self) -> Result<(), GeofenceError> {
        Ok(())
    }

    async fn report_location(&self, _latitude: f64, _longitude: f64) -> Result<(), GeofenceError> {
        Ok(())
    }
}

/// Registry double that refuses registrations.
pub struct RejectingGeofenceRegistry;

#[async_trait]
impl GeofenceRegistry for RejectingGeofenceRegistry {
    async fn register(&self, _region: WatchedRegion) -> Result<(), GeofenceError> {
        Err(GeofenceError::MonitorStopped)
    }

    async fn remove(&self, _reminder_id: ReminderId) -> Result<(), GeofenceError> {
        Err(GeofenceError::MonitorStopped)
    }

    async fn clear(&self) -> Result<(), GeofenceError> {
        Err(GeofenceError::MonitorStopped)
    }

    async fn report_location(&self, _latitude: f64, _longitude: f64) -> Result<(), GeofenceError> {
        Err(GeofenceError::MonitorStopped)
    }
}

/// Store double wrapping the in-memory store: counts save calls and can be
/// switched into the unreachable-store branch.
#[derive(Default)]
pub struct FakeReminderStore {
    inner: InMemoryReminderStore,
    fail: AtomicBool,
    saves: AtomicUsize,
}

impl FakeReminderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::Relaxed);
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::Relaxed)
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.fail.load(Ordering::Relaxed) {
            Err(StoreError::Unavailable(FAKE_STORE_ERROR.to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ReminderStore for FakeReminderStore {
    async fn save(&self, reminder: Reminder) -> Result<(), StoreError> {
        self.saves.fetch_add(1, Ordering::Relaxed);
        self.check()?;
        self.inner.save(reminder).await
    }

    async fn get_all(&self) -> Result<Vec<Reminder>, StoreError> {
        self.check()?;
        self.inner.get_all().await
    }

    async fn get(&self, id: ReminderId) -> Result<Reminder, StoreError> {
        self.check()?;
        self.inner.get(id).await
    }

    async fn delete_all(&self) -> Result<(), StoreError> {
        self.check()?;
        self.inner.delete_all().await
    }
}

pub fn complete_draft() -> ReminderDraft {
    ReminderDraft {
        title: Some("Groceries".to_string()),
        description: Some("Buy groceries when here".to_string()),
        location_name: Some("The market".to_string()),
        latitude: Some(50.08),
        longitude: Some(14.43),
        ..ReminderDraft::new()
    }
}

pub fn untitled_draft() -> ReminderDraft {
    ReminderDraft {
        title: None,
        ..complete_draft()
    }
}

pub fn unlocated_draft() -> ReminderDraft {
    ReminderDraft {
        location_name: None,
        ..complete_draft()
    }
}
