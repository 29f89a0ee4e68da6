use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

pub type ReminderId = Uuid;

/// A stored reminder. Presence of title and location is checked by the save
/// flow, not here; the storage layer takes whatever shape it is given.
#[derive(Debug, Clone, PartialEq)]
pub struct Reminder {
    pub id: ReminderId,
    pub title: Option<String>,
    pub description: Option<String>,
    pub location_name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DraftError {
    #[error("Please enter a title first.")]
    MissingTitle,

    #[error("Please select a location first.")]
    MissingLocation,
}

/// The in-flight candidate edited by the create-reminder flow. Nothing is
/// retained between save attempts beyond this value.
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderDraft {
    pub id: ReminderId,
    pub title: Option<String>,
    pub description: Option<String>,
    pub location_name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl ReminderDraft {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            title: None,
            description: None,
            location_name: None,
            latitude: None,
            longitude: None,
        }
    }

    // Guard order: title, then location.
    pub fn validate(&self) -> Result<Reminder, DraftError> {
        if self.title.as_deref().is_none_or(str::is_empty) {
            return Err(DraftError::MissingTitle);
        }
        if self.location_name.as_deref().is_none_or(str::is_empty) {
            return Err(DraftError::MissingLocation);
        }

        Ok(Reminder {
            id: self.id,
            title: self.title.clone(),
            description: self.description.clone(),
            location_name: self.location_name.clone(),
            latitude: self.latitude,
            longitude: self.longitude,
            created_at: Utc::now(),
        })
    }
}

impl Default for ReminderDraft {
    fn default() -> Self {
        Self::new()
    }
}
