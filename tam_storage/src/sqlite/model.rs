use sqlx::FromRow;
use tam_models::chrono::{DateTime, Utc};
use tam_models::reminder::{Reminder, ReminderId};
use tam_models::uuid::Uuid;

use crate::reminder::StoreError;

#[derive(FromRow)]
pub(super) struct ReminderRow {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub location_name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: String,
}

impl From<Reminder> for ReminderRow {
    fn from(value: Reminder) -> Self {
        Self {
            id: value.id.to_string(),
            title: value.title,
            description: value.description,
            location_name: value.location_name,
            latitude: value.latitude,
            longitude: value.longitude,
            created_at: value.created_at.to_rfc3339(),
        }
    }
}

impl TryFrom<ReminderRow> for Reminder {
    type Error = StoreError;

    fn try_from(value: ReminderRow) -> Result<Self, Self::Error> {
        let id: ReminderId = value
            .id
            .parse::<Uuid>()
            .map_err(|err| StoreError::Malformed(format!("bad id '{}': {err}", value.id)))?;
        let created_at = DateTime::parse_from_rfc3339(&value.created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|err| {
                StoreError::Malformed(format!("bad created_at '{}': {err}", value.created_at))
            })?;

        Ok(Self {
            id,
            title: value.title,
            description: value.description,
            location_name: value.location_name,
            latitude: value.latitude,
            longitude: value.longitude,
            created_at,
        })
    }
}
