mod model;

use async_trait::async_trait;
use sqlx::SqlitePool;
use tam_models::reminder::{Reminder, ReminderId};

use crate::reminder::{ReminderStore, StoreError};
use model::ReminderRow;

/// Applies the bundled schema migrations.
pub async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

pub struct SqliteReminderStore {
    pool: SqlitePool,
}

impl SqliteReminderStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReminderStore for SqliteReminderStore {
    async fn save(&self, reminder: Reminder) -> Result<(), StoreError> {
        let row = ReminderRow::from(reminder);

        sqlx::query(
            "INSERT OR REPLACE INTO reminders
                 (id, title, description, location_name, latitude, longitude, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(row.id)
        .bind(row.title)
        .bind(row.description)
        .bind(row.location_name)
        .bind(row.latitude)
        .bind(row.longitude)
        .bind(row.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_all(&self) -> Result<Vec<Reminder>, StoreError> {
        let rows = sqlx::query_as::<_, ReminderRow>(
            "SELECT id, title, description, location_name, latitude, longitude, created_at
             FROM reminders
             ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Reminder::try_from).collect()
    }

    async fn get(&self, id: ReminderId) -> Result<Reminder, StoreError> {
        let row = sqlx::query_as::<_, ReminderRow>(
            "SELECT id, title, description, location_name, latitude, longitude, created_at
             FROM reminders
             WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => row.try_into(),
            None => Err(StoreError::NotFound),
        }
    }

    async fn delete_all(&self) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM reminders")
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
