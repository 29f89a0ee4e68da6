use async_trait::async_trait;
use tam_models::reminder::{Reminder, ReminderId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Reminder not found")]
    NotFound,

    #[error(transparent)]
    Sqlite(#[from] sqlx::Error),

    #[error("Malformed reminder record: {0}")]
    Malformed(String),

    #[error("{0}")]
    Unavailable(String),
}

/// Persistence seam for reminders. Object-safe so the interaction layer can
/// hold it as `Arc<dyn ReminderStore>`.
#[async_trait]
pub trait ReminderStore: Send + Sync {
    /// Insert-or-replace by id.
    async fn save(&self, reminder: Reminder) -> Result<(), StoreError>;

    /// Every stored reminder, newest first.
    async fn get_all(&self) -> Result<Vec<Reminder>, StoreError>;

    async fn get(&self, id: ReminderId) -> Result<Reminder, StoreError>;

    async fn delete_all(&self) -> Result<(), StoreError>;
}
