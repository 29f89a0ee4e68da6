use std::collections::HashMap;

use async_trait::async_trait;
use tam_models::reminder::{Reminder, ReminderId};
use tokio::sync::RwLock;

use crate::reminder::{ReminderStore, StoreError};

/// Hash-map store for tests and local experiments.
#[derive(Default)]
pub struct InMemoryReminderStore {
    store: RwLock<HashMap<ReminderId, Reminder>>,
}

impl InMemoryReminderStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReminderStore for InMemoryReminderStore {
    async fn save(&self, reminder: Reminder) -> Result<(), StoreError> {
        let mut store = self.store.write().await;
        store.insert(reminder.id, reminder);
        Ok(())
    }

    async fn get_all(&self) -> Result<Vec<Reminder>, StoreError> {
        let store = self.store.read().await;
        let mut reminders: Vec<Reminder> = store.values().cloned().collect();
        reminders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(reminders)
    }

    async fn get(&self, id: ReminderId) -> Result<Reminder, StoreError> {
        let store = self.store.read().await;
        store.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    async fn delete_all(&self) -> Result<(), StoreError> {
        self.store.write().await.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tam_models::chrono::Utc;
    use tam_models::uuid::Uuid;

    use super::*;

    fn reminder(title: &str) -> Reminder {
        Reminder {
            id: Uuid::new_v4(),
            title: Some(title.to_string()),
            description: None,
            location_name: Some("somewhere".to_string()),
            latitude: Some(1.0),
            longitude: Some(2.0),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn saved_reminders_can_be_read_back() {
        let store = InMemoryReminderStore::new();
        let saved = reminder("test1");

        store.save(saved.clone()).await.unwrap();

        assert_eq!(store.get(saved.id).await.unwrap(), saved);
        assert_eq!(store.get_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn saving_with_an_existing_id_overwrites() {
        let store = InMemoryReminderStore::new();
        let original = reminder("before");
        let replacement = Reminder {
            title: Some("after".to_string()),
            ..original.clone()
        };

        store.save(original).await.unwrap();
        store.save(replacement).await.unwrap();

        let all = store.get_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].title.as_deref(), Some("after"));
    }

    #[tokio::test]
    async fn getting_an_unknown_id_is_an_error_not_a_panic() {
        let store = InMemoryReminderStore::new();

        let result = store.get(Uuid::new_v4()).await;

        assert!(matches!(result, Err(StoreError::NotFound)));
        assert_eq!(result.unwrap_err().to_string(), "Reminder not found");
    }

    #[tokio::test]
    async fn delete_all_leaves_an_empty_collection() {
        let store = InMemoryReminderStore::new();
        store.save(reminder("test1")).await.unwrap();
        store.save(reminder("test2")).await.unwrap();

        store.delete_all().await.unwrap();

        assert!(store.get_all().await.unwrap().is_empty());
    }
}
