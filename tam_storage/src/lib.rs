mod memory;
mod reminder;
pub mod sqlite;

pub use memory::InMemoryReminderStore;
pub use reminder::{ReminderStore, StoreError};
pub use sqlite::SqliteReminderStore;
