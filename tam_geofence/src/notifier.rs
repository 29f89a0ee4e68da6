use async_trait::async_trait;
use tam_models::reminder::Reminder;

/// Delivery seam for fired reminders. Implementations report their own
/// failures; a reminder that cannot be delivered is dropped, not retried.
#[async_trait]
pub trait ReminderNotifier: Send + Sync + 'static {
    async fn notify_arrival(&self, reminder: &Reminder);
}
