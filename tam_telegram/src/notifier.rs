use async_trait::async_trait;
use tam_geofence::ReminderNotifier;
use tam_models::reminder::Reminder;
use teloxide::prelude::*;
use teloxide::types::ParseMode;
use teloxide::utils::markdown;

/// Sends fired reminders to the owner chat.
pub struct TelegramNotifier {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramNotifier {
    pub fn new(bot: Bot, chat_id: ChatId) -> Self {
        Self { bot, chat_id }
    }
}

#[async_trait]
impl ReminderNotifier for TelegramNotifier {
    async fn notify_arrival(&self, reminder: &Reminder) {
        let result = self
            .bot
            .send_message(self.chat_id, arrival_text(reminder))
            .parse_mode(ParseMode::MarkdownV2)
            .await;

        if let Err(err) = result {
            log::error!("Could not deliver reminder {}: {err}", reminder.id);
        }
    }
}

fn arrival_text(reminder: &Reminder) -> String {
    let title = reminder.title.as_deref().unwrap_or("(untitled)");

    let mut text = format!("📍 *{}*", markdown::escape(title));
    if let Some(location) = reminder.location_name.as_deref() {
        text.push('\n');
        text.push_str(&markdown::escape(location));
    }
    if let Some(description) = reminder.description.as_deref() {
        text.push('\n');
        text.push_str(&markdown::escape(description));
    }

    text
}
