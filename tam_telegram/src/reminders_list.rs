use std::sync::Arc;

use tam_geofence::GeofenceRegistry;
use tam_models::reminder::Reminder;
use tam_storage::{ReminderStore, StoreError};
use teloxide::dispatching::UpdateHandler;
use teloxide::dptree::{self, case};
use teloxide::prelude::*;
use teloxide::types::{ChatAction, InlineKeyboardButton, InlineKeyboardMarkup, ParseMode};
use teloxide::utils::markdown;

use crate::util::{clear_message_buttons, try_get_message_from_query};
use crate::{Command, GlobalState, HandlerResult};

#[derive(Debug)]
pub(crate) enum ListOutcome {
    Empty,
    Reminders(Vec<Reminder>),
    Failed(StoreError),
}

// List load: the whole collection, an explicit empty marker, or the error
// message to display. A failed load presents as an empty list.
pub(crate) async fn load_reminders(store: &dyn ReminderStore) -> ListOutcome {
    match store.get_all().await {
        Ok(reminders) if reminders.is_empty() => ListOutcome::Empty,
        Ok(reminders) => ListOutcome::Reminders(reminders),
        Err(err) => ListOutcome::Failed(err),
    }
}

async fn list_reminders(store: Arc<dyn ReminderStore>, bot: Bot, msg: Message) -> HandlerResult {
    bot.send_chat_action(msg.chat.id, ChatAction::Typing)
        .await?;

    let text = match load_reminders(store.as_ref()).await {
        ListOutcome::Empty => {
            "You don't have any reminders yet\\. Use /newreminder to add one\\.".to_string()
        }
        ListOutcome::Reminders(reminders) => reminders
            .iter()
            .enumerate()
            .map(|(i, reminder)| display_reminder(i + 1, reminder))
            .collect::<Vec<String>>()
            .join("\n\n"),
        ListOutcome::Failed(err) => markdown::escape(&err.to_string()),
    };

    bot.send_message(msg.chat.id, text)
        .parse_mode(ParseMode::MarkdownV2)
        .await?;

    Ok(())
}

fn display_reminder(order: usize, reminder: &Reminder) -> String {
    let title = reminder.title.as_deref().unwrap_or("(untitled)");
    let location = reminder.location_name.as_deref().unwrap_or("(no location)");

    let mut line = format!(
        "{order}: *{}* \\(at {}\\)",
        markdown::escape(title),
        markdown::escape(location)
    );
    if let Some(description) = reminder.description.as_deref() {
        line.push('\n');
        line.push_str(&markdown::escape(description));
    }

    line
}

async fn clear_reminders(bot: Bot, msg: Message) -> HandlerResult {
    let delete_button = InlineKeyboardButton::callback("Delete all", "clear-all");
    let keyboard = InlineKeyboardMarkup::new(vec![vec![delete_button]]);

    bot.send_message(msg.chat.id, "Delete every reminder? This cannot be undone.")
        .reply_markup(keyboard)
        .await?;

    Ok(())
}

async fn confirm_clear(
    store: Arc<dyn ReminderStore>,
    geofences: Arc<dyn GeofenceRegistry>,
    bot: Bot,
    query: CallbackQuery,
) -> HandlerResult {
    let chat_id = match try_get_message_from_query(&query) {
        Some(message) => {
            clear_message_buttons(&bot, message).await?;
            message.chat.id
        }
        None => {
            bot.answer_callback_query(query.id).await?;
            return Ok(());
        }
    };

    match store.delete_all().await {
        Ok(()) => {
            if let Err(err) = geofences.clear().await {
                log::error!("Could not drop watched regions: {err}");
            }
            bot.send_message(chat_id, "All reminders deleted.").await?;
        }
        Err(err) => {
            bot.send_message(chat_id, err.to_string()).await?;
        }
    }

    bot.answer_callback_query(query.id).await?;
    Ok(())
}

pub(super) fn schema() -> UpdateHandler<anyhow::Error> {
    dptree::entry()
        .branch(
            case![GlobalState::Idle].branch(
                Update::filter_message().branch(
                    teloxide::filter_command::<Command, _>()
                        .branch(case![Command::Reminders].endpoint(list_reminders))
                        .branch(case![Command::Clear].endpoint(clear_reminders)),
                ),
            ),
        )
        .branch(
            case![GlobalState::Idle].branch(
                Update::filter_callback_query()
                    .filter(|query: CallbackQuery| query.data.as_deref() == Some("clear-all"))
                    .endpoint(confirm_clear),
            ),
        )
}
