use teloxide::Bot;
use teloxide::payloads::EditMessageReplyMarkupSetters;
use teloxide::sugar::bot::BotMessagesExt;
use teloxide::types::{CallbackQuery, InlineKeyboardMarkup, MaybeInaccessibleMessage, Message};

pub fn try_get_message_from_query(query: &CallbackQuery) -> Option<&Message> {
    query.message.as_ref().and_then(|msg| match msg {
        MaybeInaccessibleMessage::Inaccessible(_) => None,
        MaybeInaccessibleMessage::Regular(message) => Some(message.as_ref()),
    })
}

pub async fn clear_message_buttons(bot: &Bot, message: &Message) -> Result<(), anyhow::Error> {
    bot.edit_reply_markup(message)
        .reply_markup(InlineKeyboardMarkup::default())
        .await?;

    Ok(())
}
