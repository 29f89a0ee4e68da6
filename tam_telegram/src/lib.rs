mod create_reminder;
mod locations;
mod notifier;
mod reminders_list;
mod util;

#[cfg(test)]
mod tests;

pub use notifier::TelegramNotifier;
pub use teloxide;

use std::sync::Arc;

use create_reminder::CreateReminderState;
use tam_geofence::GeofenceRegistry;
use tam_storage::ReminderStore;
use teloxide::dispatching::UpdateHandler;
use teloxide::dispatching::dialogue::{self, InMemStorage};
use teloxide::dptree::{self, case};
use teloxide::macros::BotCommands;
use teloxide::prelude::*;

type GlobalDialogue = Dialogue<GlobalState, InMemStorage<GlobalState>>;
type HandlerResult = anyhow::Result<()>;

/// The chat the bot works for. Everyone else is turned away.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct OwnerChat(pub ChatId);

/// Radius applied to newly watched regions, in meters.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct WatchRadius(pub f64);

#[derive(Default, Clone, Debug, PartialEq)]
enum GlobalState {
    #[default]
    Idle,
    CreatingReminder(CreateReminderState),
}

#[derive(BotCommands, Clone)]
#[command(
    rename_rule = "lowercase",
    description = "These commands are supported:"
)]
enum Command {
    NewReminder,
    Reminders,
    Clear,
    Cancel,
}

pub struct TelegramInteractionInterface;

impl TelegramInteractionInterface {
    pub async fn start(
        bot: Bot,
        owner: OwnerChat,
        default_radius: WatchRadius,
        store: Arc<dyn ReminderStore>,
        geofences: Arc<dyn GeofenceRegistry>,
    ) {
        log::info!("Starting Telegram interaction interface");

        Dispatcher::builder(bot, schema())
            .dependencies(dptree::deps![
                InMemStorage::<GlobalState>::new(),
                store,
                geofences,
                owner,
                default_radius
            ])
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await
    }
}

fn schema() -> UpdateHandler<anyhow::Error> {
    let stranger_handler = Update::filter_message()
        .filter(|msg: Message, owner: OwnerChat| msg.chat.id != owner.0)
        .endpoint(refuse_stranger);

    let cancel_handler = Update::filter_message().branch(
        teloxide::filter_command::<Command, _>().branch(case![Command::Cancel].endpoint(cancel)),
    );

    let invalid_state_handler = Update::filter_message().branch(dptree::endpoint(invalid_state));

    let invalid_callback_handler =
        Update::filter_callback_query().branch(dptree::endpoint(invalid_query));

    dialogue::enter::<Update, InMemStorage<GlobalState>, GlobalState, _>()
        .branch(stranger_handler)
        .branch(cancel_handler)
        .branch(create_reminder::schema())
        .branch(reminders_list::schema())
        .branch(locations::schema())
        .branch(invalid_state_handler)
        .branch(invalid_callback_handler)
}

async fn refuse_stranger(bot: Bot, msg: Message) -> HandlerResult {
    log::warn!("Refusing a message from chat {}", msg.chat.id);
    bot.send_message(msg.chat.id, "This is a private bot.").await?;
    Ok(())
}

async fn cancel(bot: Bot, dialogue: GlobalDialogue, msg: Message) -> HandlerResult {
    bot.send_message(msg.chat.id, "Cancelled current operation.")
        .await?;
    dialogue.exit().await?;
    Ok(())
}

async fn invalid_state(bot: Bot, msg: Message) -> HandlerResult {
    bot.send_message(
        msg.chat.id,
        "Unable to handle the message. Please try again or use /cancel to stop current operation.",
    )
    .await?;
    Ok(())
}

async fn invalid_query(bot: Bot, dialogue: GlobalDialogue, query: CallbackQuery) -> HandlerResult {
    bot.answer_callback_query(query.id).await?;
    bot.send_message(
        dialogue.chat_id(),
        "Unable to handle the query result. Please try again or use /cancel to stop current operation.",
    )
    .await?;
    Ok(())
}
