use std::sync::Arc;

use tam_geofence::{GeofenceError, GeofenceRegistry, WatchedRegion};
use tam_models::reminder::{Reminder, ReminderDraft};
use tam_storage::{ReminderStore, StoreError};
use teloxide::dispatching::UpdateHandler;
use teloxide::dptree::{self, case};
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, Location};

use crate::util::{clear_message_buttons, try_get_message_from_query};
use crate::{Command, GlobalDialogue, GlobalState, HandlerResult, WatchRadius};

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum CreateReminderState {
    Editing { draft: ReminderDraft },
    WaitingForTitle { draft: ReminderDraft },
    WaitingForDescription { draft: ReminderDraft },
    WaitingForLocation { draft: ReminderDraft },
}

#[derive(Debug)]
pub(crate) enum SaveOutcome {
    Invalid(tam_models::reminder::DraftError),
    GeofenceFailed(GeofenceError),
    StoreFailed(StoreError),
    Saved(Reminder),
}

// The save guard sequence: validate, watch the region, persist. Aborts at
// the first failed step, and nothing is persisted on abort.
pub(crate) async fn save_reminder(
    store: &dyn ReminderStore,
    geofences: &dyn GeofenceRegistry,
    default_radius_m: f64,
    draft: ReminderDraft,
) -> SaveOutcome {
    let reminder = match draft.validate() {
        Ok(reminder) => reminder,
        Err(err) => return SaveOutcome::Invalid(err),
    };

    if let (Some(latitude), Some(longitude)) = (reminder.latitude, reminder.longitude) {
        let region = match WatchedRegion::new(reminder.id, latitude, longitude, default_radius_m) {
            Ok(region) => region,
            Err(err) => return SaveOutcome::GeofenceFailed(err),
        };
        if let Err(err) = geofences.register(region).await {
            return SaveOutcome::GeofenceFailed(err);
        }
    }

    match store.save(reminder.clone()).await {
        Ok(()) => SaveOutcome::Saved(reminder),
        Err(err) => SaveOutcome::StoreFailed(err),
    }
}

async fn start_create_reminder(bot: Bot, dialogue: GlobalDialogue, msg: Message) -> HandlerResult {
    let draft = ReminderDraft::new();
    send_draft_overview(&bot, msg.chat.id, &draft).await?;
    dialogue
        .update(GlobalState::CreatingReminder(CreateReminderState::Editing {
            draft,
        }))
        .await?;
    Ok(())
}

async fn handle_draft_action(
    bot: Bot,
    dialogue: GlobalDialogue,
    draft: ReminderDraft,
    query: CallbackQuery,
    store: Arc<dyn ReminderStore>,
    geofences: Arc<dyn GeofenceRegistry>,
    default_radius: WatchRadius,
) -> HandlerResult {
    if let Some(message) = try_get_message_from_query(&query) {
        clear_message_buttons(&bot, message).await?;
    }

    match query.data.as_deref().unwrap_or("") {
        "title" => {
            bot.send_message(dialogue.chat_id(), "Send me the reminder title.")
                .await?;
            dialogue
                .update(GlobalState::CreatingReminder(
                    CreateReminderState::WaitingForTitle { draft },
                ))
                .await?;
        }
        "description" => {
            bot.send_message(dialogue.chat_id(), "Send me the reminder description.")
                .await?;
            dialogue
                .update(GlobalState::CreatingReminder(
                    CreateReminderState::WaitingForDescription { draft },
                ))
                .await?;
        }
        "location" => {
            bot.send_message(
                dialogue.chat_id(),
                "Send me a location for this reminder (attach one via the clip menu).",
            )
            .await?;
            dialogue
                .update(GlobalState::CreatingReminder(
                    CreateReminderState::WaitingForLocation { draft },
                ))
                .await?;
        }
        "save" => {
            match save_reminder(
                store.as_ref(),
                geofences.as_ref(),
                default_radius.0,
                draft.clone(),
            )
            .await
            {
                SaveOutcome::Saved(reminder) => {
                    log::info!("Saved reminder {}", reminder.id);
                    bot.send_message(
                        dialogue.chat_id(),
                        "Reminder saved! Share your live location so I can tell you when you are there.",
                    )
                    .await?;
                    dialogue.exit().await?;
                }
                SaveOutcome::Invalid(err) => {
                    send_draft_retry(&bot, &dialogue, &draft, err.to_string()).await?;
                }
                SaveOutcome::GeofenceFailed(err) => {
                    send_draft_retry(
                        &bot,
                        &dialogue,
                        &draft,
                        format!("Couldn't watch that location: {err}. The reminder was not saved."),
                    )
                    .await?;
                }
                SaveOutcome::StoreFailed(err) => {
                    send_draft_retry(
                        &bot,
                        &dialogue,
                        &draft,
                        format!("Couldn't save the reminder: {err}"),
                    )
                    .await?;
                }
            }
        }
        _ => {}
    }

    bot.answer_callback_query(query.id).await?;
    Ok(())
}

async fn receive_title(
    bot: Bot,
    dialogue: GlobalDialogue,
    draft: ReminderDraft,
    msg: Message,
) -> HandlerResult {
    match msg.text() {
        Some(text) => {
            let draft = ReminderDraft {
                title: Some(text.to_string()),
                ..draft
            };
            send_draft_overview(&bot, msg.chat.id, &draft).await?;
            dialogue
                .update(GlobalState::CreatingReminder(CreateReminderState::Editing {
                    draft,
                }))
                .await?;
        }
        None => {
            bot.send_message(msg.chat.id, "Please send me plain text for the title.")
                .await?;
        }
    }
    Ok(())
}

async fn receive_description(
    bot: Bot,
    dialogue: GlobalDialogue,
    draft: ReminderDraft,
    msg: Message,
) -> HandlerResult {
    match msg.text() {
        Some(text) => {
            let draft = ReminderDraft {
                description: Some(text.to_string()),
                ..draft
            };
            send_draft_overview(&bot, msg.chat.id, &draft).await?;
            dialogue
                .update(GlobalState::CreatingReminder(CreateReminderState::Editing {
                    draft,
                }))
                .await?;
        }
        None => {
            bot.send_message(msg.chat.id, "Please send me plain text for the description.")
                .await?;
        }
    }
    Ok(())
}

async fn receive_location(
    bot: Bot,
    dialogue: GlobalDialogue,
    draft: ReminderDraft,
    msg: Message,
) -> HandlerResult {
    match extract_place(&msg) {
        Some((latitude, longitude, name)) => {
            let draft = ReminderDraft {
                location_name: Some(name),
                latitude: Some(latitude),
                longitude: Some(longitude),
                ..draft
            };
            send_draft_overview(&bot, msg.chat.id, &draft).await?;
            dialogue
                .update(GlobalState::CreatingReminder(CreateReminderState::Editing {
                    draft,
                }))
                .await?;
        }
        None => {
            bot.send_message(
                msg.chat.id,
                "I need a location here. Attach one via the clip menu, or use /cancel.",
            )
            .await?;
        }
    }
    Ok(())
}

// A picked venue keeps its place name; a bare point falls back to printed
// coordinates so the location guard can still pass. Venues carry their
// coordinates themselves and do not show up as plain locations.
fn extract_place(msg: &Message) -> Option<(f64, f64, String)> {
    if let Some(venue) = msg.venue() {
        return Some((
            venue.location.latitude,
            venue.location.longitude,
            venue.title.clone(),
        ));
    }

    msg.location().map(|location: &Location| {
        (
            location.latitude,
            location.longitude,
            format!("{:.5}, {:.5}", location.latitude, location.longitude),
        )
    })
}

async fn send_draft_overview(bot: &Bot, chat_id: ChatId, draft: &ReminderDraft) -> HandlerResult {
    bot.send_message(chat_id, draft_overview(draft))
        .reply_markup(draft_keyboard())
        .await?;
    Ok(())
}

// Failed saves re-show the keyboard so the draft stays editable.
async fn send_draft_retry(
    bot: &Bot,
    dialogue: &GlobalDialogue,
    draft: &ReminderDraft,
    text: String,
) -> HandlerResult {
    bot.send_message(dialogue.chat_id(), text).await?;
    send_draft_overview(bot, dialogue.chat_id(), draft).await
}

fn draft_overview(draft: &ReminderDraft) -> String {
    format!(
        "New reminder\nTitle: {}\nDescription: {}\nLocation: {}",
        draft.title.as_deref().unwrap_or("(not set)"),
        draft.description.as_deref().unwrap_or("(not set)"),
        draft.location_name.as_deref().unwrap_or("(not set)"),
    )
}

fn draft_keyboard() -> InlineKeyboardMarkup {
    let title = InlineKeyboardButton::callback("Title", "title");
    let description = InlineKeyboardButton::callback("Description", "description");
    let location = InlineKeyboardButton::callback("Location", "location");
    let save = InlineKeyboardButton::callback("Save", "save");

    InlineKeyboardMarkup::new(vec![vec![title, description], vec![location, save]])
}

pub(super) fn schema() -> UpdateHandler<anyhow::Error> {
    dptree::entry()
        .branch(
            Update::filter_message()
                .branch(
                    teloxide::filter_command::<Command, _>().branch(
                        case![GlobalState::Idle]
                            .branch(case![Command::NewReminder].endpoint(start_create_reminder)),
                    ),
                )
                .branch(
                    case![GlobalState::CreatingReminder(state)]
                        .branch(
                            case![CreateReminderState::WaitingForTitle { draft }]
                                .endpoint(receive_title),
                        )
                        .branch(
                            case![CreateReminderState::WaitingForDescription { draft }]
                                .endpoint(receive_description),
                        )
                        .branch(
                            case![CreateReminderState::WaitingForLocation { draft }]
                                .endpoint(receive_location),
                        ),
                ),
        )
        .branch(
            Update::filter_callback_query().branch(
                case![GlobalState::CreatingReminder(state)].branch(
                    case![CreateReminderState::Editing { draft }].endpoint(handle_draft_action),
                ),
            ),
        )
}
