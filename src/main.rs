mod settings;

use std::str::FromStr;
use std::sync::Arc;

use anyhow::Context;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tam_geofence::{GeofenceRegistry, LocationMonitor};
use tam_storage::{ReminderStore, SqliteReminderStore, sqlite};
use tam_telegram::{OwnerChat, TelegramInteractionInterface, TelegramNotifier, WatchRadius};
use teloxide::prelude::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    pretty_env_logger::init();

    let settings = settings::load().context("Could not load settings")?;

    let connect_options = SqliteConnectOptions::from_str(&settings.database.url)
        .context("Invalid database url")?
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .connect_with(connect_options)
        .await
        .context("Could not open the reminder database")?;
    sqlite::migrate(&pool)
        .await
        .context("Could not run database migrations")?;

    let store: Arc<dyn ReminderStore> = Arc::new(SqliteReminderStore::new(pool));

    let bot = Bot::new(settings.telegram.token.clone());
    let owner = OwnerChat(ChatId(settings.telegram.owner_chat_id));

    let notifier = Arc::new(TelegramNotifier::new(bot.clone(), owner.0));
    let monitor = LocationMonitor::spawn(Arc::clone(&store), notifier);
    let geofences: Arc<dyn GeofenceRegistry> = Arc::new(monitor.handle());

    log::info!("tam is up, watching for arrivals");

    TelegramInteractionInterface::start(
        bot,
        owner,
        WatchRadius(settings.geofence.radius_m),
        store,
        geofences,
    )
    .await;

    monitor.shutdown().await;

    Ok(())
}
