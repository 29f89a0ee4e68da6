use std::sync::Arc;

use tam_geofence::GeofenceRegistry;
use teloxide::dispatching::UpdateHandler;
use teloxide::dptree;
use teloxide::prelude::*;

use crate::{HandlerResult, OwnerChat};

// Shared and live locations both land here; live updates arrive as edits of
// the original location message.
async fn handle_location(geofences: Arc<dyn GeofenceRegistry>, msg: Message) -> HandlerResult {
    if let Some(location) = msg.location() {
        log::debug!(
            "Location report: {:.5}, {:.5}",
            location.latitude,
            location.longitude
        );
        if let Err(err) = geofences
            .report_location(location.latitude, location.longitude)
            .await
        {
            log::error!("Could not forward a location report: {err}");
        }
    }
    Ok(())
}

pub(super) fn schema() -> UpdateHandler<anyhow::Error> {
    dptree::entry()
        .branch(
            Update::filter_message()
                .filter(|msg: Message, owner: OwnerChat| msg.chat.id == owner.0)
                .filter(|msg: Message| msg.location().is_some())
                .endpoint(handle_location),
        )
        .branch(
            Update::filter_edited_message()
                .filter(|msg: Message, owner: OwnerChat| msg.chat.id == owner.0)
                .filter(|msg: Message| msg.location().is_some())
                .endpoint(handle_location),
        )
}
