
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tam_models::reminder::ReminderId;
use tam_storage::{ReminderStore, StoreError};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::notifier::ReminderNotifier;
use crate::region::{self, WatchedRegion};
use crate::registry::{GeofenceError, GeofenceRegistry};

#[derive(Debug)]
enum MonitorMessage {
    Register(WatchedRegion),
    Remove(ReminderId),
    Clear,
    Location { latitude: f64, longitude: f64 },
}

struct Envelope {
    message: MonitorMessage,
    done: oneshot::Sender<()>,
}

struct RegionState {
    region: WatchedRegion,
    was_inside: Option<bool>,
}

/// In-process stand-in for a platform geofencing service: watches reported
/// locations against registered regions and notifies on entry.
pub struct LocationMonitor {
    sender: mpsc::Sender<Envelope>,
    cancellation_token: CancellationToken,
    task_handle: JoinHandle<()>,
}

impl LocationMonitor {
    pub fn spawn(store: Arc<dyn ReminderStore>, notifier: Arc<dyn ReminderNotifier>) -> Self {
        let (sender, receiver) = mpsc::channel(64);
        let cancellation_token = CancellationToken::new();
        let task_token = cancellation_token.child_token();

        let task_handle = tokio::spawn(async move {
            run(receiver, task_token, store, notifier).await;
        });

        Self {
            sender,
            cancellation_token,
            task_handle,
        }
    }

    pub fn handle(&self) -> MonitorHandle {
        MonitorHandle {
            sender: self.sender.clone(),
        }
    }

    pub async fn shutdown(self) {
        self.cancellation_token.cancel();
        if let Err(err) = self.task_handle.await {
            log::error!("Location monitor task did not shut down cleanly: {err}");
        }
    }
}

#[derive(Clone)]
pub struct MonitorHandle {
    sender: mpsc::Sender<Envelope>,
}

impl MonitorHandle {
    // Resolves once the monitor has processed the message, so callers
    // observe their own writes.
    async fn send(&self, message: MonitorMessage) -> Result<(), GeofenceError> {
        let (done, processed) = oneshot::channel();
        self.sender
            .send(Envelope { message, done })
            .await
            .map_err(|_| GeofenceError::MonitorStopped)?;

        processed.await.map_err(|_| GeofenceError::MonitorStopped)
    }
}

#[async_trait]
impl GeofenceRegistry for MonitorHandle {
    async fn register(&self, region: WatchedRegion) -> Result<(), GeofenceError> {
        self.send(MonitorMessage::Register(region)).await
    }

    async fn remove(&self, reminder_id: ReminderId) -> Result<(), GeofenceError> {
        self.send(MonitorMessage::Remove(reminder_id)).await
    }

    async fn clear(&self) -> Result<(), GeofenceError> {
        self.send(MonitorMessage::Clear).await
    }

    async fn report_location(&self, latitude: f64, longitude: f64) -> Result<(), GeofenceError> {
        self.send(MonitorMessage::Location {
            latitude,
            longitude,
        })
        .await
    }
}

async fn run(
    mut receiver: mpsc::Receiver<Envelope>,
    cancellation_token: CancellationToken,
    store: Arc<dyn ReminderStore>,
    notifier: Arc<dyn ReminderNotifier>,
) {
    let mut regions: HashMap<ReminderId, RegionState> = HashMap::new();

    loop {
        tokio::select! {
            _ = cancellation_token.cancelled() => break,
            envelope = receiver.recv() => match envelope {
                Some(envelope) => {
                    handle_message(
                        &mut regions,
                        envelope.message,
                        store.as_ref(),
                        notifier.as_ref(),
                    )
                    .await;
                    let _ = envelope.done.send(());
                }
                None => break,
            }
        }
    }

    log::info!("Location monitor shutting down");
}

async fn handle_message(
    regions: &mut HashMap<ReminderId, RegionState>,
    message: MonitorMessage,
    store: &dyn ReminderStore,
    notifier: &dyn ReminderNotifier,
) {
    match message {
        MonitorMessage::Register(region) => {
            log::info!("Watching region for reminder {}", region.reminder_id);
            regions.insert(
                region.reminder_id,
                RegionState {
                    region,
                    was_inside: None,
                },
            );
        }
        MonitorMessage::Remove(reminder_id) => {
            regions.remove(&reminder_id);
        }
        MonitorMessage::Clear => regions.clear(),
        MonitorMessage::Location {
            latitude,
            longitude,
        } => {
            let mut fired = Vec::new();
            for state in regions.values_mut() {
                let now_inside = state.region.contains(latitude, longitude);
                if region::entered(state.was_inside, now_inside) {
                    fired.push(state.region.reminder_id);
                }
                state.was_inside = Some(now_inside);
            }

            for reminder_id in fired {
                deliver(store, notifier, reminder_id).await;
            }
        }
    }
}

async fn deliver(store: &dyn ReminderStore, notifier: &dyn ReminderNotifier, id: ReminderId) {
    match store.get(id).await {
        Ok(reminder) => notifier.notify_arrival(&reminder).await,
        Err(StoreError::NotFound) => {
            log::warn!("Region fired for reminder {id} which no longer exists; dropping");
        }
        Err(err) => {
            log::error!("Could not load reminder {id} for a fired region: {err}");
        }
    }
}
