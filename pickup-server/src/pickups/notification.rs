//! Notification emitter
//!
//! The manager hands notifications to a [`NotificationSink`] after its write
//! transaction has committed. The production sink, [`NotificationService`],
//! pushes them onto a bounded mpsc channel; [`NotificationWorker`] drains the
//! channel into the `notifications` table. Delivery is best effort: the
//! caller logs a failed emit and carries on.

use super::storage::{PickupStorage, StorageResult};
use shared::pickup::Notification;
use thiserror::Error;
use tokio::sync::mpsc;

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("Notification channel is full")]
    ChannelFull,

    #[error("Notification channel is closed")]
    ChannelClosed,
}

/// Side-effect sink for user notifications
pub trait NotificationSink: Send + Sync {
    fn emit(&self, notification: Notification) -> Result<(), NotificationError>;
}

/// Channel-backed sink
#[derive(Clone)]
pub struct NotificationService {
    storage: PickupStorage,
    tx: mpsc::Sender<Notification>,
}

impl std::fmt::Debug for NotificationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationService")
            .field("capacity", &self.tx.max_capacity())
            .finish_non_exhaustive()
    }
}

impl NotificationService {
    pub fn new(storage: PickupStorage, buffer_size: usize) -> (Self, mpsc::Receiver<Notification>) {
        let (tx, rx) = mpsc::channel(buffer_size.max(1));
        (Self { storage, tx }, rx)
    }

    /// Notifications for a user, oldest first
    pub fn list_for_user(&self, user_id: &str) -> StorageResult<Vec<Notification>> {
        self.storage.list_notifications(user_id)
    }
}

impl NotificationSink for NotificationService {
    fn emit(&self, notification: Notification) -> Result<(), NotificationError> {
        self.tx.try_send(notification).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => NotificationError::ChannelFull,
            mpsc::error::TrySendError::Closed(_) => NotificationError::ChannelClosed,
        })
    }
}

/// Background writer for queued notifications
pub struct NotificationWorker {
    storage: PickupStorage,
}

impl NotificationWorker {
    pub fn new(storage: PickupStorage) -> Self {
        Self { storage }
    }

    /// Run until the channel closes
    pub async fn run(self, mut rx: mpsc::Receiver<Notification>) {
        tracing::info!("Notification worker started");

        while let Some(notification) = rx.recv().await {
            let storage = self.storage.clone();
            let user_id = notification.user_id.clone();
            let pickup_id = notification.pickup_id.clone();
            let result =
                tokio::task::spawn_blocking(move || storage.append_notification(&notification))
                    .await;

            match result {
                Ok(Ok(())) => {
                    tracing::debug!(user_id = %user_id, pickup_id = %pickup_id, "Notification stored");
                }
                Ok(Err(e)) => {
                    tracing::error!(user_id = %user_id, pickup_id = %pickup_id, error = %e, "Failed to store notification");
                }
                Err(e) => {
                    tracing::error!(user_id = %user_id, error = %e, "Notification write task failed");
                }
            }
        }

        tracing::info!("Notification channel closed, worker stopping");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notification(user_id: &str, pickup_id: &str) -> Notification {
        Notification::pickup_cancelled(
            shared::util::new_id(),
            user_id.to_string(),
            pickup_id.to_string(),
            "ANTRIAN-001",
            "Tidak ada di rumah",
            shared::util::now_millis(),
        )
    }

    #[tokio::test]
    async fn test_worker_persists_emitted_notifications() {
        let storage = PickupStorage::open_in_memory().unwrap();
        let (service, rx) = NotificationService::new(storage.clone(), 8);
        let worker = tokio::spawn(NotificationWorker::new(storage.clone()).run(rx));

        service.emit(notification("u-1", "p-1")).unwrap();
        service.emit(notification("u-1", "p-2")).unwrap();
        service.emit(notification("u-2", "p-3")).unwrap();
        drop(service);
        worker.await.unwrap();

        let listed = storage.list_notifications("u-1").unwrap();
        let pickups: Vec<_> = listed.iter().map(|n| n.pickup_id.as_str()).collect();
        assert_eq!(pickups, vec!["p-1", "p-2"]);
        assert!(listed[0].message.contains("Tidak ada di rumah"));
        assert_eq!(storage.list_notifications("u-2").unwrap().len(), 1);
    }

    #[test]
    fn test_emit_reports_full_and_closed_channel() {
        let storage = PickupStorage::open_in_memory().unwrap();
        let (service, rx) = NotificationService::new(storage, 1);

        service.emit(notification("u-1", "p-1")).unwrap();
        assert!(matches!(
            service.emit(notification("u-1", "p-2")),
            Err(NotificationError::ChannelFull)
        ));

        drop(rx);
        assert!(matches!(
            service.emit(notification("u-1", "p-3")),
            Err(NotificationError::ChannelClosed)
        ));
    }
}
