use super::*;
use crate::pickups::fees::{DEFAULT_PICKUP_FEE, batam_fee_table};
use crate::pickups::notification::NotificationError;
use parking_lot::Mutex;
use shared::error::{AppError, ErrorCode};

/// Sink that keeps every notification in memory
#[derive(Default)]
struct RecordingSink {
    sent: Mutex<Vec<Notification>>,
}

impl RecordingSink {
    fn sent(&self) -> Vec<Notification> {
        self.sent.lock().clone()
    }
}

impl NotificationSink for RecordingSink {
    fn emit(&self, notification: Notification) -> Result<(), NotificationError> {
        self.sent.lock().push(notification);
        Ok(())
    }
}

/// Sink whose channel is always closed
struct ClosedSink;

impl NotificationSink for ClosedSink {
    fn emit(&self, _notification: Notification) -> Result<(), NotificationError> {
        Err(NotificationError::ChannelClosed)
    }
}

fn create_manager_with_sink(sink: Arc<dyn NotificationSink>) -> PickupManager {
    let storage = PickupStorage::open_in_memory().unwrap();
    let fees = Arc::new(
        FeeCalculator::with_seed(storage.clone(), DEFAULT_PICKUP_FEE, &batam_fee_table()).unwrap(),
    );
    PickupManager::new(storage, fees, sink, chrono_tz::Asia::Jakarta)
}

fn create_test_manager() -> (PickupManager, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::default());
    let manager = create_manager_with_sink(sink.clone());
    (manager, sink)
}

fn item(id: &str, name: &str, quantity: f64) -> PickupItem {
    PickupItem {
        id: id.to_string(),
        name: name.to_string(),
        quantity,
        unit: Some("kg".to_string()),
        category_id: None,
    }
}

fn address(sub_district: &str) -> Address {
    Address {
        label: Some("Rumah".to_string()),
        recipient_name: Some("Siti".to_string()),
        phone: Some("081234567890".to_string()),
        street: "Jl. Raja Ali Haji No. 5".to_string(),
        sub_district: sub_district.to_string(),
        city: Some("Batam".to_string()),
        postal_code: Some("29432".to_string()),
        notes: None,
    }
}

fn submit_request(user_id: &str, sub_district: &str) -> SubmitPickupRequest {
    SubmitPickupRequest {
        user_id: Some(user_id.to_string()),
        address: Some(address(sub_district)),
        items: Some(vec![
            item("item-1", "Botol plastik", 3.5),
            item("item-2", "Kardus", 2.0),
        ]),
        photos: Some(vec!["uploads/photo-1.jpg".to_string()]),
        pick_up_date: Some("Selasa, 20 Oktober 2026".to_string()),
    }
}

fn submit(manager: &PickupManager, user_id: &str) -> PickupRequest {
    manager.submit(submit_request(user_id, "Batam Kota")).unwrap()
}

/// Submit and advance through `steps` forward transitions
fn submit_and_advance(manager: &PickupManager, steps: usize) -> PickupRequest {
    let mut pickup = submit(manager, "user-1");
    for _ in 0..steps {
        let next = pickup.status.next().unwrap();
        pickup = manager.advance_status(&pickup.id, next).unwrap();
    }
    pickup
}

mod test_cancel;
mod test_quantity;
mod test_tracking;
