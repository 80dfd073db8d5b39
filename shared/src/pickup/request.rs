//! Pickup request record and its inputs

use super::status::PickupStatus;
use serde::{Deserialize, Serialize};

/// Address snapshot copied into the pickup at submission time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default)]
    pub street: String,
    /// Kecamatan; drives the pickup fee
    #[serde(default)]
    pub sub_district: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Recyclable item line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PickupItem {
    pub id: String,
    pub name: String,
    pub quantity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
}

/// Pickup request - the primary lifecycle record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PickupRequest {
    pub id: String,
    pub user_id: String,
    /// `ANTRIAN-NNN`, unique for the lifetime of the system
    pub queue_number: String,
    pub address: Address,
    pub items: Vec<PickupItem>,
    pub photos: Vec<String>,
    /// Local midnight of the requested day, Unix millis
    pub pick_up_date: i64,
    pub pick_up_fee: u64,
    pub status: PickupStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancel_reason: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl PickupRequest {
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn find_item_mut(&mut self, item_id: &str) -> Option<&mut PickupItem> {
        self.items.iter_mut().find(|item| item.id == item_id)
    }
}

/// Submission payload
///
/// Every field is optional on the wire so that absence is reported as a
/// validation error instead of a deserialization failure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SubmitPickupRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(default)]
    pub items: Option<Vec<PickupItem>>,
    #[serde(default)]
    pub photos: Option<Vec<String>>,
    /// Localized long date, e.g. `20 Oktober 2026`
    #[serde(default)]
    pub pick_up_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SubmitPickupResponse {
    pub queue_number: String,
    pub pickup_id: String,
}

/// Status after a transition or cancellation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub pickup_id: String,
    pub status: PickupStatus,
}

/// Optional filters for listing a user's pickups
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PickupFilter {
    #[serde(default)]
    pub status: Option<PickupStatus>,
}

impl PickupFilter {
    pub fn matches(&self, pickup: &PickupRequest) -> bool {
        self.status.is_none_or(|status| pickup.status == status)
    }
}
