//! Pickup fee override rows

use serde::{Deserialize, Serialize};

/// One sub-district fee override
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FeeOverride {
    pub sub_district: String,
    pub fee: u64,
}

/// Result of a fee lookup
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FeeQuote {
    pub sub_district: String,
    pub fee: u64,
    /// false when the default fee was applied
    pub from_override: bool,
}
