//! Pickup fee lookup by sub-district (kecamatan)
//!
//! Override rows live in redb and are cached in memory. Lookups compare
//! normalized names: trimmed, internal whitespace collapsed, lowercased.
//! The first matching row in insertion order wins.

use super::storage::{PickupStorage, StorageResult};
use parking_lot::RwLock;
use shared::pickup::{FeeOverride, FeeQuote};
use std::path::Path;
use thiserror::Error;

/// Fee applied when no override matches
pub const DEFAULT_PICKUP_FEE: u64 = 10_000;

#[derive(Debug, Error)]
pub enum FeeTableError {
    #[error("Failed to read fee table {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid fee table {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Normalize a sub-district name for comparison
pub fn normalize_sub_district(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Built-in Batam fee table
pub fn batam_fee_table() -> Vec<FeeOverride> {
    [
        ("Batam Kota", 15_000),
        ("Batu Aji", 20_000),
        ("Sagulung", 20_000),
        ("Sekupang", 17_000),
        ("Lubuk Baja", 15_000),
        ("Bengkong", 15_000),
        ("Batu Ampar", 17_000),
        ("Nongsa", 25_000),
        ("Sei Beduk", 20_000),
        ("Belakang Padang", 35_000),
        ("Bulang", 35_000),
        ("Galang", 35_000),
    ]
    .into_iter()
    .map(|(sub_district, fee)| FeeOverride {
        sub_district: sub_district.to_string(),
        fee,
    })
    .collect()
}

/// Load a JSON array of `{subDistrict, fee}` rows
pub fn load_fee_table(path: impl AsRef<Path>) -> Result<Vec<FeeOverride>, FeeTableError> {
    let path = path.as_ref();
    let display = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|source| FeeTableError::Io {
        path: display.clone(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| FeeTableError::Parse {
        path: display,
        source,
    })
}

#[derive(Debug)]
pub struct FeeCalculator {
    storage: PickupStorage,
    default_fee: u64,
    /// Cached copy of the persisted rows, insertion ordered
    overrides: RwLock<Vec<FeeOverride>>,
}

impl FeeCalculator {
    /// Load the persisted overrides into memory
    pub fn new(storage: PickupStorage, default_fee: u64) -> StorageResult<Self> {
        let overrides = storage.list_fee_overrides()?;
        Ok(Self {
            storage,
            default_fee,
            overrides: RwLock::new(overrides),
        })
    }

    /// Seed the table if it is empty, then load it
    pub fn with_seed(
        storage: PickupStorage,
        default_fee: u64,
        seed: &[FeeOverride],
    ) -> StorageResult<Self> {
        let written = storage.seed_fee_overrides(seed)?;
        if written > 0 {
            tracing::info!(rows = written, "Seeded fee overrides");
        }
        Self::new(storage, default_fee)
    }

    pub fn default_fee(&self) -> u64 {
        self.default_fee
    }

    fn find(&self, sub_district: &str) -> Option<u64> {
        let key = normalize_sub_district(sub_district);
        self.overrides
            .read()
            .iter()
            .find(|row| normalize_sub_district(&row.sub_district) == key)
            .map(|row| row.fee)
    }

    /// Fee for a sub-district, falling back to the default
    pub fn fee_for(&self, sub_district: &str) -> u64 {
        self.find(sub_district).unwrap_or(self.default_fee)
    }

    pub fn quote(&self, sub_district: &str) -> FeeQuote {
        match self.find(sub_district) {
            Some(fee) => FeeQuote {
                sub_district: sub_district.trim().to_string(),
                fee,
                from_override: true,
            },
            None => FeeQuote {
                sub_district: sub_district.trim().to_string(),
                fee: self.default_fee,
                from_override: false,
            },
        }
    }

    pub fn list_overrides(&self) -> Vec<FeeOverride> {
        self.overrides.read().clone()
    }

    /// Replace the first row with the same normalized name, or append one
    pub fn set_override(&self, sub_district: &str, fee: u64) -> StorageResult<FeeOverride> {
        let row = FeeOverride {
            sub_district: sub_district.split_whitespace().collect::<Vec<_>>().join(" "),
            fee,
        };
        let key = normalize_sub_district(sub_district);

        // Hold the write lock across the persist so cache and table stay in step
        let mut cache = self.overrides.write();
        self.storage
            .upsert_fee_override(&row, |r| normalize_sub_district(&r.sub_district) == key)?;
        match cache
            .iter_mut()
            .find(|r| normalize_sub_district(&r.sub_district) == key)
        {
            Some(existing) => *existing = row.clone(),
            None => cache.push(row.clone()),
        }

        tracing::info!(sub_district = %row.sub_district, fee, "Fee override updated");
        Ok(row)
    }
}
