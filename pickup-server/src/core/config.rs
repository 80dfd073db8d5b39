use crate::pickups::QuantityEditPolicy;
use crate::pickups::fees::DEFAULT_PICKUP_FEE;
use chrono_tz::Tz;
use std::path::PathBuf;

/// Database file name inside the work directory
const DATABASE_FILE: &str = "pickups.redb";

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | ./data | data directory (redb file lives here) |
/// | HTTP_PORT | 3000 | HTTP port |
/// | ENVIRONMENT | development | development, staging or production |
/// | LOG_LEVEL | info | log level |
/// | LOG_DIR | - | daily rolling log directory |
/// | BUSINESS_TIMEZONE | Asia/Jakarta | timezone for pick-up dates |
/// | DEFAULT_PICKUP_FEE | 10000 | fee when no override matches |
/// | FEE_TABLE_PATH | - | JSON seed for fee overrides |
/// | QUANTITY_EDIT_POLICY | allow_any | allow_any or reject_terminal |
/// | NOTIFICATION_BUFFER | 256 | notification channel capacity |
///
/// # Example
///
/// ```ignore
/// WORK_DIR=/srv/pickups HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub work_dir: String,
    pub http_port: u16,
    /// development | staging | production
    pub environment: String,
    pub log_level: String,
    pub log_dir: Option<String>,
    pub business_timezone: Tz,
    /// Rupiah
    pub default_pickup_fee: u64,
    pub fee_table_path: Option<String>,
    pub quantity_edit_policy: QuantityEditPolicy,
    pub notification_buffer: usize,
}

impl Config {
    /// Load from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let business_timezone = match lookup("BUSINESS_TIMEZONE") {
            Some(name) => name.parse::<Tz>().unwrap_or_else(|_| {
                tracing::warn!(timezone = %name, "Unknown BUSINESS_TIMEZONE, using Asia/Jakarta");
                chrono_tz::Asia::Jakarta
            }),
            None => chrono_tz::Asia::Jakarta,
        };

        let quantity_edit_policy = match lookup("QUANTITY_EDIT_POLICY") {
            Some(value) => value.parse().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Invalid QUANTITY_EDIT_POLICY, using allow_any");
                QuantityEditPolicy::AllowAny
            }),
            None => QuantityEditPolicy::AllowAny,
        };

        Self {
            work_dir: lookup("WORK_DIR").unwrap_or_else(|| "./data".into()),
            http_port: lookup("HTTP_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "development".into()),
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            log_dir: lookup("LOG_DIR").filter(|d| !d.trim().is_empty()),
            business_timezone,
            default_pickup_fee: lookup("DEFAULT_PICKUP_FEE")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_PICKUP_FEE),
            fee_table_path: lookup("FEE_TABLE_PATH").filter(|p| !p.trim().is_empty()),
            quantity_edit_policy,
            notification_buffer: lookup("NOTIFICATION_BUFFER")
                .and_then(|v| v.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(256),
        }
    }

    pub fn database_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join(DATABASE_FILE)
    }

    pub fn ensure_work_dir(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.work_dir)
    }

    /// Production logs are JSON lines
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
