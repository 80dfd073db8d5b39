//! Pickup Server - pickup-request lifecycle for the recycling platform
//!
//! # Module layout
//!
//! ```text
//! pickup-server/src/
//! ├── core/          # config, state, server
//! ├── pickups/       # storage (redb), queue numbers, fees, tracking, notifications, manager
//! ├── api/           # HTTP routes and handlers
//! └── utils/         # logger, error re-exports
//! ```

pub mod api;
pub mod core;
pub mod pickups;
pub mod utils;

pub use core::{Config, Server, ServerState};
pub use pickups::{PickupManager, PickupStorage};
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

pub use utils::logger::init_logger_with_file;

/// Load `.env`, read the configuration and initialize logging from it
pub fn setup_environment() -> Config {
    // .env is optional
    let _ = dotenv::dotenv();

    let config = Config::from_env();
    init_logger_with_file(
        Some(&config.log_level),
        config.is_production(),
        config.log_dir.as_deref(),
    );
    config
}
