use std::sync::Arc;

use crate::core::{Config, Result};
use crate::pickups::fees::{batam_fee_table, load_fee_table};
use crate::pickups::{
    FeeCalculator, NotificationService, NotificationWorker, PickupManager, PickupStorage,
};

/// Server state shared by every handler
///
/// Cheap to clone; every field is reference counted.
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Config,
    pub storage: PickupStorage,
    pub manager: Arc<PickupManager>,
    pub fees: Arc<FeeCalculator>,
    pub notifications: NotificationService,
}

impl ServerState {
    /// Initialize server state
    ///
    /// In order:
    /// 1. work directory
    /// 2. redb database (`work_dir/pickups.redb`), queue counter reconciled on open
    /// 3. fee overrides, seeded on first start
    /// 4. notification channel and its background worker
    /// 5. pickup manager
    pub async fn initialize(config: &Config) -> Result<Self> {
        config.ensure_work_dir()?;

        let db_path = config.database_path();
        let storage = PickupStorage::open(&db_path)?;
        tracing::info!(path = %db_path.display(), "Pickup storage opened");

        let seed = match &config.fee_table_path {
            Some(path) => load_fee_table(path)?,
            None => batam_fee_table(),
        };
        let fees = Arc::new(FeeCalculator::with_seed(
            storage.clone(),
            config.default_pickup_fee,
            &seed,
        )?);

        let (notifications, rx) =
            NotificationService::new(storage.clone(), config.notification_buffer);
        tokio::spawn(NotificationWorker::new(storage.clone()).run(rx));

        let manager = Arc::new(
            PickupManager::new(
                storage.clone(),
                fees.clone(),
                Arc::new(notifications.clone()),
                config.business_timezone,
            )
            .with_quantity_policy(config.quantity_edit_policy),
        );

        Ok(Self {
            config: config.clone(),
            storage,
            manager,
            fees,
            notifications,
        })
    }
}
