pub mod health;
pub mod movements;
pub mod remissions;
pub mod stock;
pub mod supplier_returns;
pub mod transfers;

use std::sync::Arc;
use std::time::Duration;

use crate::db::DbPool;
use crate::events::EventSender;
use crate::services::movements::MovementService;
use crate::services::remissions::RemissionService;
use crate::services::stock::StockService;
use crate::services::supplier_returns::SupplierReturnService;
use crate::services::transfers::TransferService;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub movements: MovementService,
    pub stock: StockService,
    pub transfers: TransferService,
    pub remissions: RemissionService,
    pub supplier_returns: SupplierReturnService,
}

impl AppServices {
    /// Build the services container. Every compound write operation shares the
    /// same event channel and transaction timeout.
    pub fn new(
        db_pool: Arc<DbPool>,
        event_sender: EventSender,
        operation_timeout: Duration,
    ) -> Self {
        Self {
            movements: MovementService::new(
                db_pool.clone(),
                event_sender.clone(),
                operation_timeout,
            ),
            stock: StockService::new(db_pool.clone()),
            transfers: TransferService::new(
                db_pool.clone(),
                event_sender.clone(),
                operation_timeout,
            ),
            remissions: RemissionService::new(
                db_pool.clone(),
                event_sender.clone(),
                operation_timeout,
            ),
            supplier_returns: SupplierReturnService::new(db_pool, event_sender, operation_timeout),
        }
    }
}
