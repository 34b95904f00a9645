use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, Set, TransactionTrait};
use serde::{Deserialize, Serialize};
use tokio::time::timeout;
use tracing::instrument;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::db::DbPool;
use crate::entities::inventory_movement::{self, MovementKind, MovementOrigin};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::services::{catalog, ledger, validate_positive_quantity};

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateTransfer {
    pub component_id: Uuid,
    #[validate(custom = "validate_positive_quantity")]
    pub quantity: Decimal,
    pub origin_location_id: Uuid,
    pub destination_location_id: Uuid,
    #[validate(length(min = 1, max = 128))]
    pub performed_by: String,
    pub notes: Option<String>,
}

/// Both ledger rows written by a transfer. They share `transfer_id` and
/// `occurred_at`; the exit leg carries the lower ledger id.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TransferResult {
    pub transfer_id: Uuid,
    pub exit_leg: inventory_movement::Model,
    pub entry_leg: inventory_movement::Model,
}

/// Service for warehouse-to-warehouse transfers
#[derive(Clone)]
pub struct TransferService {
    db_pool: Arc<DbPool>,
    event_sender: EventSender,
    operation_timeout: Duration,
}

impl TransferService {
    /// Creates a new transfer service instance
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender, operation_timeout: Duration) -> Self {
        Self {
            db_pool,
            event_sender,
            operation_timeout,
        }
    }

    /// Moves stock between two locations as an exit/entry pair committed in
    /// one transaction. The stock check is scoped to the origin bucket.
    #[instrument(skip(self, transfer), fields(component_id = %transfer.component_id, quantity = %transfer.quantity))]
    pub async fn create_transfer(
        &self,
        transfer: CreateTransfer,
    ) -> Result<TransferResult, ServiceError> {
        transfer.validate()?;
        if transfer.origin_location_id == transfer.destination_location_id {
            return Err(ServiceError::ValidationError(
                "origin and destination locations must differ".to_string(),
            ));
        }

        let db = &*self.db_pool;
        if !catalog::component_exists(db, transfer.component_id).await? {
            return Err(ServiceError::NotFound(format!(
                "Component {} not found",
                transfer.component_id
            )));
        }
        for location_id in [transfer.origin_location_id, transfer.destination_location_id] {
            if !catalog::location_exists(db, location_id).await? {
                return Err(ServiceError::NotFound(format!(
                    "Location {} not found",
                    location_id
                )));
            }
        }

        let result = timeout(
            self.operation_timeout,
            db.transaction::<_, TransferResult, ServiceError>(|txn| {
                Box::pin(async move {
                    let transfer_id = Uuid::new_v4();
                    let occurred_at = Utc::now();

                    ledger::guard_outbound(
                        txn,
                        transfer.component_id,
                        Some(transfer.origin_location_id),
                        transfer.quantity,
                    )
                    .await?;
                    let exit_leg = inventory_movement::ActiveModel {
                        kind: Set(MovementKind::TransferOut),
                        origin: Set(MovementOrigin::Transfer),
                        component_id: Set(transfer.component_id),
                        quantity: Set(transfer.quantity),
                        location_id: Set(Some(transfer.origin_location_id)),
                        transfer_id: Set(Some(transfer_id)),
                        justification: Set(transfer.notes.clone()),
                        performed_by: Set(transfer.performed_by.clone()),
                        occurred_at: Set(occurred_at),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await
                    .map_err(ServiceError::from_db_err)?;

                    ledger::credit_inbound(txn, transfer.component_id, transfer.quantity).await?;
                    let entry_leg = inventory_movement::ActiveModel {
                        kind: Set(MovementKind::TransferIn),
                        origin: Set(MovementOrigin::Transfer),
                        component_id: Set(transfer.component_id),
                        quantity: Set(transfer.quantity),
                        location_id: Set(Some(transfer.destination_location_id)),
                        transfer_id: Set(Some(transfer_id)),
                        justification: Set(transfer.notes.clone()),
                        performed_by: Set(transfer.performed_by.clone()),
                        occurred_at: Set(occurred_at),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await
                    .map_err(ServiceError::from_db_err)?;

                    Ok(TransferResult {
                        transfer_id,
                        exit_leg,
                        entry_leg,
                    })
                })
            }),
        )
        .await?
        .map_err(ServiceError::from)?;

        crate::metrics::TRANSFERS_COMPLETED.inc();
        self.event_sender
            .send(Event::TransferCompleted {
                transfer_id: result.transfer_id,
                component_id: result.exit_leg.component_id,
                quantity: result.exit_leg.quantity,
                origin_location_id: result
                    .exit_leg
                    .location_id
                    .unwrap_or_default(),
                destination_location_id: result
                    .entry_leg
                    .location_id
                    .unwrap_or_default(),
            })
            .await
            .map_err(ServiceError::EventError)?;
        Ok(result)
    }
}
