use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, EntityTrait, Set, TransactionTrait};
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

/// Input for a single ledger append. Correlation to remissions and transfers
/// is deliberately absent: those rows are only written by their own
/// workflows.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct NewMovement {
    pub kind: MovementKind,
    pub origin: MovementOrigin,
    pub component_id: Uuid,
    #[validate(custom = "validate_positive_quantity")]
    pub quantity: Decimal,
    pub unit_cost: Option<Decimal>,
    pub location_id: Option<Uuid>,
    pub lot_id: Option<Uuid>,
    pub service_order_id: Option<Uuid>,
    pub purchase_order_id: Option<Uuid>,
    /// Required for adjustment kinds, free-form otherwise.
    pub justification: Option<String>,
    #[validate(length(min = 1, max = 128))]
    pub performed_by: String,
    /// Defaults to now; explicit values may backdate the movement.
    pub occurred_at: Option<DateTime<Utc>>,
}

/// Service for appending to and reading the movement ledger
#[derive(Clone)]
pub struct MovementService {
    db_pool: Arc<DbPool>,
    event_sender: EventSender,
    operation_timeout: Duration,
}

impl MovementService {
    /// Creates a new movement service instance
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender, operation_timeout: Duration) -> Self {
        Self {
            db_pool,
            event_sender,
            operation_timeout,
        }
    }

    /// Appends one movement to the ledger. Outbound kinds run the atomic
    /// stock guard; a failed guard rolls back the append entirely.
    #[instrument(skip(self, new_movement), fields(component_id = %new_movement.component_id, kind = %new_movement.kind))]
    pub async fn register_movement(
        &self,
        new_movement: NewMovement,
    ) -> Result<inventory_movement::Model, ServiceError> {
        new_movement.validate()?;
        if new_movement.kind.is_transfer_leg() {
            return Err(ServiceError::ValidationError(
                "transfer movements are created through the transfer operation".to_string(),
            ));
        }
        if new_movement.kind.is_adjustment() {
            let justified = new_movement
                .justification
                .as_deref()
                .map(str::trim)
                .is_some_and(|justification| !justification.is_empty());
            if !justified {
                return Err(ServiceError::ValidationError(
                    "adjustment movements require a justification".to_string(),
                ));
            }
        }

        let db = &*self.db_pool;
        if !catalog::component_exists(db, new_movement.component_id).await? {
            return Err(ServiceError::NotFound(format!(
                "Component {} not found",
                new_movement.component_id
            )));
        }
        if let Some(location_id) = new_movement.location_id {
            if !catalog::location_exists(db, location_id).await? {
                return Err(ServiceError::NotFound(format!(
                    "Location {} not found",
                    location_id
                )));
            }
        }
        if let Some(lot_id) = new_movement.lot_id {
            let lot = catalog::get_lot(db, lot_id).await?;
            if lot.component_id != new_movement.component_id {
                return Err(ServiceError::ValidationError(format!(
                    "Lot {} does not belong to component {}",
                    lot_id, new_movement.component_id
                )));
            }
        }

        let outbound = new_movement.kind.is_outbound();
        let movement = timeout(
            self.operation_timeout,
            db.transaction::<_, inventory_movement::Model, ServiceError>(|txn| {
                Box::pin(async move {
                    if outbound {
                        ledger::guard_outbound(
                            txn,
                            new_movement.component_id,
                            new_movement.location_id,
                            new_movement.quantity,
                        )
                        .await?;
                    } else {
                        ledger::credit_inbound(
                            txn,
                            new_movement.component_id,
                            new_movement.quantity,
                        )
                        .await?;
                    }

                    let mut row = inventory_movement::ActiveModel {
                        kind: Set(new_movement.kind),
                        origin: Set(new_movement.origin),
                        component_id: Set(new_movement.component_id),
                        quantity: Set(new_movement.quantity),
                        unit_cost: Set(new_movement.unit_cost),
                        location_id: Set(new_movement.location_id),
                        lot_id: Set(new_movement.lot_id),
                        service_order_id: Set(new_movement.service_order_id),
                        purchase_order_id: Set(new_movement.purchase_order_id),
                        justification: Set(new_movement.justification.clone()),
                        performed_by: Set(new_movement.performed_by.clone()),
                        ..Default::default()
                    };
                    if let Some(occurred_at) = new_movement.occurred_at {
                        row.occurred_at = Set(occurred_at);
                    }
                    row.insert(txn).await.map_err(ServiceError::from_db_err)
                })
            }),
        )
        .await?
        .map_err(ServiceError::from)?;

        crate::metrics::MOVEMENTS_REGISTERED.inc();
        self.event_sender
            .send(Event::MovementRegistered {
                movement_id: movement.id,
                component_id: movement.component_id,
                kind: movement.kind,
                quantity: movement.quantity,
            })
            .await
            .map_err(ServiceError::EventError)?;
        Ok(movement)
    }

    /// Gets a movement by its ledger id
    #[instrument(skip(self))]
    pub async fn get_movement(&self, id: i64) -> Result<inventory_movement::Model, ServiceError> {
        let db = &*self.db_pool;
        inventory_movement::Entity::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Movement {} not found", id)))
    }
}
