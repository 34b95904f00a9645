use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DbBackend, EntityTrait, Set, Statement, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tokio::time::timeout;
use tracing::instrument;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::db::DbPool;
use crate::entities::inventory_movement::{self, MovementKind, MovementOrigin};
use crate::entities::supplier_return::{self, ReturnMotive, ReturnStatus};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::services::sequences::{self, SUPPLIER_RETURN_COUNTER, SUPPLIER_RETURN_PREFIX};
use crate::services::{catalog, ledger, validate_positive_quantity};

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct RequestSupplierReturn {
    pub purchase_order_id: Uuid,
    pub lot_id: Option<Uuid>,
    pub motive: ReturnMotive,
    #[validate(custom = "validate_positive_quantity")]
    pub quantity: Decimal,
    #[validate(length(min = 1, max = 128))]
    pub requested_by: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ProcessSupplierReturn {
    /// APPROVED ships the parts back (ledger EXIT + lot debit); CREDITED
    /// closes the paperwork with no stock effect.
    pub decision: ReturnStatus,
    #[validate(length(min = 1, max = 128))]
    pub processed_by: String,
    pub notes: Option<String>,
}

/// Service for returns of purchased parts to their supplier
#[derive(Clone)]
pub struct SupplierReturnService {
    db_pool: Arc<DbPool>,
    event_sender: EventSender,
    operation_timeout: Duration,
}

impl SupplierReturnService {
    /// Creates a new supplier return service instance
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender, operation_timeout: Duration) -> Self {
        Self {
            db_pool,
            event_sender,
            operation_timeout,
        }
    }

    /// Records a return request. No ledger write happens here; stock is
    /// untouched until the request is approved. The lot quantity check is a
    /// pre-check only and is re-validated at approval time.
    #[instrument(skip(self, request), fields(purchase_order_id = %request.purchase_order_id))]
    pub async fn request_return(
        &self,
        request: RequestSupplierReturn,
    ) -> Result<supplier_return::Model, ServiceError> {
        request.validate()?;

        let db = &*self.db_pool;
        if !catalog::purchase_order_exists(db, request.purchase_order_id).await? {
            return Err(ServiceError::NotFound(format!(
                "Purchase order {} not found",
                request.purchase_order_id
            )));
        }
        if let Some(lot_id) = request.lot_id {
            let lot = catalog::get_lot(db, lot_id).await?;
            if lot.current_quantity < request.quantity {
                crate::metrics::INSUFFICIENT_STOCK_REJECTIONS.inc();
                return Err(ServiceError::InsufficientStock {
                    component_id: lot.component_id,
                    available: lot.current_quantity,
                    requested: request.quantity,
                });
            }
        }

        let record = timeout(
            self.operation_timeout,
            db.transaction::<_, supplier_return::Model, ServiceError>(|txn| {
                Box::pin(async move {
                    let number = sequences::next_document_number(
                        txn,
                        SUPPLIER_RETURN_COUNTER,
                        SUPPLIER_RETURN_PREFIX,
                    )
                    .await?;
                    supplier_return::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        number: Set(number),
                        purchase_order_id: Set(request.purchase_order_id),
                        lot_id: Set(request.lot_id),
                        motive: Set(request.motive),
                        quantity: Set(request.quantity),
                        status: Set(ReturnStatus::Requested),
                        requested_by: Set(request.requested_by.clone()),
                        processed_by: Set(None),
                        notes: Set(request.notes.clone()),
                        processed_at: Set(None),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await
                    .map_err(ServiceError::from_db_err)
                })
            }),
        )
        .await?
        .map_err(ServiceError::from)?;

        crate::metrics::SUPPLIER_RETURNS_REQUESTED.inc();
        self.event_sender
            .send(Event::SupplierReturnRequested {
                return_id: record.id,
                number: record.number.clone(),
            })
            .await
            .map_err(ServiceError::EventError)?;
        Ok(record)
    }

    /// Applies the processing decision to a REQUESTED return. Approval with
    /// a lot re-validates the lot quantity inside the transaction, appends
    /// one EXIT correlated to the purchase order and lot, and debits the
    /// lot cache in the same transaction. Any later processing attempt is
    /// rejected; approval or credit each happen at most once.
    #[instrument(skip(self, decision), fields(decision = %decision.decision))]
    pub async fn process_return(
        &self,
        return_id: Uuid,
        decision: ProcessSupplierReturn,
    ) -> Result<supplier_return::Model, ServiceError> {
        decision.validate()?;
        if decision.decision == ReturnStatus::Requested {
            return Err(ServiceError::ValidationError(
                "decision must be APPROVED or CREDITED".to_string(),
            ));
        }

        let db = &*self.db_pool;
        let record = supplier_return::Entity::find_by_id(return_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Supplier return {} not found", return_id))
            })?;
        match record.status {
            ReturnStatus::Requested => {}
            ReturnStatus::Credited => {
                return Err(ServiceError::InvalidTransition(format!(
                    "Supplier return {} is already credited",
                    record.number
                )));
            }
            ReturnStatus::Approved => {
                return Err(ServiceError::InvalidTransition(format!(
                    "Supplier return {} was already processed",
                    record.number
                )));
            }
        }

        let updated = timeout(
            self.operation_timeout,
            db.transaction::<_, supplier_return::Model, ServiceError>(|txn| {
                Box::pin(async move {
                    let now = Utc::now();
                    // Claim the decision first; the ledger write follows only
                    // a won race.
                    claim_requested_return(
                        txn,
                        record.id,
                        &record.number,
                        decision.decision,
                        &decision.processed_by,
                        decision.notes.as_deref(),
                        now,
                    )
                    .await?;

                    if decision.decision == ReturnStatus::Approved {
                        if let Some(lot_id) = record.lot_id {
                            let lot = catalog::get_lot(txn, lot_id).await?;
                            if lot.current_quantity < record.quantity {
                                crate::metrics::INSUFFICIENT_STOCK_REJECTIONS.inc();
                                return Err(ServiceError::InsufficientStock {
                                    component_id: lot.component_id,
                                    available: lot.current_quantity,
                                    requested: record.quantity,
                                });
                            }
                            ledger::guard_outbound(txn, lot.component_id, None, record.quantity)
                                .await?;
                            inventory_movement::ActiveModel {
                                kind: Set(MovementKind::Exit),
                                origin: Set(MovementOrigin::Return),
                                component_id: Set(lot.component_id),
                                quantity: Set(record.quantity),
                                lot_id: Set(Some(lot_id)),
                                purchase_order_id: Set(Some(record.purchase_order_id)),
                                performed_by: Set(decision.processed_by.clone()),
                                occurred_at: Set(now),
                                ..Default::default()
                            }
                            .insert(txn)
                            .await
                            .map_err(ServiceError::from_db_err)?;
                            catalog::decrement_lot_quantity(txn, lot_id, record.quantity).await?;
                        }
                    }

                    supplier_return::Entity::find_by_id(record.id)
                        .one(txn)
                        .await
                        .map_err(ServiceError::db_error)?
                        .ok_or_else(|| {
                            ServiceError::NotFound(format!(
                                "Supplier return {} not found",
                                record.id
                            ))
                        })
                })
            }),
        )
        .await?
        .map_err(ServiceError::from)?;

        crate::metrics::SUPPLIER_RETURNS_PROCESSED.inc();
        self.event_sender
            .send(Event::SupplierReturnProcessed {
                return_id: updated.id,
                status: updated.status,
            })
            .await
            .map_err(ServiceError::EventError)?;
        Ok(updated)
    }

    /// Gets a supplier return by id
    #[instrument(skip(self))]
    pub async fn get_return(
        &self,
        return_id: Uuid,
    ) -> Result<supplier_return::Model, ServiceError> {
        let db = &*self.db_pool;
        supplier_return::Entity::find_by_id(return_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Supplier return {} not found", return_id))
            })
    }
}

/// Flips a REQUESTED return to its decided status with a conditional update.
/// Zero rows affected means another request decided it first; the caller gets
/// a conflict instead of a second decision.
async fn claim_requested_return<C: ConnectionTrait>(
    conn: &C,
    return_id: Uuid,
    number: &str,
    target: ReturnStatus,
    processed_by: &str,
    notes: Option<&str>,
    now: chrono::DateTime<Utc>,
) -> Result<(), ServiceError> {
    let backend = conn.get_database_backend();
    let sql = match backend {
        DbBackend::Postgres => {
            "UPDATE supplier_returns SET status = $1, processed_by = $2, \
             notes = COALESCE($3, notes), processed_at = $4, updated_at = $5 \
             WHERE id = $6 AND status = $7"
        }
        _ => {
            "UPDATE supplier_returns SET status = ?, processed_by = ?, \
             notes = COALESCE(?, notes), processed_at = ?, updated_at = ? \
             WHERE id = ? AND status = ?"
        }
    };
    let result = conn
        .execute(Statement::from_sql_and_values(
            backend,
            sql,
            [
                target.to_string().into(),
                processed_by.to_string().into(),
                notes.map(str::to_string).into(),
                now.into(),
                now.into(),
                return_id.into(),
                ReturnStatus::Requested.to_string().into(),
            ],
        ))
        .await
        .map_err(ServiceError::from_db_err)?;

    if result.rows_affected() == 0 {
        return Err(ServiceError::InvalidTransition(format!(
            "Supplier return {} was already processed",
            number
        )));
    }
    Ok(())
}
