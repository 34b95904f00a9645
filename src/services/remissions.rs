use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbBackend, EntityTrait, QueryFilter,
    QueryOrder, Set, Statement, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tokio::time::timeout;
use tracing::instrument;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::db::DbPool;
use crate::entities::inventory_movement::{self, MovementKind, MovementOrigin};
use crate::entities::remission::{self, DestinationType, RemissionStatus};
use crate::entities::remission_line;
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::services::sequences::{self, REMISSION_COUNTER, REMISSION_PREFIX};
use crate::services::{catalog, ledger, stock, validate_positive_quantity};

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct RemissionLineInput {
    pub component_id: Uuid,
    #[validate(custom = "validate_positive_quantity")]
    pub quantity: Decimal,
    pub location_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateRemission {
    pub destination_type: DestinationType,
    pub destination_id: Uuid,
    pub service_order_id: Option<Uuid>,
    #[validate(length(min = 1, max = 128))]
    pub delivered_by: String,
    #[validate(length(min = 1))]
    pub lines: Vec<RemissionLineInput>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RemissionWithLines {
    pub remission: remission::Model,
    pub lines: Vec<remission_line::Model>,
}

/// Service for the remission workflow: hand-out of parts to technicians or
/// clients. The stock effect is always a correlated ledger write; the
/// header only tracks document state.
#[derive(Clone)]
pub struct RemissionService {
    db_pool: Arc<DbPool>,
    event_sender: EventSender,
    operation_timeout: Duration,
}

impl RemissionService {
    /// Creates a new remission service instance
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender, operation_timeout: Duration) -> Self {
        Self {
            db_pool,
            event_sender,
            operation_timeout,
        }
    }

    /// Opens a remission and posts one EXIT per line in a single
    /// transaction. Every line's stock is checked before the first write;
    /// any failing line aborts the whole document.
    #[instrument(skip(self, payload), fields(line_count = payload.lines.len()))]
    pub async fn create_remission(
        &self,
        payload: CreateRemission,
    ) -> Result<RemissionWithLines, ServiceError> {
        payload.validate()?;
        for line in &payload.lines {
            line.validate()?;
        }

        let db = &*self.db_pool;
        for line in &payload.lines {
            if !catalog::component_exists(db, line.component_id).await? {
                return Err(ServiceError::NotFound(format!(
                    "Component {} not found",
                    line.component_id
                )));
            }
            if let Some(location_id) = line.location_id {
                if !catalog::location_exists(db, location_id).await? {
                    return Err(ServiceError::NotFound(format!(
                        "Location {} not found",
                        location_id
                    )));
                }
            }
        }

        let result = timeout(
            self.operation_timeout,
            db.transaction::<_, RemissionWithLines, ServiceError>(|txn| {
                Box::pin(async move {
                    // All-line pre-check before any write. The per-line
                    // guards below stay authoritative; this loop only
                    // guarantees no partial document is ever attempted.
                    for line in &payload.lines {
                        let available =
                            stock::fold_stock(txn, line.component_id, line.location_id).await?;
                        if available < line.quantity {
                            crate::metrics::INSUFFICIENT_STOCK_REJECTIONS.inc();
                            return Err(ServiceError::InsufficientStock {
                                component_id: line.component_id,
                                available,
                                requested: line.quantity,
                            });
                        }
                    }

                    let number =
                        sequences::next_document_number(txn, REMISSION_COUNTER, REMISSION_PREFIX)
                            .await?;
                    let remission_id = Uuid::new_v4();
                    let now = Utc::now();
                    let header = remission::ActiveModel {
                        id: Set(remission_id),
                        number: Set(number),
                        destination_type: Set(payload.destination_type),
                        destination_id: Set(payload.destination_id),
                        service_order_id: Set(payload.service_order_id),
                        status: Set(RemissionStatus::Open),
                        delivered_by: Set(payload.delivered_by.clone()),
                        cancellation_motive: Set(None),
                        opened_at: Set(now),
                        closed_at: Set(None),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await
                    .map_err(ServiceError::from_db_err)?;

                    let mut lines = Vec::with_capacity(payload.lines.len());
                    for line in &payload.lines {
                        let line_row = remission_line::ActiveModel {
                            id: Set(Uuid::new_v4()),
                            remission_id: Set(remission_id),
                            component_id: Set(line.component_id),
                            quantity: Set(line.quantity),
                            location_id: Set(line.location_id),
                            created_at: Set(now),
                        }
                        .insert(txn)
                        .await
                        .map_err(ServiceError::from_db_err)?;

                        ledger::guard_outbound(
                            txn,
                            line.component_id,
                            line.location_id,
                            line.quantity,
                        )
                        .await?;
                        inventory_movement::ActiveModel {
                            kind: Set(MovementKind::Exit),
                            origin: Set(MovementOrigin::Remission),
                            component_id: Set(line.component_id),
                            quantity: Set(line.quantity),
                            location_id: Set(line.location_id),
                            remission_id: Set(Some(remission_id)),
                            service_order_id: Set(payload.service_order_id),
                            performed_by: Set(payload.delivered_by.clone()),
                            occurred_at: Set(now),
                            ..Default::default()
                        }
                        .insert(txn)
                        .await
                        .map_err(ServiceError::from_db_err)?;

                        lines.push(line_row);
                    }

                    Ok(RemissionWithLines {
                        remission: header,
                        lines,
                    })
                })
            }),
        )
        .await?
        .map_err(ServiceError::from)?;

        crate::metrics::REMISSIONS_CREATED.inc();
        self.event_sender
            .send(Event::RemissionCreated {
                remission_id: result.remission.id,
                number: result.remission.number.clone(),
                line_count: result.lines.len(),
            })
            .await
            .map_err(ServiceError::EventError)?;
        Ok(result)
    }

    /// Closes an open remission. No ledger effect; the exits were posted at
    /// creation.
    #[instrument(skip(self))]
    pub async fn close_remission(
        &self,
        remission_id: Uuid,
        actor: &str,
    ) -> Result<remission::Model, ServiceError> {
        let db = &*self.db_pool;
        let header = self.load_remission(remission_id).await?;
        match header.status {
            RemissionStatus::Open => {}
            RemissionStatus::Closed => {
                return Err(ServiceError::InvalidTransition(format!(
                    "Remission {} is already closed",
                    header.number
                )));
            }
            RemissionStatus::Cancelled => {
                return Err(ServiceError::InvalidTransition(format!(
                    "Remission {} is cancelled and cannot be closed",
                    header.number
                )));
            }
        }

        claim_open_header(
            db,
            remission_id,
            &header.number,
            RemissionStatus::Closed,
            None,
            Utc::now(),
        )
        .await?;
        let updated = self.load_remission(remission_id).await?;

        crate::metrics::REMISSIONS_CLOSED.inc();
        self.event_sender
            .send(Event::RemissionClosed(updated.id))
            .await
            .map_err(ServiceError::EventError)?;
        Ok(updated)
    }

    /// Cancels an open remission: claims the OPEN header, then posts one
    /// compensating ENTRY per line back to the location the line drew from.
    /// A closed remission is a dead end here: physical parts are out of the
    /// building, so correction goes through a supplier return.
    #[instrument(skip(self, motive))]
    pub async fn cancel_remission(
        &self,
        remission_id: Uuid,
        motive: String,
        actor: String,
    ) -> Result<RemissionWithLines, ServiceError> {
        if motive.trim().is_empty() {
            return Err(ServiceError::ValidationError(
                "a cancellation motive is required".to_string(),
            ));
        }
        let db = &*self.db_pool;
        let header = self.load_remission(remission_id).await?;
        match header.status {
            RemissionStatus::Open => {}
            RemissionStatus::Cancelled => {
                return Err(ServiceError::InvalidTransition(format!(
                    "Remission {} is already cancelled",
                    header.number
                )));
            }
            RemissionStatus::Closed => {
                return Err(ServiceError::InvalidTransition(format!(
                    "Cannot cancel closed remission {}; use a supplier return instead",
                    header.number
                )));
            }
        }
        let lines = remission_line::Entity::find()
            .filter(remission_line::Column::RemissionId.eq(remission_id))
            .order_by_asc(remission_line::Column::Id)
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        let result = timeout(
            self.operation_timeout,
            db.transaction::<_, RemissionWithLines, ServiceError>(|txn| {
                Box::pin(async move {
                    let now = Utc::now();
                    // Claim the header first; compensating entries follow
                    // only a won race.
                    claim_open_header(
                        txn,
                        remission_id,
                        &header.number,
                        RemissionStatus::Cancelled,
                        Some(&motive),
                        now,
                    )
                    .await?;

                    for line in &lines {
                        ledger::credit_inbound(txn, line.component_id, line.quantity).await?;
                        inventory_movement::ActiveModel {
                            kind: Set(MovementKind::Entry),
                            origin: Set(MovementOrigin::Return),
                            component_id: Set(line.component_id),
                            quantity: Set(line.quantity),
                            location_id: Set(line.location_id),
                            remission_id: Set(Some(remission_id)),
                            justification: Set(Some(motive.clone())),
                            performed_by: Set(actor.clone()),
                            occurred_at: Set(now),
                            ..Default::default()
                        }
                        .insert(txn)
                        .await
                        .map_err(ServiceError::from_db_err)?;
                    }

                    let updated = remission::Entity::find_by_id(remission_id)
                        .one(txn)
                        .await
                        .map_err(ServiceError::db_error)?
                        .ok_or_else(|| {
                            ServiceError::NotFound(format!("Remission {} not found", remission_id))
                        })?;

                    Ok(RemissionWithLines {
                        remission: updated,
                        lines,
                    })
                })
            }),
        )
        .await?
        .map_err(ServiceError::from)?;

        crate::metrics::REMISSIONS_CANCELLED.inc();
        self.event_sender
            .send(Event::RemissionCancelled {
                remission_id: result.remission.id,
                motive: result
                    .remission
                    .cancellation_motive
                    .clone()
                    .unwrap_or_default(),
            })
            .await
            .map_err(ServiceError::EventError)?;
        Ok(result)
    }

    /// Gets a remission with its lines
    #[instrument(skip(self))]
    pub async fn get_remission(
        &self,
        remission_id: Uuid,
    ) -> Result<RemissionWithLines, ServiceError> {
        let db = &*self.db_pool;
        let header = self.load_remission(remission_id).await?;
        let lines = remission_line::Entity::find()
            .filter(remission_line::Column::RemissionId.eq(remission_id))
            .order_by_asc(remission_line::Column::Id)
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;
        Ok(RemissionWithLines {
            remission: header,
            lines,
        })
    }

    async fn load_remission(&self, remission_id: Uuid) -> Result<remission::Model, ServiceError> {
        let db = &*self.db_pool;
        remission::Entity::find_by_id(remission_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Remission {} not found", remission_id)))
    }
}

/// Flips an OPEN header to `target` with a conditional update. Zero rows
/// affected means another request transitioned the header first; the caller
/// gets a conflict instead of a second transition.
async fn claim_open_header<C: ConnectionTrait>(
    conn: &C,
    remission_id: Uuid,
    number: &str,
    target: RemissionStatus,
    motive: Option<&str>,
    now: chrono::DateTime<Utc>,
) -> Result<(), ServiceError> {
    let backend = conn.get_database_backend();
    let sql = match backend {
        DbBackend::Postgres => {
            "UPDATE remissions SET status = $1, \
             cancellation_motive = COALESCE($2, cancellation_motive), \
             closed_at = $3, updated_at = $4 WHERE id = $5 AND status = $6"
        }
        _ => {
            "UPDATE remissions SET status = ?, \
             cancellation_motive = COALESCE(?, cancellation_motive), \
             closed_at = ?, updated_at = ? WHERE id = ? AND status = ?"
        }
    };
    let result = conn
        .execute(Statement::from_sql_and_values(
            backend,
            sql,
            [
                target.to_string().into(),
                motive.map(str::to_string).into(),
                now.into(),
                now.into(),
                remission_id.into(),
                RemissionStatus::Open.to_string().into(),
            ],
        ))
        .await
        .map_err(ServiceError::from_db_err)?;

    if result.rows_affected() == 0 {
        return Err(ServiceError::InvalidTransition(format!(
            "Remission {} is no longer open",
            number
        )));
    }
    Ok(())
}
