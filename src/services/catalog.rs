//! Lookups against collaborator tables (components, locations, lots,
//! purchase orders). These are free functions over `ConnectionTrait` so the
//! orchestrators can run them both on the pool and inside open transactions.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ConnectionTrait, DbBackend, EntityTrait, Statement};
use uuid::Uuid;

use crate::entities::{component, location, lot, purchase_order};
use crate::errors::ServiceError;

pub async fn component_exists<C: ConnectionTrait>(
    conn: &C,
    component_id: Uuid,
) -> Result<bool, ServiceError> {
    let found = component::Entity::find_by_id(component_id)
        .one(conn)
        .await
        .map_err(ServiceError::db_error)?;
    Ok(found.is_some())
}

/// Fetches a component or fails with `NotFound`.
pub async fn describe_component<C: ConnectionTrait>(
    conn: &C,
    component_id: Uuid,
) -> Result<component::Model, ServiceError> {
    component::Entity::find_by_id(component_id)
        .one(conn)
        .await
        .map_err(ServiceError::db_error)?
        .ok_or_else(|| ServiceError::NotFound(format!("Component {} not found", component_id)))
}

pub async fn location_exists<C: ConnectionTrait>(
    conn: &C,
    location_id: Uuid,
) -> Result<bool, ServiceError> {
    let found = location::Entity::find_by_id(location_id)
        .one(conn)
        .await
        .map_err(ServiceError::db_error)?;
    Ok(found.is_some())
}

/// Fetches a lot or fails with `NotFound`.
pub async fn get_lot<C: ConnectionTrait>(conn: &C, lot_id: Uuid) -> Result<lot::Model, ServiceError> {
    lot::Entity::find_by_id(lot_id)
        .one(conn)
        .await
        .map_err(ServiceError::db_error)?
        .ok_or_else(|| ServiceError::NotFound(format!("Lot {} not found", lot_id)))
}

pub async fn purchase_order_exists<C: ConnectionTrait>(
    conn: &C,
    purchase_order_id: Uuid,
) -> Result<bool, ServiceError> {
    let found = purchase_order::Entity::find_by_id(purchase_order_id)
        .one(conn)
        .await
        .map_err(ServiceError::db_error)?;
    Ok(found.is_some())
}

/// Debits `lots.current_quantity` with a conditional update so the cached
/// figure can never go below zero. Must run inside the same transaction as
/// the ledger write it mirrors.
pub async fn decrement_lot_quantity<C: ConnectionTrait>(
    conn: &C,
    lot_id: Uuid,
    quantity: Decimal,
) -> Result<(), ServiceError> {
    let now = Utc::now();
    let backend = conn.get_database_backend();
    let sql = match backend {
        DbBackend::Postgres => {
            "UPDATE lots SET current_quantity = current_quantity - $1, updated_at = $2 \
             WHERE id = $3 AND current_quantity >= $4"
        }
        _ => {
            "UPDATE lots SET current_quantity = current_quantity - ?, updated_at = ? \
             WHERE id = ? AND current_quantity >= ?"
        }
    };
    let result = conn
        .execute(Statement::from_sql_and_values(
            backend,
            sql,
            [
                quantity.into(),
                now.into(),
                lot_id.into(),
                quantity.into(),
            ],
        ))
        .await
        .map_err(ServiceError::from_db_err)?;

    if result.rows_affected() == 0 {
        let lot = get_lot(conn, lot_id).await?;
        crate::metrics::INSUFFICIENT_STOCK_REJECTIONS.inc();
        return Err(ServiceError::InsufficientStock {
            component_id: lot.component_id,
            available: lot.current_quantity,
            requested: quantity,
        });
    }
    Ok(())
}
