//! Accumulator-row guards shared by every ledger writer.
//!
//! `stock_balances` is not a source of truth. It exists so that concurrent
//! writers on the same component serialize on one row, and so outbound
//! writes can be rejected atomically with a conditional update instead of a
//! read-then-write stock check. Every ledger append must pass through
//! exactly one of the helpers below inside its own transaction, keeping the
//! accumulator equal to the unscoped fold at every commit point.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ConnectionTrait, DbBackend, Statement};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::services::stock;

/// Debits the accumulator for an outbound movement. Zero rows affected means
/// the component has less than `quantity` on hand (or no balance row at
/// all); the fold is read back for the error payload and the enclosing
/// transaction rolls back.
///
/// When `location_id` is set, the location bucket is re-folded after the
/// debit. The debit already holds the balance-row lock at that point, so no
/// concurrent writer can slip a committed movement under the re-check.
pub async fn guard_outbound<C: ConnectionTrait>(
    conn: &C,
    component_id: Uuid,
    location_id: Option<Uuid>,
    quantity: Decimal,
) -> Result<(), ServiceError> {
    let now = Utc::now();
    let backend = conn.get_database_backend();
    let sql = match backend {
        DbBackend::Postgres => {
            "UPDATE stock_balances SET on_hand = on_hand - $1, updated_at = $2 \
             WHERE component_id = $3 AND on_hand >= $4"
        }
        _ => {
            "UPDATE stock_balances SET on_hand = on_hand - ?, updated_at = ? \
             WHERE component_id = ? AND on_hand >= ?"
        }
    };
    let result = conn
        .execute(Statement::from_sql_and_values(
            backend,
            sql,
            [
                quantity.into(),
                now.into(),
                component_id.into(),
                quantity.into(),
            ],
        ))
        .await
        .map_err(ServiceError::from_db_err)?;

    if result.rows_affected() == 0 {
        let available = stock::fold_stock(conn, component_id, None).await?;
        crate::metrics::INSUFFICIENT_STOCK_REJECTIONS.inc();
        return Err(ServiceError::InsufficientStock {
            component_id,
            available,
            requested: quantity,
        });
    }

    if let Some(location) = location_id {
        let available = stock::fold_stock(conn, component_id, Some(location)).await?;
        if available < quantity {
            crate::metrics::INSUFFICIENT_STOCK_REJECTIONS.inc();
            return Err(ServiceError::InsufficientStock {
                component_id,
                available,
                requested: quantity,
            });
        }
    }

    Ok(())
}

/// Credits the accumulator for an inbound movement. First movement for a
/// component creates the balance row; the upsert is a single statement so
/// two concurrent first entries cannot race past each other.
pub async fn credit_inbound<C: ConnectionTrait>(
    conn: &C,
    component_id: Uuid,
    quantity: Decimal,
) -> Result<(), ServiceError> {
    let now = Utc::now();
    let backend = conn.get_database_backend();
    let sql = match backend {
        DbBackend::Postgres => {
            "INSERT INTO stock_balances (component_id, on_hand, updated_at) VALUES ($1, $2, $3) \
             ON CONFLICT (component_id) DO UPDATE \
             SET on_hand = stock_balances.on_hand + EXCLUDED.on_hand, updated_at = EXCLUDED.updated_at"
        }
        _ => {
            "INSERT INTO stock_balances (component_id, on_hand, updated_at) VALUES (?, ?, ?) \
             ON CONFLICT (component_id) DO UPDATE \
             SET on_hand = stock_balances.on_hand + excluded.on_hand, updated_at = excluded.updated_at"
        }
    };
    conn.execute(Statement::from_sql_and_values(
        backend,
        sql,
        [component_id.into(), quantity.into(), now.into()],
    ))
    .await
    .map_err(ServiceError::from_db_err)?;
    Ok(())
}

/// Replays the full ledger for one component and overwrites its accumulator
/// row with the result. Drift repair for a balance row that was mutated
/// outside the guarded write path; run inside a transaction.
pub async fn rebuild_balance<C: ConnectionTrait>(
    conn: &C,
    component_id: Uuid,
) -> Result<Decimal, ServiceError> {
    let on_hand = stock::fold_stock(conn, component_id, None).await?;
    let now = Utc::now();
    let backend = conn.get_database_backend();
    let sql = match backend {
        DbBackend::Postgres => {
            "INSERT INTO stock_balances (component_id, on_hand, updated_at) VALUES ($1, $2, $3) \
             ON CONFLICT (component_id) DO UPDATE \
             SET on_hand = EXCLUDED.on_hand, updated_at = EXCLUDED.updated_at"
        }
        _ => {
            "INSERT INTO stock_balances (component_id, on_hand, updated_at) VALUES (?, ?, ?) \
             ON CONFLICT (component_id) DO UPDATE \
             SET on_hand = excluded.on_hand, updated_at = excluded.updated_at"
        }
    };
    conn.execute(Statement::from_sql_and_values(
        backend,
        sql,
        [component_id.into(), on_hand.into(), now.into()],
    ))
    .await
    .map_err(ServiceError::from_db_err)?;
    Ok(on_hand)
}
