//! Document number generation backed by the `document_counters` table.
//! The counter increment and the insert of the numbered record share one
//! transaction, so a rolled-back operation leaves a gap at most, never a
//! duplicate. The unique index on the number column is the backstop.

use sea_orm::{ConnectionTrait, DbBackend, Statement};

use crate::errors::ServiceError;

pub const REMISSION_COUNTER: &str = "remission_number";
pub const REMISSION_PREFIX: &str = "REM";
pub const SUPPLIER_RETURN_COUNTER: &str = "supplier_return_number";
pub const SUPPLIER_RETURN_PREFIX: &str = "RET";

/// Atomically bumps the named counter and returns the formatted document
/// number. Callers must hold an open transaction; the row lock taken by the
/// upsert serializes concurrent number requests.
pub async fn next_document_number<C: ConnectionTrait>(
    conn: &C,
    counter: &str,
    prefix: &str,
) -> Result<String, ServiceError> {
    let now = chrono::Utc::now();
    let backend = conn.get_database_backend();
    let sql = match backend {
        DbBackend::Postgres => {
            "INSERT INTO document_counters (name, value, updated_at) VALUES ($1, 1, $2) \
             ON CONFLICT (name) DO UPDATE SET value = document_counters.value + 1, updated_at = $3 \
             RETURNING value"
        }
        _ => {
            "INSERT INTO document_counters (name, value, updated_at) VALUES (?, 1, ?) \
             ON CONFLICT (name) DO UPDATE SET value = document_counters.value + 1, updated_at = ? \
             RETURNING value"
        }
    };
    let row = conn
        .query_one(Statement::from_sql_and_values(
            backend,
            sql,
            [counter.into(), now.into(), now.into()],
        ))
        .await
        .map_err(ServiceError::from_db_err)?
        .ok_or_else(|| {
            ServiceError::InternalError(format!("Counter upsert for {} returned no row", counter))
        })?;
    let value: i64 = row
        .try_get("", "value")
        .map_err(ServiceError::db_error)?;
    Ok(format_document_number(prefix, value))
}

pub fn format_document_number(prefix: &str, value: i64) -> String {
    format!("{}-{:06}", prefix, value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_numbers_are_zero_padded() {
        assert_eq!(format_document_number(REMISSION_PREFIX, 1), "REM-000001");
        assert_eq!(
            format_document_number(SUPPLIER_RETURN_PREFIX, 12345),
            "RET-012345"
        );
    }

    #[test]
    fn document_numbers_grow_past_six_digits() {
        assert_eq!(format_document_number("REM", 1_234_567), "REM-1234567");
    }
}
