pub mod movement_queries;

use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use crate::errors::ServiceError;

/// A read-only question asked of the ledger. Queries never write; anything
/// that mutates state lives in the services layer.
#[async_trait]
pub trait Query: Send + Sync {
    type Result: Send + Sync;

    async fn execute(&self, db_pool: &DatabaseConnection) -> Result<Self::Result, ServiceError>;
}
