use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Purchase order header. Owned by procurement; the ledger reads it to
/// validate supplier-return correlations.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[schema(as = PurchaseOrder)]
#[sea_orm(table_name = "purchase_orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub number: String,
    pub supplier_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::supplier_return::Entity")]
    SupplierReturns,
}

impl Related<super::supplier_return::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SupplierReturns.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
