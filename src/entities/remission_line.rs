use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// One component line of a remission. Immutable once written; cancellation
/// compensates through the ledger instead of editing lines.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[schema(as = RemissionLine)]
#[sea_orm(table_name = "remission_lines")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub remission_id: Uuid,
    pub component_id: Uuid,
    pub quantity: Decimal,
    /// Location the line's EXIT drew from; cancellation restocks here.
    pub location_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::remission::Entity",
        from = "Column::RemissionId",
        to = "super::remission::Column::Id"
    )]
    Remission,
    #[sea_orm(
        belongs_to = "super::component::Entity",
        from = "Column::ComponentId",
        to = "super::component::Column::Id"
    )]
    Component,
}

impl Related<super::remission::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Remission.def()
    }
}

impl Related<super::component::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Component.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
