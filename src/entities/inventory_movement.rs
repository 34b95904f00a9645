use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, Set};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Kind of a ledger movement. The sign of every kind is fixed here; stock
/// projection is a pure lookup and never inspects anything else.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    ToSchema,
    strum::Display,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementKind {
    #[sea_orm(string_value = "ENTRY")]
    Entry,
    #[sea_orm(string_value = "EXIT")]
    Exit,
    #[sea_orm(string_value = "ADJUSTMENT_INCREASE")]
    AdjustmentIncrease,
    #[sea_orm(string_value = "ADJUSTMENT_DECREASE")]
    AdjustmentDecrease,
    #[sea_orm(string_value = "TRANSFER_OUT")]
    TransferOut,
    #[sea_orm(string_value = "TRANSFER_IN")]
    TransferIn,
}

impl MovementKind {
    /// +1 for kinds that add stock, -1 for kinds that remove it.
    pub fn sign(&self) -> i32 {
        match self {
            MovementKind::Entry | MovementKind::AdjustmentIncrease | MovementKind::TransferIn => 1,
            MovementKind::Exit | MovementKind::AdjustmentDecrease | MovementKind::TransferOut => -1,
        }
    }

    /// Kinds that remove stock and therefore must pass the atomic stock check.
    pub fn is_outbound(&self) -> bool {
        self.sign() < 0
    }

    pub fn is_adjustment(&self) -> bool {
        matches!(
            self,
            MovementKind::AdjustmentIncrease | MovementKind::AdjustmentDecrease
        )
    }

    /// Transfer legs are only written by the transfer operation, never by the
    /// single-movement registrar.
    pub fn is_transfer_leg(&self) -> bool {
        matches!(self, MovementKind::TransferOut | MovementKind::TransferIn)
    }
}

/// Business reason a movement was recorded.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    ToSchema,
    strum::Display,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementOrigin {
    #[sea_orm(string_value = "PURCHASE")]
    Purchase,
    #[sea_orm(string_value = "SERVICE_ORDER_CONSUMPTION")]
    ServiceOrderConsumption,
    #[sea_orm(string_value = "REMISSION")]
    Remission,
    #[sea_orm(string_value = "RETURN")]
    Return,
    #[sea_orm(string_value = "PHYSICAL_COUNT")]
    PhysicalCount,
    #[sea_orm(string_value = "SHRINKAGE")]
    Shrinkage,
    #[sea_orm(string_value = "ERROR_CORRECTION")]
    ErrorCorrection,
    #[sea_orm(string_value = "TRANSFER")]
    Transfer,
}

/// One row of the append-only movement ledger. Rows are only ever inserted;
/// corrections are new compensating rows.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[schema(as = Movement)]
#[sea_orm(table_name = "inventory_movements")]
pub struct Model {
    /// Monotonic surrogate key, used as the fold tiebreak for movements that
    /// share an `occurred_at`.
    #[sea_orm(primary_key)]
    pub id: i64,

    pub kind: MovementKind,

    pub origin: MovementOrigin,

    pub component_id: Uuid,

    /// Always positive; direction comes from `kind`.
    pub quantity: Decimal,

    pub unit_cost: Option<Decimal>,

    pub location_id: Option<Uuid>,

    pub lot_id: Option<Uuid>,

    /// Correlation to the service order that consumed the parts.
    pub service_order_id: Option<Uuid>,

    /// Correlation to the purchase order that brought the parts in.
    pub purchase_order_id: Option<Uuid>,

    /// Correlation to the remission this movement belongs to.
    pub remission_id: Option<Uuid>,

    /// Shared by the two legs of a transfer.
    pub transfer_id: Option<Uuid>,

    /// Mandatory free-text reason for adjustment kinds.
    pub justification: Option<String>,

    /// Recorded actor. Identity is not verified here.
    pub performed_by: String,

    /// Business timestamp; may be backdated relative to `created_at`.
    pub occurred_at: DateTime<Utc>,

    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::component::Entity",
        from = "Column::ComponentId",
        to = "super::component::Column::Id"
    )]
    Component,
    #[sea_orm(
        belongs_to = "super::location::Entity",
        from = "Column::LocationId",
        to = "super::location::Column::Id"
    )]
    Location,
    #[sea_orm(
        belongs_to = "super::lot::Entity",
        from = "Column::LotId",
        to = "super::lot::Column::Id"
    )]
    Lot,
}

impl Related<super::component::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Component.def()
    }
}

impl Related<super::location::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Location.def()
    }
}

impl Related<super::lot::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lot.def()
    }
}

#[async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(self, _db: &C, _insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut active_model = self;
        if let ActiveValue::NotSet = active_model.occurred_at {
            active_model.occurred_at = Set(Utc::now());
        }
        if let ActiveValue::NotSet = active_model.created_at {
            active_model.created_at = Set(Utc::now());
        }
        Ok(active_model)
    }
}

impl Model {
    /// Quantity with the kind's sign applied.
    pub fn signed_quantity(&self) -> Decimal {
        Decimal::from(self.kind.sign()) * self.quantity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn sign_table_is_fixed() {
        assert_eq!(MovementKind::Entry.sign(), 1);
        assert_eq!(MovementKind::AdjustmentIncrease.sign(), 1);
        assert_eq!(MovementKind::TransferIn.sign(), 1);
        assert_eq!(MovementKind::Exit.sign(), -1);
        assert_eq!(MovementKind::AdjustmentDecrease.sign(), -1);
        assert_eq!(MovementKind::TransferOut.sign(), -1);
    }

    #[test]
    fn outbound_kinds_match_negative_sign() {
        for kind in [
            MovementKind::Entry,
            MovementKind::Exit,
            MovementKind::AdjustmentIncrease,
            MovementKind::AdjustmentDecrease,
            MovementKind::TransferOut,
            MovementKind::TransferIn,
        ] {
            assert_eq!(kind.is_outbound(), kind.sign() == -1);
        }
    }

    #[test]
    fn signed_quantity_applies_kind_sign() {
        let base = Model {
            id: 1,
            kind: MovementKind::Exit,
            origin: MovementOrigin::ServiceOrderConsumption,
            component_id: Uuid::new_v4(),
            quantity: dec!(2.5),
            unit_cost: None,
            location_id: None,
            lot_id: None,
            service_order_id: None,
            purchase_order_id: None,
            remission_id: None,
            transfer_id: None,
            justification: None,
            performed_by: "tech".into(),
            occurred_at: Utc::now(),
            created_at: Utc::now(),
        };
        assert_eq!(base.signed_quantity(), dec!(-2.5));

        let entry = Model {
            kind: MovementKind::Entry,
            ..base
        };
        assert_eq!(entry.signed_quantity(), dec!(2.5));
    }

    #[test]
    fn wire_names_use_screaming_snake_case() {
        let json = serde_json::to_string(&MovementKind::AdjustmentIncrease).unwrap();
        assert_eq!(json, "\"ADJUSTMENT_INCREASE\"");
        let back: MovementKind = serde_json::from_str("\"TRANSFER_OUT\"").unwrap();
        assert_eq!(back, MovementKind::TransferOut);

        let origin = serde_json::to_string(&MovementOrigin::ServiceOrderConsumption).unwrap();
        assert_eq!(origin, "\"SERVICE_ORDER_CONSUMPTION\"");
    }
}
