use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::inventory_movement::{self, MovementKind, MovementOrigin};
use crate::errors::ServiceError;
use crate::queries::Query;
use crate::services::catalog;

/// Filterable, paginated ledger listing, newest movements first.
/// Date bounds are inclusive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListMovementsQuery {
    pub component_id: Option<Uuid>,
    pub kind: Option<MovementKind>,
    pub origin: Option<MovementOrigin>,
    pub location_id: Option<Uuid>,
    pub occurred_from: Option<DateTime<Utc>>,
    pub occurred_to: Option<DateTime<Utc>>,
    pub service_order_id: Option<Uuid>,
    pub purchase_order_id: Option<Uuid>,
    pub remission_id: Option<Uuid>,
    /// 1-based page number.
    pub page: u64,
    pub limit: u64,
}

#[async_trait]
impl Query for ListMovementsQuery {
    type Result = (Vec<inventory_movement::Model>, u64);

    async fn execute(&self, db_pool: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        let mut query = inventory_movement::Entity::find();
        if let Some(component_id) = self.component_id {
            query = query.filter(inventory_movement::Column::ComponentId.eq(component_id));
        }
        if let Some(kind) = self.kind {
            query = query.filter(inventory_movement::Column::Kind.eq(kind));
        }
        if let Some(origin) = self.origin {
            query = query.filter(inventory_movement::Column::Origin.eq(origin));
        }
        if let Some(location_id) = self.location_id {
            query = query.filter(inventory_movement::Column::LocationId.eq(location_id));
        }
        if let Some(occurred_from) = self.occurred_from {
            query = query.filter(inventory_movement::Column::OccurredAt.gte(occurred_from));
        }
        if let Some(occurred_to) = self.occurred_to {
            query = query.filter(inventory_movement::Column::OccurredAt.lte(occurred_to));
        }
        if let Some(service_order_id) = self.service_order_id {
            query = query.filter(inventory_movement::Column::ServiceOrderId.eq(service_order_id));
        }
        if let Some(purchase_order_id) = self.purchase_order_id {
            query = query.filter(inventory_movement::Column::PurchaseOrderId.eq(purchase_order_id));
        }
        if let Some(remission_id) = self.remission_id {
            query = query.filter(inventory_movement::Column::RemissionId.eq(remission_id));
        }

        let paginator = query
            .order_by_desc(inventory_movement::Column::OccurredAt)
            .order_by_desc(inventory_movement::Column::Id)
            .paginate(db_pool, self.limit.max(1));

        let total = paginator
            .num_items()
            .await
            .map_err(ServiceError::db_error)?;
        let items = paginator
            .fetch_page(self.page.max(1) - 1)
            .await
            .map_err(ServiceError::db_error)?;
        Ok((items, total))
    }
}

/// One kardex line: the movement, its signed contribution and the running
/// balance of the filtered set up to and including it.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct KardexRow {
    pub movement: inventory_movement::Model,
    pub signed_quantity: Decimal,
    pub balance: Decimal,
}

/// Chronological audit view of one component's ledger. Unfiltered, the last
/// row's balance equals the stock projector's figure; with date or kind
/// filters the balance is the cumulative sum of the rows shown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KardexQuery {
    pub component_id: Uuid,
    pub occurred_from: Option<DateTime<Utc>>,
    pub occurred_to: Option<DateTime<Utc>>,
    pub kind: Option<MovementKind>,
}

#[async_trait]
impl Query for KardexQuery {
    type Result = Vec<KardexRow>;

    async fn execute(&self, db_pool: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        if !catalog::component_exists(db_pool, self.component_id).await? {
            return Err(ServiceError::NotFound(format!(
                "Component {} not found",
                self.component_id
            )));
        }

        let mut query = inventory_movement::Entity::find()
            .filter(inventory_movement::Column::ComponentId.eq(self.component_id));
        if let Some(occurred_from) = self.occurred_from {
            query = query.filter(inventory_movement::Column::OccurredAt.gte(occurred_from));
        }
        if let Some(occurred_to) = self.occurred_to {
            query = query.filter(inventory_movement::Column::OccurredAt.lte(occurred_to));
        }
        if let Some(kind) = self.kind {
            query = query.filter(inventory_movement::Column::Kind.eq(kind));
        }

        let movements = query
            .order_by_asc(inventory_movement::Column::OccurredAt)
            .order_by_asc(inventory_movement::Column::Id)
            .all(db_pool)
            .await
            .map_err(ServiceError::db_error)?;
        Ok(with_running_balance(movements))
    }
}

fn with_running_balance(movements: Vec<inventory_movement::Model>) -> Vec<KardexRow> {
    let mut balance = Decimal::ZERO;
    movements
        .into_iter()
        .map(|movement| {
            let signed_quantity = movement.signed_quantity();
            balance += signed_quantity;
            KardexRow {
                movement,
                signed_quantity,
                balance,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn movement(id: i64, kind: MovementKind, quantity: Decimal) -> inventory_movement::Model {
        inventory_movement::Model {
            id,
            kind,
            origin: MovementOrigin::Purchase,
            component_id: Uuid::new_v4(),
            quantity,
            unit_cost: None,
            location_id: None,
            lot_id: None,
            service_order_id: None,
            purchase_order_id: None,
            remission_id: None,
            transfer_id: None,
            justification: None,
            performed_by: "tester".to_string(),
            occurred_at: Utc::now(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn running_balance_accumulates_signed_quantities() {
        let rows = with_running_balance(vec![
            movement(1, MovementKind::Entry, dec!(10)),
            movement(2, MovementKind::Exit, dec!(4)),
            movement(3, MovementKind::AdjustmentIncrease, dec!(1.5)),
        ]);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].balance, dec!(10));
        assert_eq!(rows[1].signed_quantity, dec!(-4));
        assert_eq!(rows[1].balance, dec!(6));
        assert_eq!(rows[2].balance, dec!(7.5));
    }

    #[test]
    fn running_balance_of_empty_ledger_is_empty() {
        assert!(with_running_balance(Vec::new()).is_empty());
    }
}
