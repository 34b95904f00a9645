//! Stock projection. Every figure this module reports is a fold over the
//! movement ledger in `(occurred_at, id)` order; the `stock_balances`
//! accumulator is never read here.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use serde::Serialize;
use tracing::{instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::DbPool;
use crate::entities::{inventory_movement, location};
use crate::errors::ServiceError;
use crate::services::{catalog, ledger};

/// Folds the ledger for one component, optionally scoped to a location
/// bucket. Works on the pool and inside open transactions; the outbound
/// guard runs it while holding the balance-row lock.
pub async fn fold_stock<C: ConnectionTrait>(
    conn: &C,
    component_id: Uuid,
    location_id: Option<Uuid>,
) -> Result<Decimal, ServiceError> {
    let timer = crate::metrics::STOCK_FOLD_DURATION.start_timer();

    let mut query = inventory_movement::Entity::find()
        .filter(inventory_movement::Column::ComponentId.eq(component_id));
    if let Some(location) = location_id {
        query = query.filter(inventory_movement::Column::LocationId.eq(location));
    }
    let movements = query
        .order_by_asc(inventory_movement::Column::OccurredAt)
        .order_by_asc(inventory_movement::Column::Id)
        .all(conn)
        .await
        .map_err(ServiceError::from_db_err)?;

    let on_hand = movements
        .iter()
        .fold(Decimal::ZERO, |acc, movement| acc + movement.signed_quantity());
    timer.observe_duration();
    Ok(on_hand)
}

/// On-hand figure for one location bucket; `location_id: None` aggregates
/// the movements recorded without a location.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LocationStock {
    pub location_id: Option<Uuid>,
    pub location_name: Option<String>,
    pub on_hand: Decimal,
}

#[derive(Clone)]
pub struct StockService {
    db_pool: Arc<DbPool>,
}

impl StockService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Current stock for a component, optionally scoped to one location.
    /// A negative fold means some writer bypassed the guarded path; it is
    /// reported as-is so the drift stays visible.
    #[instrument(skip(self))]
    pub async fn current_stock(
        &self,
        component_id: Uuid,
        location_id: Option<Uuid>,
    ) -> Result<Decimal, ServiceError> {
        let db = &*self.db_pool;
        if !catalog::component_exists(db, component_id).await? {
            return Err(ServiceError::NotFound(format!(
                "Component {} not found",
                component_id
            )));
        }
        let on_hand = fold_stock(db, component_id, location_id).await?;
        if on_hand < Decimal::ZERO {
            warn!(
                component_id = %component_id,
                location_id = ?location_id,
                on_hand = %on_hand,
                "Negative stock fold: a write bypassed the guarded ledger path"
            );
        }
        Ok(on_hand)
    }

    /// The component's fold grouped by location bucket. Named buckets come
    /// first sorted by location name; the no-location bucket closes the list.
    #[instrument(skip(self))]
    pub async fn stock_by_location(
        &self,
        component_id: Uuid,
    ) -> Result<Vec<LocationStock>, ServiceError> {
        let db = &*self.db_pool;
        if !catalog::component_exists(db, component_id).await? {
            return Err(ServiceError::NotFound(format!(
                "Component {} not found",
                component_id
            )));
        }

        let movements = inventory_movement::Entity::find()
            .filter(inventory_movement::Column::ComponentId.eq(component_id))
            .order_by_asc(inventory_movement::Column::OccurredAt)
            .order_by_asc(inventory_movement::Column::Id)
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        let mut buckets: BTreeMap<Option<Uuid>, Decimal> = BTreeMap::new();
        for movement in &movements {
            *buckets.entry(movement.location_id).or_insert(Decimal::ZERO) +=
                movement.signed_quantity();
        }

        let location_ids: Vec<Uuid> = buckets.keys().filter_map(|bucket| *bucket).collect();
        let names: HashMap<Uuid, String> = if location_ids.is_empty() {
            HashMap::new()
        } else {
            location::Entity::find()
                .filter(location::Column::Id.is_in(location_ids))
                .all(db)
                .await
                .map_err(ServiceError::db_error)?
                .into_iter()
                .map(|row| (row.id, row.name))
                .collect()
        };

        let mut rows: Vec<LocationStock> = buckets
            .into_iter()
            .map(|(location_id, on_hand)| {
                if on_hand < Decimal::ZERO {
                    warn!(
                        component_id = %component_id,
                        location_id = ?location_id,
                        on_hand = %on_hand,
                        "Negative stock fold: a write bypassed the guarded ledger path"
                    );
                }
                LocationStock {
                    location_id,
                    location_name: location_id.and_then(|id| names.get(&id).cloned()),
                    on_hand,
                }
            })
            .collect();
        rows.sort_by(|a, b| match (&a.location_name, &b.location_name) {
            (Some(left), Some(right)) => left.cmp(right),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
        Ok(rows)
    }

    /// Replays the ledger into the component's accumulator row and returns
    /// the rebuilt figure.
    #[instrument(skip(self))]
    pub async fn rebuild_balance(&self, component_id: Uuid) -> Result<Decimal, ServiceError> {
        let db = &*self.db_pool;
        if !catalog::component_exists(db, component_id).await? {
            return Err(ServiceError::NotFound(format!(
                "Component {} not found",
                component_id
            )));
        }
        let on_hand = db
            .transaction::<_, Decimal, ServiceError>(|txn| {
                Box::pin(async move { ledger::rebuild_balance(txn, component_id).await })
            })
            .await
            .map_err(ServiceError::from)?;
        Ok(on_hand)
    }
}
