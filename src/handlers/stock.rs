use axum::{
    extract::{Json, Path, Query, State},
    response::IntoResponse,
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::entities::inventory_movement::MovementKind;
use crate::errors::ServiceError;
use crate::queries::movement_queries::KardexQuery;
use crate::queries::Query as LedgerQuery;
use crate::AppState;

#[derive(Debug, Deserialize, IntoParams)]
pub struct StockParams {
    pub location_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct KardexParams {
    pub occurred_from: Option<DateTime<Utc>>,
    pub occurred_to: Option<DateTime<Utc>>,
    pub kind: Option<MovementKind>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StockResponse {
    pub component_id: Uuid,
    pub location_id: Option<Uuid>,
    pub on_hand: Decimal,
}

/// Create the component stock router
pub fn stock_routes() -> Router<AppState> {
    Router::new()
        .route("/:id/stock", get(get_stock))
        .route("/:id/stock-by-location", get(get_stock_by_location))
        .route("/:id/kardex", get(get_kardex))
}

/// Current stock for a component, optionally scoped to one location
#[utoipa::path(
    get,
    path = "/api/v1/components/{id}/stock",
    params(
        ("id" = Uuid, Path, description = "Component id"),
        StockParams
    ),
    responses(
        (status = 200, description = "Stock figure returned", body = StockResponse),
        (status = 404, description = "Component not found", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "stock"
)]
pub async fn get_stock(
    State(state): State<AppState>,
    Path(component_id): Path<Uuid>,
    Query(params): Query<StockParams>,
) -> Result<impl IntoResponse, ServiceError> {
    let on_hand = state
        .services
        .stock
        .current_stock(component_id, params.location_id)
        .await?;
    Ok(Json(StockResponse {
        component_id,
        location_id: params.location_id,
        on_hand,
    }))
}

/// Stock for a component grouped by location bucket
#[utoipa::path(
    get,
    path = "/api/v1/components/{id}/stock-by-location",
    params(("id" = Uuid, Path, description = "Component id")),
    responses(
        (status = 200, description = "Per-location stock returned", body = [crate::services::stock::LocationStock]),
        (status = 404, description = "Component not found", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "stock"
)]
pub async fn get_stock_by_location(
    State(state): State<AppState>,
    Path(component_id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let rows = state.services.stock.stock_by_location(component_id).await?;
    Ok(Json(rows))
}

/// Chronological kardex for a component with running balance
#[utoipa::path(
    get,
    path = "/api/v1/components/{id}/kardex",
    params(
        ("id" = Uuid, Path, description = "Component id"),
        KardexParams
    ),
    responses(
        (status = 200, description = "Kardex rows returned", body = [crate::queries::movement_queries::KardexRow]),
        (status = 404, description = "Component not found", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "stock"
)]
pub async fn get_kardex(
    State(state): State<AppState>,
    Path(component_id): Path<Uuid>,
    Query(params): Query<KardexParams>,
) -> Result<impl IntoResponse, ServiceError> {
    let query = KardexQuery {
        component_id,
        occurred_from: params.occurred_from,
        occurred_to: params.occurred_to,
        kind: params.kind,
    };
    let rows = query.execute(&state.db).await?;
    Ok(Json(rows))
}
