use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::entities::inventory_movement::{MovementKind, MovementOrigin};
use crate::errors::ServiceError;
use crate::queries::movement_queries::ListMovementsQuery;
use crate::queries::Query as LedgerQuery;
use crate::services::movements::NewMovement;
use crate::{AppState, PaginatedResponse};

#[derive(Debug, Deserialize, IntoParams)]
pub struct MovementFilters {
    pub component_id: Option<Uuid>,
    pub kind: Option<MovementKind>,
    pub origin: Option<MovementOrigin>,
    pub location_id: Option<Uuid>,
    pub occurred_from: Option<DateTime<Utc>>,
    pub occurred_to: Option<DateTime<Utc>>,
    pub service_order_id: Option<Uuid>,
    pub purchase_order_id: Option<Uuid>,
    pub remission_id: Option<Uuid>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

/// Create the movements router
pub fn movement_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_movements).post(create_movement))
        .route("/:id", get(get_movement))
}

/// Append one movement to the ledger
#[utoipa::path(
    post,
    path = "/api/v1/movements",
    request_body = NewMovement,
    responses(
        (status = 201, description = "Movement appended", body = crate::entities::inventory_movement::Model),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Component, location or lot not found", body = crate::errors::ErrorResponse),
        (status = 422, description = "Insufficient stock", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "movements"
)]
pub async fn create_movement(
    State(state): State<AppState>,
    Json(payload): Json<NewMovement>,
) -> Result<impl IntoResponse, ServiceError> {
    let movement = state
        .services
        .movements
        .register_movement(payload)
        .await?;
    Ok((StatusCode::CREATED, Json(movement)))
}

/// List ledger movements with filters and pagination, newest first
#[utoipa::path(
    get,
    path = "/api/v1/movements",
    params(MovementFilters),
    responses(
        (status = 200, description = "Movement page returned"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "movements"
)]
pub async fn list_movements(
    State(state): State<AppState>,
    Query(filters): Query<MovementFilters>,
) -> Result<impl IntoResponse, ServiceError> {
    let page = filters.page.unwrap_or(1).max(1);
    let limit = filters
        .limit
        .unwrap_or(u64::from(state.config.api_default_page_size))
        .clamp(1, u64::from(state.config.api_max_page_size));

    let query = ListMovementsQuery {
        component_id: filters.component_id,
        kind: filters.kind,
        origin: filters.origin,
        location_id: filters.location_id,
        occurred_from: filters.occurred_from,
        occurred_to: filters.occurred_to,
        service_order_id: filters.service_order_id,
        purchase_order_id: filters.purchase_order_id,
        remission_id: filters.remission_id,
        page,
        limit,
    };
    let (items, total) = query.execute(&state.db).await?;
    let total_pages = total.div_ceil(limit);

    Ok(Json(PaginatedResponse {
        items,
        total,
        page,
        limit,
        total_pages,
    }))
}

/// Get one movement by ledger id
#[utoipa::path(
    get,
    path = "/api/v1/movements/{id}",
    params(("id" = i64, Path, description = "Ledger id of the movement")),
    responses(
        (status = 200, description = "Movement returned", body = crate::entities::inventory_movement::Model),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "movements"
)]
pub async fn get_movement(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    let movement = state.services.movements.get_movement(id).await?;
    Ok(Json(movement))
}
