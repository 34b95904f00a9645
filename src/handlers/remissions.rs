use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::errors::ServiceError;
use crate::services::remissions::CreateRemission;
use crate::AppState;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CloseRemissionRequest {
    #[validate(length(min = 1, max = 128))]
    pub actor: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CancelRemissionRequest {
    #[validate(length(min = 1, max = 256))]
    pub motive: String,
    #[validate(length(min = 1, max = 128))]
    pub actor: String,
}

/// Create the remissions router
pub fn remission_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_remission))
        .route("/:id", get(get_remission))
        .route("/:id/close", post(close_remission))
        .route("/:id/cancel", post(cancel_remission))
}

/// Open a remission and post its exits in one transaction
#[utoipa::path(
    post,
    path = "/api/v1/remissions",
    request_body = CreateRemission,
    responses(
        (status = 201, description = "Remission created", body = crate::services::remissions::RemissionWithLines),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Component or location not found", body = crate::errors::ErrorResponse),
        (status = 422, description = "Insufficient stock on a line", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "remissions"
)]
pub async fn create_remission(
    State(state): State<AppState>,
    Json(payload): Json<CreateRemission>,
) -> Result<impl IntoResponse, ServiceError> {
    let result = state.services.remissions.create_remission(payload).await?;
    Ok((StatusCode::CREATED, Json(result)))
}

/// Get a remission with its lines
#[utoipa::path(
    get,
    path = "/api/v1/remissions/{id}",
    params(("id" = Uuid, Path, description = "Remission id")),
    responses(
        (status = 200, description = "Remission returned", body = crate::services::remissions::RemissionWithLines),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "remissions"
)]
pub async fn get_remission(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let result = state.services.remissions.get_remission(id).await?;
    Ok(Json(result))
}

/// Close an open remission; the exits posted at creation stand
#[utoipa::path(
    post,
    path = "/api/v1/remissions/{id}/close",
    params(("id" = Uuid, Path, description = "Remission id")),
    request_body = CloseRemissionRequest,
    responses(
        (status = 200, description = "Remission closed", body = crate::entities::remission::Model),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Remission is not open", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "remissions"
)]
pub async fn close_remission(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CloseRemissionRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    payload.validate()?;
    let result = state
        .services
        .remissions
        .close_remission(id, &payload.actor)
        .await?;
    Ok(Json(result))
}

/// Cancel an open remission, restocking every line
#[utoipa::path(
    post,
    path = "/api/v1/remissions/{id}/cancel",
    params(("id" = Uuid, Path, description = "Remission id")),
    request_body = CancelRemissionRequest,
    responses(
        (status = 200, description = "Remission cancelled and stock restored", body = crate::services::remissions::RemissionWithLines),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Remission already closed or cancelled", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "remissions"
)]
pub async fn cancel_remission(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CancelRemissionRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    payload.validate()?;
    let result = state
        .services
        .remissions
        .cancel_remission(id, payload.motive, payload.actor)
        .await?;
    Ok(Json(result))
}
