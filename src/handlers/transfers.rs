use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Router,
};

use crate::errors::ServiceError;
use crate::services::transfers::CreateTransfer;
use crate::AppState;

/// Create the transfers router
pub fn transfer_routes() -> Router<AppState> {
    Router::new().route("/", post(create_transfer))
}

/// Move stock between two locations as one atomic exit/entry pair
#[utoipa::path(
    post,
    path = "/api/v1/transfers",
    request_body = CreateTransfer,
    responses(
        (status = 201, description = "Transfer committed", body = crate::services::transfers::TransferResult),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Component or location not found", body = crate::errors::ErrorResponse),
        (status = 422, description = "Insufficient stock at origin", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "transfers"
)]
pub async fn create_transfer(
    State(state): State<AppState>,
    Json(payload): Json<CreateTransfer>,
) -> Result<impl IntoResponse, ServiceError> {
    let result = state.services.transfers.create_transfer(payload).await?;
    Ok((StatusCode::CREATED, Json(result)))
}
