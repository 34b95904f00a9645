use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::services::supplier_returns::{ProcessSupplierReturn, RequestSupplierReturn};
use crate::AppState;

/// Create the supplier returns router
pub fn supplier_return_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(request_return))
        .route("/:id", get(get_return))
        .route("/:id/process", post(process_return))
}

/// Request a return to the supplier; stock is untouched until approval
#[utoipa::path(
    post,
    path = "/api/v1/supplier-returns",
    request_body = RequestSupplierReturn,
    responses(
        (status = 201, description = "Return requested", body = crate::entities::supplier_return::Model),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Purchase order or lot not found", body = crate::errors::ErrorResponse),
        (status = 422, description = "Lot does not hold the requested quantity", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "supplier-returns"
)]
pub async fn request_return(
    State(state): State<AppState>,
    Json(payload): Json<RequestSupplierReturn>,
) -> Result<impl IntoResponse, ServiceError> {
    let record = state
        .services
        .supplier_returns
        .request_return(payload)
        .await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Get a supplier return by id
#[utoipa::path(
    get,
    path = "/api/v1/supplier-returns/{id}",
    params(("id" = Uuid, Path, description = "Supplier return id")),
    responses(
        (status = 200, description = "Supplier return returned", body = crate::entities::supplier_return::Model),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "supplier-returns"
)]
pub async fn get_return(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let record = state.services.supplier_returns.get_return(id).await?;
    Ok(Json(record))
}

/// Apply the processing decision: APPROVED ships parts back, CREDITED is
/// paperwork only
#[utoipa::path(
    post,
    path = "/api/v1/supplier-returns/{id}/process",
    params(("id" = Uuid, Path, description = "Supplier return id")),
    request_body = ProcessSupplierReturn,
    responses(
        (status = 200, description = "Return processed", body = crate::entities::supplier_return::Model),
        (status = 400, description = "Invalid decision", body = crate::errors::ErrorResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Return was already processed", body = crate::errors::ErrorResponse),
        (status = 422, description = "Lot no longer holds the quantity", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "supplier-returns"
)]
pub async fn process_return(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ProcessSupplierReturn>,
) -> Result<impl IntoResponse, ServiceError> {
    let record = state
        .services
        .supplier_returns
        .process_return(id, payload)
        .await?;
    Ok(Json(record))
}
