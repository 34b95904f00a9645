use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "PartsLedger API",
        version = "0.1.0",
        description = r#"
# Inventory Movement Ledger API

An append-only ledger of component stock movements for a maintenance-management
backend. Stock on hand is never stored as an editable number; it is derived by
folding the movement history.

## Features

- **Movement Ledger**: Append entries, exits, and adjustments; history is immutable
- **Derived Stock**: Current stock per component, globally or per location
- **Kardex**: Chronological movement report with a running balance
- **Warehouse Transfers**: Atomic two-leg moves between locations
- **Remissions**: Delivery notes that issue parts to technicians, with cancellation restock
- **Supplier Returns**: Request/approve/credit flow for defective purchased lots

## Error Handling

The API uses consistent error response formats with appropriate HTTP status codes:

```json
{
  "error": "Unprocessable Entity",
  "message": "Insufficient stock for component ...: available 4, requested 10",
  "timestamp": "2026-01-01T00:00:00Z"
}
```

## Pagination

List endpoints support pagination with the following query parameters:
- `page`: Page number (default: 1)
- `limit`: Items per page (default: 20, max: 100)
        "#,
        contact(
            name = "PartsLedger Maintainers",
            email = "support@partsledger.dev"
        ),
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "movements", description = "Append-only movement ledger"),
        (name = "stock", description = "Derived stock and kardex reports"),
        (name = "transfers", description = "Warehouse transfer endpoints"),
        (name = "remissions", description = "Remission (delivery note) endpoints"),
        (name = "supplier-returns", description = "Supplier return endpoints")
    ),
    paths(
        // Movements
        crate::handlers::movements::create_movement,
        crate::handlers::movements::list_movements,
        crate::handlers::movements::get_movement,

        // Stock
        crate::handlers::stock::get_stock,
        crate::handlers::stock::get_stock_by_location,
        crate::handlers::stock::get_kardex,

        // Transfers
        crate::handlers::transfers::create_transfer,

        // Remissions
        crate::handlers::remissions::create_remission,
        crate::handlers::remissions::get_remission,
        crate::handlers::remissions::close_remission,
        crate::handlers::remissions::cancel_remission,

        // Supplier returns
        crate::handlers::supplier_returns::request_return,
        crate::handlers::supplier_returns::get_return,
        crate::handlers::supplier_returns::process_return,

        // Health intentionally omitted from OpenAPI paths
    ),
    components(
        schemas(
            // Common types
            crate::PaginatedResponse<serde_json::Value>,

            // Ledger types
            crate::entities::inventory_movement::Model,
            crate::entities::inventory_movement::MovementKind,
            crate::entities::inventory_movement::MovementOrigin,
            crate::services::movements::NewMovement,
            crate::queries::movement_queries::KardexRow,

            // Stock types
            crate::handlers::stock::StockResponse,
            crate::services::stock::LocationStock,

            // Transfer types
            crate::services::transfers::CreateTransfer,
            crate::services::transfers::TransferResult,

            // Remission types
            crate::entities::remission::Model,
            crate::entities::remission::DestinationType,
            crate::entities::remission::RemissionStatus,
            crate::entities::remission_line::Model,
            crate::services::remissions::CreateRemission,
            crate::services::remissions::RemissionLineInput,
            crate::services::remissions::RemissionWithLines,
            crate::handlers::remissions::CloseRemissionRequest,
            crate::handlers::remissions::CancelRemissionRequest,

            // Supplier return types
            crate::entities::supplier_return::Model,
            crate::entities::supplier_return::ReturnMotive,
            crate::entities::supplier_return::ReturnStatus,
            crate::services::supplier_returns::RequestSupplierReturn,
            crate::services::supplier_returns::ProcessSupplierReturn,

            // Error types
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDocV1;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDocV1::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}
