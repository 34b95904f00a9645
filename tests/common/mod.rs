//! Shared test harness.
//!
//! Boots the full application against a temporary SQLite file: real
//! migrations, real services, real routes. Requests go through the router
//! via `tower::ServiceExt::oneshot`, so every test exercises the same
//! extractor and error-mapping path production traffic takes.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, Response},
    routing::get,
    Router,
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, Set};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

use partsledger_api::{
    config::AppConfig,
    db,
    entities::{component, location, lot, purchase_order},
    events::{self, EventSender},
    handlers::{self, AppServices},
    AppState,
};

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    _event_task: tokio::task::JoinHandle<()>,
    _db_dir: TempDir,
}

impl TestApp {
    /// Spins up a fresh application on its own database file.
    pub async fn new() -> Self {
        let db_dir = TempDir::new().expect("create temp dir for test database");
        let db_path = db_dir.path().join("ledger.db");
        let mut cfg = AppConfig::new(
            format!("sqlite://{}?mode=rwc", db_path.display()),
            "127.0.0.1".to_string(),
            0,
            "test".to_string(),
        );
        cfg.auto_migrate = true;
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let db = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("connect to test database");
        db::run_migrations(&db).await.expect("run migrations");
        let db = Arc::new(db);

        let (event_tx, event_rx) = tokio::sync::mpsc::channel(cfg.event_channel_capacity);
        let event_sender = EventSender::new(event_tx);
        let event_task = tokio::spawn(events::process_events(event_rx));

        let services = AppServices::new(db.clone(), event_sender.clone(), cfg.operation_timeout());
        let state = AppState {
            db,
            config: cfg,
            event_sender,
            services,
        };

        let router = Router::new()
            .route("/metrics", get(handlers::health::metrics_handler))
            .nest("/health", handlers::health::health_routes())
            .nest("/api/v1", partsledger_api::api_v1_routes())
            .with_state(state.clone());

        Self {
            router,
            state,
            _event_task: event_task,
            _db_dir: db_dir,
        }
    }

    /// Sends a request through the router; JSON body optional.
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Response<Body> {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .expect("build request"),
            None => builder.body(Body::empty()).expect("build request"),
        };
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router handled request")
    }

    /// Inserts a component directly; the catalog has no API surface here.
    #[allow(dead_code)]
    pub async fn seed_component(&self, code: &str) -> component::Model {
        let now = Utc::now();
        component::ActiveModel {
            id: Set(Uuid::new_v4()),
            code: Set(code.to_string()),
            description: Set(format!("Test part {}", code)),
            unit_of_measure: Set("unit".to_string()),
            active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(self.state.db.as_ref())
        .await
        .expect("seed component")
    }

    #[allow(dead_code)]
    pub async fn seed_location(&self, code: &str) -> location::Model {
        let now = Utc::now();
        location::ActiveModel {
            id: Set(Uuid::new_v4()),
            code: Set(code.to_string()),
            name: Set(format!("Test location {}", code)),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(self.state.db.as_ref())
        .await
        .expect("seed location")
    }

    #[allow(dead_code)]
    pub async fn seed_lot(
        &self,
        component_id: Uuid,
        lot_number: &str,
        quantity: Decimal,
    ) -> lot::Model {
        let now = Utc::now();
        lot::ActiveModel {
            id: Set(Uuid::new_v4()),
            component_id: Set(component_id),
            lot_number: Set(lot_number.to_string()),
            current_quantity: Set(quantity),
            expiry_date: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(self.state.db.as_ref())
        .await
        .expect("seed lot")
    }

    #[allow(dead_code)]
    pub async fn seed_purchase_order(&self, number: &str) -> purchase_order::Model {
        let now = Utc::now();
        purchase_order::ActiveModel {
            id: Set(Uuid::new_v4()),
            number: Set(number.to_string()),
            supplier_name: Set("Test Supplier SA".to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(self.state.db.as_ref())
        .await
        .expect("seed purchase order")
    }

    /// Posts a PURCHASE entry so a test starts with stock on hand.
    #[allow(dead_code)]
    pub async fn receive_stock(
        &self,
        component_id: Uuid,
        location_id: Option<Uuid>,
        quantity: Decimal,
    ) -> Value {
        let response = self
            .request(
                Method::POST,
                "/api/v1/movements",
                Some(serde_json::json!({
                    "kind": "ENTRY",
                    "origin": "PURCHASE",
                    "component_id": component_id,
                    "quantity": quantity,
                    "location_id": location_id,
                    "performed_by": "test-seeder",
                })),
            )
            .await;
        assert_eq!(
            response.status(),
            axum::http::StatusCode::CREATED,
            "seeding stock should succeed"
        );
        response_json(response).await
    }

    /// Current stock via the API, parsed back into a `Decimal`.
    #[allow(dead_code)]
    pub async fn stock_of(&self, component_id: Uuid, location_id: Option<Uuid>) -> Decimal {
        let uri = match location_id {
            Some(loc) => format!("/api/v1/components/{}/stock?location_id={}", component_id, loc),
            None => format!("/api/v1/components/{}/stock", component_id),
        };
        let response = self.request(Method::GET, &uri, None).await;
        assert_eq!(response.status(), axum::http::StatusCode::OK);
        let body = response_json(response).await;
        decimal_field(&body, "on_hand")
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self._event_task.abort();
    }
}

/// Reads a response body as JSON.
pub async fn response_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read response body");
    serde_json::from_slice(&bytes).expect("response body is JSON")
}

/// Decimals travel as JSON strings; parse one out of a response value.
#[allow(dead_code)]
pub fn decimal_field(value: &Value, field: &str) -> Decimal {
    value[field]
        .as_str()
        .unwrap_or_else(|| panic!("field {} should be a decimal string", field))
        .parse()
        .unwrap_or_else(|_| panic!("field {} should parse as a decimal", field))
}
