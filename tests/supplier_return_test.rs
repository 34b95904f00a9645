mod common;

use axum::http::{Method, StatusCode};
use common::{decimal_field, response_json, TestApp};
use rust_decimal_macros::dec;
use sea_orm::EntityTrait;
use serde_json::{json, Value};

use partsledger_api::entities::lot;

async fn lot_quantity(app: &TestApp, lot_id: uuid::Uuid) -> rust_decimal::Decimal {
    lot::Entity::find_by_id(lot_id)
        .one(app.state.db.as_ref())
        .await
        .expect("query lot")
        .expect("lot exists")
        .current_quantity
}

#[tokio::test]
async fn requesting_a_return_leaves_stock_untouched() {
    let app = TestApp::new().await;
    let component = app.seed_component("COMP-R1").await;
    let po = app.seed_purchase_order("PO-2026-001").await;
    let lot = app.seed_lot(component.id, "L-2026-08", dec!(10)).await;
    app.receive_stock(component.id, None, dec!(10)).await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/supplier-returns",
            Some(json!({
                "purchase_order_id": po.id,
                "lot_id": lot.id,
                "motive": "DEFECTIVE",
                "quantity": 4,
                "requested_by": "quality-inspector",
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let record = response_json(response).await;
    assert_eq!(record["status"], "REQUESTED");
    assert_eq!(record["number"], "RET-000001");
    assert_eq!(record["motive"], "DEFECTIVE");

    // requesting is paperwork; the stock effect waits for the decision
    assert_eq!(app.stock_of(component.id, None).await, dec!(10));
    assert_eq!(lot_quantity(&app, lot.id).await, dec!(10));
}

#[tokio::test]
async fn requesting_more_than_the_lot_holds_is_rejected() {
    let app = TestApp::new().await;
    let component = app.seed_component("COMP-R2").await;
    let po = app.seed_purchase_order("PO-2026-002").await;
    let lot = app.seed_lot(component.id, "L-2026-09", dec!(10)).await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/supplier-returns",
            Some(json!({
                "purchase_order_id": po.id,
                "lot_id": lot.id,
                "motive": "EXCESS",
                "quantity": 12,
                "requested_by": "quality-inspector",
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn approving_ships_the_parts_back() {
    let app = TestApp::new().await;
    let component = app.seed_component("COMP-R3").await;
    let po = app.seed_purchase_order("PO-2026-003").await;
    let lot = app.seed_lot(component.id, "L-2026-10", dec!(10)).await;
    app.receive_stock(component.id, None, dec!(10)).await;

    let created = request_return(&app, &po, Some(&lot), dec!(4)).await;
    let id = created["id"].as_str().expect("return id");

    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/supplier-returns/{}/process", id),
            Some(json!({
                "decision": "APPROVED",
                "processed_by": "purchasing-manager",
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let processed = response_json(response).await;
    assert_eq!(processed["status"], "APPROVED");
    assert_eq!(processed["processed_by"], "purchasing-manager");
    assert!(!processed["processed_at"].is_null());

    assert_eq!(app.stock_of(component.id, None).await, dec!(6));
    assert_eq!(lot_quantity(&app, lot.id).await, dec!(6));

    // the ledger carries the exit with its purchase correlation
    let response = app
        .request(
            Method::GET,
            &format!(
                "/api/v1/movements?purchase_order_id={}&origin=RETURN",
                po.id
            ),
            None,
        )
        .await;
    let page = response_json(response).await;
    assert_eq!(page["total"].as_u64(), Some(1));
    let row = &page["items"][0];
    assert_eq!(row["kind"], "EXIT");
    assert_eq!(row["lot_id"], json!(lot.id));
    assert_eq!(decimal_field(row, "quantity"), dec!(4));
}

#[tokio::test]
async fn crediting_is_paperwork_only() {
    let app = TestApp::new().await;
    let component = app.seed_component("COMP-R4").await;
    let po = app.seed_purchase_order("PO-2026-004").await;
    let lot = app.seed_lot(component.id, "L-2026-11", dec!(10)).await;
    app.receive_stock(component.id, None, dec!(10)).await;

    let created = request_return(&app, &po, Some(&lot), dec!(3)).await;
    let id = created["id"].as_str().expect("return id");

    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/supplier-returns/{}/process", id),
            Some(json!({
                "decision": "CREDITED",
                "processed_by": "purchasing-manager",
                "notes": "supplier issued credit note CN-118",
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let processed = response_json(response).await;
    assert_eq!(processed["status"], "CREDITED");
    assert_eq!(processed["notes"], "supplier issued credit note CN-118");

    // credit notes never touch the shelf
    assert_eq!(app.stock_of(component.id, None).await, dec!(10));
    assert_eq!(lot_quantity(&app, lot.id).await, dec!(10));
}

#[tokio::test]
async fn processing_twice_is_a_conflict() {
    let app = TestApp::new().await;
    let component = app.seed_component("COMP-R5").await;
    let po = app.seed_purchase_order("PO-2026-005").await;
    let lot = app.seed_lot(component.id, "L-2026-12", dec!(10)).await;
    app.receive_stock(component.id, None, dec!(10)).await;

    let created = request_return(&app, &po, Some(&lot), dec!(2)).await;
    let id = created["id"].as_str().expect("return id");
    let decision = json!({"decision": "APPROVED", "processed_by": "purchasing-manager"});

    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/supplier-returns/{}/process", id),
            Some(decision.clone()),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/supplier-returns/{}/process", id),
            Some(decision),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // the second approval must not debit again
    assert_eq!(app.stock_of(component.id, None).await, dec!(8));
    assert_eq!(lot_quantity(&app, lot.id).await, dec!(8));
}

#[tokio::test]
async fn requested_is_not_a_valid_decision() {
    let app = TestApp::new().await;
    let component = app.seed_component("COMP-R6").await;
    let po = app.seed_purchase_order("PO-2026-006").await;
    let lot = app.seed_lot(component.id, "L-2026-13", dec!(10)).await;

    let created = request_return(&app, &po, Some(&lot), dec!(1)).await;
    let id = created["id"].as_str().expect("return id");

    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/supplier-returns/{}/process", id),
            Some(json!({
                "decision": "REQUESTED",
                "processed_by": "purchasing-manager",
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn approval_rechecks_the_lot_at_decision_time() {
    let app = TestApp::new().await;
    let component = app.seed_component("COMP-R7").await;
    let po = app.seed_purchase_order("PO-2026-007").await;
    let lot = app.seed_lot(component.id, "L-2026-14", dec!(10)).await;
    app.receive_stock(component.id, None, dec!(10)).await;

    // two pending returns compete for the same lot
    let first = request_return(&app, &po, Some(&lot), dec!(6)).await;
    let second = request_return(&app, &po, Some(&lot), dec!(6)).await;
    let decision = json!({"decision": "APPROVED", "processed_by": "purchasing-manager"});

    let response = app
        .request(
            Method::POST,
            &format!(
                "/api/v1/supplier-returns/{}/process",
                first["id"].as_str().expect("return id")
            ),
            Some(decision.clone()),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(lot_quantity(&app, lot.id).await, dec!(4));

    let response = app
        .request(
            Method::POST,
            &format!(
                "/api/v1/supplier-returns/{}/process",
                second["id"].as_str().expect("return id")
            ),
            Some(decision),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // the losing approval leaves no trace
    assert_eq!(app.stock_of(component.id, None).await, dec!(4));
    assert_eq!(lot_quantity(&app, lot.id).await, dec!(4));

    let response = app
        .request(
            Method::GET,
            &format!(
                "/api/v1/supplier-returns/{}",
                second["id"].as_str().expect("return id")
            ),
            None,
        )
        .await;
    let fetched = response_json(response).await;
    assert_eq!(fetched["status"], "REQUESTED");
}

#[tokio::test]
async fn unknown_purchase_order_is_a_404() {
    let app = TestApp::new().await;
    app.seed_component("COMP-R8").await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/supplier-returns",
            Some(json!({
                "purchase_order_id": uuid::Uuid::new_v4(),
                "motive": "WRONG_ITEM",
                "quantity": 1,
                "requested_by": "quality-inspector",
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

async fn request_return(
    app: &TestApp,
    po: &partsledger_api::entities::purchase_order::Model,
    lot: Option<&lot::Model>,
    quantity: rust_decimal::Decimal,
) -> Value {
    let response = app
        .request(
            Method::POST,
            "/api/v1/supplier-returns",
            Some(json!({
                "purchase_order_id": po.id,
                "lot_id": lot.map(|l| l.id),
                "motive": "DEFECTIVE",
                "quantity": quantity,
                "requested_by": "quality-inspector",
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    response_json(response).await
}
