mod common;

use axum::http::{Method, StatusCode};
use common::{response_json, TestApp};
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use uuid::Uuid;

async fn open_remission(app: &TestApp, lines: Value) -> Value {
    let response = app
        .request(
            Method::POST,
            "/api/v1/remissions",
            Some(json!({
                "destination_type": "TECHNICIAN",
                "destination_id": Uuid::new_v4(),
                "delivered_by": "warehouse-lead",
                "lines": lines,
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    response_json(response).await
}

#[tokio::test]
async fn creating_a_remission_debits_stock_and_writes_one_exit_per_line() {
    let app = TestApp::new().await;
    let pump = app.seed_component("PUMP-220V").await;
    let filter = app.seed_component("FLT-CARB").await;
    let central = app.seed_location("WH-MAIN").await;

    app.receive_stock(pump.id, Some(central.id), dec!(10)).await;
    app.receive_stock(filter.id, Some(central.id), dec!(8)).await;

    let created = open_remission(
        &app,
        json!([
            {"component_id": pump.id, "quantity": 4, "location_id": central.id},
            {"component_id": filter.id, "quantity": 3, "location_id": central.id},
        ]),
    )
    .await;

    assert_eq!(created["remission"]["status"], "OPEN");
    assert_eq!(created["remission"]["number"], "REM-000001");
    assert_eq!(created["lines"].as_array().map(Vec::len), Some(2));

    assert_eq!(app.stock_of(pump.id, None).await, dec!(6));
    assert_eq!(app.stock_of(filter.id, None).await, dec!(5));

    let remission_id = created["remission"]["id"].as_str().expect("remission id");
    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/movements?remission_id={}", remission_id),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = response_json(response).await;
    assert_eq!(page["total"].as_u64(), Some(2));
    for row in page["items"].as_array().expect("movement rows") {
        assert_eq!(row["kind"], "EXIT");
        assert_eq!(row["origin"], "REMISSION");
    }
}

#[tokio::test]
async fn remission_rolls_back_entirely_when_one_line_lacks_stock() {
    let app = TestApp::new().await;
    let pump = app.seed_component("PUMP-110V").await;
    let filter = app.seed_component("FLT-PAPER").await;

    app.receive_stock(pump.id, None, dec!(10)).await;
    app.receive_stock(filter.id, None, dec!(2)).await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/remissions",
            Some(json!({
                "destination_type": "CLIENT",
                "destination_id": Uuid::new_v4(),
                "delivered_by": "warehouse-lead",
                "lines": [
                    {"component_id": pump.id, "quantity": 4},
                    {"component_id": filter.id, "quantity": 5},
                ],
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // the pump line must not survive its sibling's failure
    assert_eq!(app.stock_of(pump.id, None).await, dec!(10));
    assert_eq!(app.stock_of(filter.id, None).await, dec!(2));

    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/movements?component_id={}&origin=REMISSION", pump.id),
            None,
        )
        .await;
    let page = response_json(response).await;
    assert_eq!(page["total"].as_u64(), Some(0));
}

#[tokio::test]
async fn closing_twice_is_a_conflict() {
    let app = TestApp::new().await;
    let pump = app.seed_component("PUMP-MINI").await;
    app.receive_stock(pump.id, None, dec!(5)).await;

    let created = open_remission(
        &app,
        json!([{"component_id": pump.id, "quantity": 1}]),
    )
    .await;
    let id = created["remission"]["id"].as_str().expect("remission id");
    let close_body = json!({"actor": "service-manager"});

    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/remissions/{}/close", id),
            Some(close_body.clone()),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let closed = response_json(response).await;
    assert_eq!(closed["status"], "CLOSED");
    assert!(!closed["closed_at"].is_null());

    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/remissions/{}/close", id),
            Some(close_body),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // closing consumes the parts; stock stays where the exits left it
    assert_eq!(app.stock_of(pump.id, None).await, dec!(4));
}

#[tokio::test]
async fn cancelling_restores_every_line_to_its_location() {
    let app = TestApp::new().await;
    let pump = app.seed_component("PUMP-XL").await;
    let filter = app.seed_component("FLT-OIL").await;
    let central = app.seed_location("WH-A").await;
    let van = app.seed_location("VAN-22").await;

    app.receive_stock(pump.id, Some(central.id), dec!(10)).await;
    app.receive_stock(filter.id, Some(van.id), dec!(6)).await;

    let created = open_remission(
        &app,
        json!([
            {"component_id": pump.id, "quantity": 4, "location_id": central.id},
            {"component_id": filter.id, "quantity": 2, "location_id": van.id},
        ]),
    )
    .await;
    let id = created["remission"]["id"].as_str().expect("remission id");
    assert_eq!(app.stock_of(pump.id, Some(central.id)).await, dec!(6));
    assert_eq!(app.stock_of(filter.id, Some(van.id)).await, dec!(4));

    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/remissions/{}/cancel", id),
            Some(json!({
                "motive": "technician returned the unopened box",
                "actor": "service-manager",
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let cancelled = response_json(response).await;
    assert_eq!(cancelled["remission"]["status"], "CANCELLED");
    assert_eq!(
        cancelled["remission"]["cancellation_motive"],
        "technician returned the unopened box"
    );

    // compensating entries land back in the buckets the lines drew from
    assert_eq!(app.stock_of(pump.id, Some(central.id)).await, dec!(10));
    assert_eq!(app.stock_of(filter.id, Some(van.id)).await, dec!(6));

    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/movements?remission_id={}&kind=ENTRY", id),
            None,
        )
        .await;
    let page = response_json(response).await;
    assert_eq!(page["total"].as_u64(), Some(2));
    for row in page["items"].as_array().expect("movement rows") {
        assert_eq!(row["origin"], "RETURN");
        assert_eq!(row["justification"], "technician returned the unopened box");
    }
}

#[tokio::test]
async fn closed_remissions_cannot_be_cancelled() {
    let app = TestApp::new().await;
    let pump = app.seed_component("PUMP-S").await;
    app.receive_stock(pump.id, None, dec!(5)).await;

    let created = open_remission(
        &app,
        json!([{"component_id": pump.id, "quantity": 2}]),
    )
    .await;
    let id = created["remission"]["id"].as_str().expect("remission id");

    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/remissions/{}/close", id),
            Some(json!({"actor": "service-manager"})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/remissions/{}/cancel", id),
            Some(json!({"motive": "typo in the header", "actor": "service-manager"})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = response_json(response).await;
    assert!(
        body["message"]
            .as_str()
            .expect("error message")
            .contains("supplier return"),
        "the refusal should point at the supplier return workflow"
    );

    // closed means consumed; nothing flows back
    assert_eq!(app.stock_of(pump.id, None).await, dec!(3));
}

#[tokio::test]
async fn cancelling_twice_is_a_conflict() {
    let app = TestApp::new().await;
    let pump = app.seed_component("PUMP-T").await;
    app.receive_stock(pump.id, None, dec!(5)).await;

    let created = open_remission(
        &app,
        json!([{"component_id": pump.id, "quantity": 2}]),
    )
    .await;
    let id = created["remission"]["id"].as_str().expect("remission id");
    let cancel_body = json!({"motive": "wrong destination", "actor": "service-manager"});

    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/remissions/{}/cancel", id),
            Some(cancel_body.clone()),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/remissions/{}/cancel", id),
            Some(cancel_body),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // the second cancel must not double-credit the stock
    assert_eq!(app.stock_of(pump.id, None).await, dec!(5));
}

#[tokio::test]
async fn document_numbers_come_from_a_persistent_counter() {
    use partsledger_api::entities::document_counter;
    use sea_orm::EntityTrait;

    let app = TestApp::new().await;
    let pump = app.seed_component("PUMP-SEQ").await;
    app.receive_stock(pump.id, None, dec!(10)).await;

    let first = open_remission(
        &app,
        json!([{"component_id": pump.id, "quantity": 1}]),
    )
    .await;
    let second = open_remission(
        &app,
        json!([{"component_id": pump.id, "quantity": 1}]),
    )
    .await;
    assert_eq!(first["remission"]["number"], "REM-000001");
    assert_eq!(second["remission"]["number"], "REM-000002");

    let counter = document_counter::Entity::find_by_id("remission_number".to_string())
        .one(app.state.db.as_ref())
        .await
        .expect("query counter")
        .expect("counter row");
    assert_eq!(counter.value, 2);
}

#[tokio::test]
async fn get_returns_the_remission_with_its_lines() {
    let app = TestApp::new().await;
    let pump = app.seed_component("PUMP-U").await;
    app.receive_stock(pump.id, None, dec!(9)).await;

    let created = open_remission(
        &app,
        json!([{"component_id": pump.id, "quantity": 3}]),
    )
    .await;
    let id = created["remission"]["id"].as_str().expect("remission id");

    let response = app
        .request(Method::GET, &format!("/api/v1/remissions/{}", id), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let fetched = response_json(response).await;
    assert_eq!(fetched["remission"]["id"].as_str(), Some(id));
    assert_eq!(fetched["lines"].as_array().map(Vec::len), Some(1));
    assert_eq!(fetched["lines"][0]["component_id"], json!(pump.id));

    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/remissions/{}", Uuid::new_v4()),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
