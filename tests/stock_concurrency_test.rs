mod common;

use std::sync::Arc;

use axum::http::{Method, StatusCode};
use common::TestApp;
use rust_decimal_macros::dec;
use serde_json::json;

#[tokio::test]
async fn competing_exits_cannot_oversell_a_component() {
    let app = Arc::new(TestApp::new().await);
    let component = app.seed_component("CONC-01").await;
    app.receive_stock(component.id, None, dec!(100)).await;

    let mut handles = Vec::new();
    for worker in 0..2 {
        let app = Arc::clone(&app);
        let component_id = component.id;
        handles.push(tokio::spawn(async move {
            let response = app
                .request(
                    Method::POST,
                    "/api/v1/movements",
                    Some(json!({
                        "kind": "EXIT",
                        "origin": "SERVICE_ORDER_CONSUMPTION",
                        "component_id": component_id,
                        "quantity": 60,
                        "performed_by": format!("technician-{}", worker),
                    })),
                )
                .await;
            response.status()
        }));
    }

    let mut admitted = 0;
    let mut rejected = 0;
    for handle in handles {
        match handle.await.expect("exit task completed") {
            StatusCode::CREATED => admitted += 1,
            StatusCode::UNPROCESSABLE_ENTITY => rejected += 1,
            other => panic!("unexpected status {}", other),
        }
    }

    assert_eq!(admitted, 1, "exactly one exit should be admitted; got {}", admitted);
    assert_eq!(rejected, 1);
    assert_eq!(app.stock_of(component.id, None).await, dec!(40));
}

#[tokio::test]
async fn small_exits_are_admitted_until_stock_runs_out() {
    let app = Arc::new(TestApp::new().await);
    let component = app.seed_component("CONC-02").await;
    app.receive_stock(component.id, None, dec!(10)).await;

    let mut handles = Vec::new();
    for worker in 0..20 {
        let app = Arc::clone(&app);
        let component_id = component.id;
        handles.push(tokio::spawn(async move {
            let response = app
                .request(
                    Method::POST,
                    "/api/v1/movements",
                    Some(json!({
                        "kind": "EXIT",
                        "origin": "SERVICE_ORDER_CONSUMPTION",
                        "component_id": component_id,
                        "quantity": 1,
                        "performed_by": format!("technician-{}", worker),
                    })),
                )
                .await;
            response.status()
        }));
    }

    let mut admitted = 0;
    for handle in handles {
        if handle.await.expect("exit task completed") == StatusCode::CREATED {
            admitted += 1;
        }
    }

    assert_eq!(admitted, 10, "exactly 10 exits should be admitted; got {}", admitted);
    assert_eq!(app.stock_of(component.id, None).await, dec!(0));
}

#[tokio::test]
async fn concurrent_transfers_conserve_the_global_total() {
    let app = Arc::new(TestApp::new().await);
    let component = app.seed_component("CONC-03").await;
    let origin = app.seed_location("WH-C1").await;
    let destination = app.seed_location("VAN-C1").await;
    app.receive_stock(component.id, Some(origin.id), dec!(10))
        .await;

    let mut handles = Vec::new();
    for worker in 0..4 {
        let app = Arc::clone(&app);
        let component_id = component.id;
        let origin_id = origin.id;
        let destination_id = destination.id;
        handles.push(tokio::spawn(async move {
            let response = app
                .request(
                    Method::POST,
                    "/api/v1/transfers",
                    Some(json!({
                        "component_id": component_id,
                        "quantity": 3,
                        "origin_location_id": origin_id,
                        "destination_location_id": destination_id,
                        "performed_by": format!("warehouse-{}", worker),
                    })),
                )
                .await;
            response.status()
        }));
    }

    let mut admitted = 0;
    for handle in handles {
        match handle.await.expect("transfer task completed") {
            StatusCode::CREATED => admitted += 1,
            StatusCode::UNPROCESSABLE_ENTITY => {}
            other => panic!("unexpected status {}", other),
        }
    }

    // 10 on hand admits three transfers of 3; the fourth finds 1 left
    assert_eq!(admitted, 3, "exactly 3 transfers should be admitted; got {}", admitted);
    assert_eq!(app.stock_of(component.id, Some(origin.id)).await, dec!(1));
    assert_eq!(
        app.stock_of(component.id, Some(destination.id)).await,
        dec!(9)
    );
    assert_eq!(app.stock_of(component.id, None).await, dec!(10));
}
