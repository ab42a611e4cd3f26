mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};

use common::spawn_app;

#[tokio::test]
async fn test_fiat_uno_scenario_over_http() {
    let app = spawn_app().await;
    let car = app.vehicle("ABC1234", "Fiat Uno").await;
    let ana = app.driver("Ana").await;
    let bia = app.driver("Bia").await;
    let (ana_h, ana_v) = ana.auth();
    let (bia_h, bia_v) = bia.auth();

    let response = app
        .server
        .post(&format!("/api/fleet/{}/reserve", car))
        .add_header(ana_h.clone(), ana_v.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "reserved");
    assert_eq!(body["data"]["reserved_on"], "2025-06-10");
    assert_eq!(body["data"]["driver_name"], "Ana");
    assert_eq!(app.vehicle_status(car).await, "reserved");

    // B no puede reservar un vehículo reservado por A
    let response = app
        .server
        .post(&format!("/api/fleet/{}/reserve", car))
        .add_header(bia_h.clone(), bia_v.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["code"], "CONSTRAINT_VIOLATION");

    let response = app
        .server
        .post(&format!("/api/fleet/{}/pickup", car))
        .add_header(ana_h.clone(), ana_v.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["data"]["status"], "in_use");
    assert_eq!(body["data"]["picked_up_on"], "2025-06-10");
    assert_eq!(body["data"]["picked_up_at"], "07:45:00");
    assert_eq!(app.vehicle_status(car).await, "in_use");

    let response = app
        .server
        .post(&format!("/api/fleet/{}/return", car))
        .add_header(ana_h, ana_v)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["data"]["status"], "finalized");
    assert_eq!(app.vehicle_status(car).await, "available");

    let response = app
        .server
        .post(&format!("/api/fleet/{}/reserve", car))
        .add_header(bia_h, bia_v)
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    assert_eq!(app.vehicle_status(car).await, "reserved");
}

#[tokio::test]
async fn test_pickup_without_reservation_is_rejected() {
    let app = spawn_app().await;
    let car = app.vehicle("ABC1234", "Fiat Uno").await;
    let (h, v) = app.driver("Ana").await.auth();

    let response = app
        .server
        .post(&format!("/api/fleet/{}/pickup", car))
        .add_header(h.clone(), v.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["message"], "No tienes una reserva para este vehículo");

    let response = app
        .server
        .post(&format!("/api/fleet/{}/return", car))
        .add_header(h, v)
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_driver_holding_a_vehicle_cannot_reserve_another() {
    let app = spawn_app().await;
    let uno = app.vehicle("ABC1234", "Fiat Uno").await;
    let gol = app.vehicle("BRA2E19", "VW Gol").await;
    let (h, v) = app.driver("Ana").await.auth();

    app.server
        .post(&format!("/api/fleet/{}/reserve", uno))
        .add_header(h.clone(), v.clone())
        .await;

    let response = app
        .server
        .post(&format!("/api/fleet/{}/reserve", gol))
        .add_header(h, v)
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    assert_eq!(app.vehicle_status(gol).await, "available");
}

#[tokio::test]
async fn test_fleet_lists_occupants() {
    let app = spawn_app().await;
    let _uno = app.vehicle("ABC1234", "Fiat Uno").await;
    let gol = app.vehicle("BRA2E19", "VW Gol").await;
    let ana = app.driver("Ana").await;
    let (h, v) = ana.auth();

    app.server
        .post(&format!("/api/fleet/{}/reserve", gol))
        .add_header(h.clone(), v.clone())
        .await;

    let response = app.server.get("/api/fleet").add_header(h, v).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    let fleet = body["data"].as_array().unwrap();

    assert_eq!(fleet.len(), 2);
    assert_eq!(fleet[0]["name"], "Fiat Uno");
    assert_eq!(fleet[0]["status"], "available");
    assert!(fleet[0]["occupant"].is_null());
    assert_eq!(fleet[1]["name"], "VW Gol");
    assert_eq!(fleet[1]["occupant"]["display_name"], "Ana");
    assert_eq!(fleet[1]["occupant"]["user_id"], ana.id.to_string());
    assert_eq!(fleet[1]["occupant"]["usage_status"], "reserved");
}

#[tokio::test]
async fn test_unknown_vehicle_returns_not_found() {
    let app = spawn_app().await;
    let (h, v) = app.driver("Ana").await.auth();

    let response = app
        .server
        .post(&format!("/api/fleet/{}/reserve", uuid::Uuid::new_v4()))
        .add_header(h, v)
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_reservation_console_is_admin_only() {
    let app = spawn_app().await;
    let car = app.vehicle("ABC1234", "Fiat Uno").await;
    let (h, v) = app.driver("Ana").await.auth();

    let response = app.server.get("/api/reservations").add_header(h.clone(), v.clone()).await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    let response = app.server.get("/api/reservations").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    let response = app.server.post(&format!("/api/fleet/{}/reserve", car)).await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_console_pickup_and_return() {
    let app = spawn_app().await;
    let car = app.vehicle("ABC1234", "Fiat Uno").await;
    let ana = app.driver("Ana").await;
    let admin = app.admin().await;
    let (ah, av) = admin.auth();
    let (dh, dv) = ana.auth();

    let response = app
        .server
        .post(&format!("/api/fleet/{}/reserve", car))
        .add_header(dh, dv)
        .await;
    let body: Value = response.json();
    let usage_id = body["data"]["id"].as_str().unwrap().to_string();

    let response = app.server.get("/api/reservations").add_header(ah.clone(), av.clone()).await;
    let body: Value = response.json();
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    // Devolver antes de retirar no es una transición válida
    let response = app
        .server
        .post(&format!("/api/reservations/{}/return", usage_id))
        .add_header(ah.clone(), av.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);

    let response = app
        .server
        .post(&format!("/api/reservations/{}/pickup", usage_id))
        .add_header(ah.clone(), av.clone())
        .json(&json!({ "date": "2025-06-09", "time": "16:20" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["data"]["status"], "in_use");
    assert_eq!(body["data"]["picked_up_on"], "2025-06-09");
    assert_eq!(body["data"]["picked_up_at"], "16:20:00");
    assert_eq!(body["data"]["user_id"], ana.id.to_string());

    let response = app
        .server
        .post(&format!("/api/reservations/{}/return", usage_id))
        .add_header(ah.clone(), av.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["data"]["returned_on"], "2025-06-10");
    assert_eq!(app.vehicle_status(car).await, "available");

    let response = app
        .server
        .post(&format!("/api/reservations/{}/pickup", uuid::Uuid::new_v4()))
        .add_header(ah, av)
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_return_before_pickup_is_bad_request() {
    let app = spawn_app().await;
    let car = app.vehicle("ABC1234", "Fiat Uno").await;
    let (dh, dv) = app.driver("Ana").await.auth();
    let (ah, av) = app.admin().await.auth();

    app.server
        .post(&format!("/api/fleet/{}/reserve", car))
        .add_header(dh.clone(), dv.clone())
        .await;
    let response = app
        .server
        .post(&format!("/api/fleet/{}/pickup", car))
        .add_header(dh, dv)
        .await;
    let body: Value = response.json();
    let usage_id = body["data"]["id"].as_str().unwrap().to_string();

    let response = app
        .server
        .post(&format!("/api/reservations/{}/return", usage_id))
        .add_header(ah, av)
        .json(&json!({ "date": "2025-06-09" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "BAD_REQUEST");
    assert_eq!(app.vehicle_status(car).await, "in_use");
}
