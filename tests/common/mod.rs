#![allow(dead_code)]

use axum::http::{header, HeaderName, HeaderValue};
use axum_test::TestServer;
use chrono::{NaiveDate, NaiveTime};
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

use fleet_manager::config::{EnvironmentConfig, StoreBackend};
use fleet_manager::models::user::UserRole;
use fleet_manager::models::vehicle::{NewVehicle, Vehicle};
use fleet_manager::utils::clock::FixedClock;
use fleet_manager::{create_router, AppState};

pub const PASSWORD: &str = "segredo123";

pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
}

pub struct TestUser {
    pub id: Uuid,
    pub token: String,
}

impl TestUser {
    pub fn auth(&self) -> (HeaderName, HeaderValue) {
        bearer(&self.token)
    }
}

pub fn bearer(token: &str) -> (HeaderName, HeaderValue) {
    (
        header::AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    )
}

pub fn test_config() -> EnvironmentConfig {
    EnvironmentConfig {
        environment: "test".to_string(),
        port: 0,
        host: "127.0.0.1".to_string(),
        database_url: None,
        store_backend: StoreBackend::Memory,
        jwt_secret: "test-secret".to_string(),
        jwt_expiration: 3600,
        bcrypt_cost: 4,
        cors_origins: Vec::new(),
    }
}

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 10).unwrap()
}

pub async fn spawn_app() -> TestApp {
    let clock = FixedClock::new(today(), NaiveTime::from_hms_opt(7, 45, 0).unwrap());
    let state = AppState::in_memory_with_clock(test_config(), Arc::new(clock));
    let server = TestServer::new(create_router(state.clone())).unwrap();
    TestApp { server, state }
}

impl TestApp {
    /// Crea el usuario directamente y hace login por HTTP
    pub async fn user(&self, email: &str, name: &str, role: UserRole) -> TestUser {
        let user = self.state.auth.create_user(email, PASSWORD, name, role).await.unwrap();
        let token = self.login(email, PASSWORD).await;
        TestUser { id: user.id, token }
    }

    pub async fn admin(&self) -> TestUser {
        self.user("gestor@frota.com", "Gestor", UserRole::Admin).await
    }

    pub async fn driver(&self, name: &str) -> TestUser {
        self.user(&format!("{}@frota.com", name.to_lowercase()), name, UserRole::User)
            .await
    }

    pub async fn login(&self, email: &str, password: &str) -> String {
        let response = self
            .server
            .post("/api/auth/login")
            .json(&json!({ "email": email, "password": password }))
            .await;
        let body: Value = response.json();
        body["data"]["token"].as_str().unwrap().to_string()
    }

    pub async fn vehicle(&self, plate: &str, name: &str) -> Uuid {
        let vehicle = Vehicle::new(NewVehicle {
            license_plate: plate.to_string(),
            registration_number: "12345678901".to_string(),
            name: name.to_string(),
            company: "Frota Sul".to_string(),
        });
        self.state.vehicles.create(&vehicle).await.unwrap().id
    }

    pub async fn vehicle_status(&self, id: Uuid) -> String {
        let vehicle = self.state.vehicles.find_by_id(id).await.unwrap().unwrap();
        vehicle.status.as_str().to_string()
    }
}
