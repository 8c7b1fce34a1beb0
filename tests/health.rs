use axum::{extract::State, http::StatusCode};
use laptop_catalog_api::{config::AppConfig, routes::health::health_check, state::AppState};
use sea_orm::{DatabaseBackend, MockDatabase};

#[tokio::test]
async fn health_check_returns_ok() {
    let orm = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let config = AppConfig {
        database_url: "postgres://mock".into(),
        host: "127.0.0.1".into(),
        port: 0,
        jwt_secret: "test-secret".into(),
        page_size: 12,
    };

    let (status, response) = health_check(State(AppState::new(orm, config))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response.0.message, "Health check");

    let data = response.0.data.expect("health data");
    assert_eq!(data.status, "ok");
    assert_eq!(data.database, "ok");
}
