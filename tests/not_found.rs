use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use chrono::Utc;
use laptop_catalog_api::{
    config::AppConfig,
    entity::{categories, products},
    error::AppError,
    routes::{create_api_router, params::CatalogQuery},
    services::catalog_service,
    state::AppState,
};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use tower::ServiceExt;
use uuid::Uuid;

fn state(orm: DatabaseConnection) -> AppState {
    AppState::new(
        orm,
        AppConfig {
            database_url: "postgres://mock".into(),
            host: "127.0.0.1".into(),
            port: 0,
            jwt_secret: "test-secret".into(),
            page_size: 12,
        },
    )
}

fn root_category() -> categories::Model {
    categories::Model {
        id: Uuid::new_v4(),
        name: "Laptoplar".into(),
        slug: "laptoplar".into(),
        full_slug: "laptoplar".into(),
        parent_id: None,
        product_count: 0,
        created_at: Utc::now().fixed_offset(),
    }
}

#[tokio::test]
async fn unknown_category_fails_before_any_product_query() {
    let orm = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<categories::Model>::new(), Vec::new()])
        .into_connection();
    let state = state(orm);

    let result = catalog_service::list_products(&state, "yok", CatalogQuery::default()).await;
    assert!(matches!(result, Err(AppError::CategoryNotFound(ref path)) if path == "yok"));

    // full-path lookup, then slug lookup; nothing touches products
    let orm = std::sync::Arc::into_inner(state.orm).expect("no other connection handles");
    let log = orm.into_transaction_log();
    assert_eq!(log.len(), 2);
}

#[tokio::test]
async fn broken_category_chain_reports_the_walked_path() {
    let orm = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![root_category()], Vec::new()])
        .into_connection();
    let state = state(orm);

    let result = catalog_service::get_product(&state, "laptoplar", "yok/msi-katana-15").await;
    assert!(
        matches!(result, Err(AppError::CategoryNotFound(ref path)) if path == "laptoplar/yok")
    );
}

#[tokio::test]
async fn missing_product_under_resolved_category() {
    let orm = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![root_category()]])
        .append_query_results([Vec::<products::Model>::new()])
        .into_connection();
    let state = state(orm);

    let result = catalog_service::get_product(&state, "laptoplar", "msi-katana-15").await;
    assert!(matches!(result, Err(AppError::ProductNotFound(ref slug)) if slug == "msi-katana-15"));
}

#[tokio::test]
async fn unknown_category_is_a_json_404() {
    let orm = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<categories::Model>::new(), Vec::new()])
        .into_connection();
    let app = create_api_router().with_state(state(orm));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/laptops/filter/yok/alt?memory=abc&page=x")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["message"], "Category not found: yok/alt");
}

#[tokio::test]
async fn admin_routes_require_a_token() {
    let orm = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let app = create_api_router().with_state(state(orm));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/admin/laptops/deleted")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
