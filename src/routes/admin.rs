use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
};

use crate::{
    dto::{
        categories::CreateCategoryRequest,
        products::{CreateProductRequest, DeletedProducts, UpdateProductRequest},
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::{Category, Product},
    response::ApiResponse,
    routes::params::DeleteQuery,
    services::{category_service, product_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/categories", post(create_category))
        .route("/laptops", post(create_laptop))
        .route("/laptops/deleted", get(list_deleted_laptops))
        .route("/laptops/restore/{*path}", post(restore_laptop))
        .route("/laptops/{*path}", put(update_laptop).delete(delete_laptop))
}

#[utoipa::path(
    post,
    path = "/api/admin/categories",
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created", body = ApiResponse<Category>),
        (status = 400, description = "Duplicate path"),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_category(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateCategoryRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Category>>)> {
    let resp = category_service::create_category(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    post,
    path = "/api/admin/laptops",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Laptop created", body = ApiResponse<Product>),
        (status = 400, description = "Invalid payload or duplicate slug"),
        (status = 404, description = "Category not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_laptop(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateProductRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Product>>)> {
    let resp = product_service::create_product(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/admin/laptops/deleted",
    responses(
        (status = 200, description = "Soft-deleted laptops", body = ApiResponse<DeletedProducts>)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_deleted_laptops(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<DeletedProducts>>> {
    let resp = product_service::list_deleted(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/laptops/{path}",
    params(
        ("path" = String, Path, description = "Root category slug, subcategory slugs, then the product slug")
    ),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Laptop updated", body = ApiResponse<Product>),
        (status = 400, description = "Invalid payload or duplicate slug in the target category"),
        (status = 404, description = "Category or laptop not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_laptop(
    State(state): State<AppState>,
    user: AuthUser,
    Path(path): Path<String>,
    Json(payload): Json<UpdateProductRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = product_service::update_product(&state, &user, &path, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/laptops/{path}",
    params(
        ("path" = String, Path, description = "Category full slug followed by the product slug"),
        DeleteQuery
    ),
    responses(
        (status = 200, description = "Laptop deleted", body = ApiResponse<Product>),
        (status = 404, description = "Category or laptop not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_laptop(
    State(state): State<AppState>,
    user: AuthUser,
    Path(path): Path<String>,
    Query(query): Query<DeleteQuery>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = product_service::delete_product(&state, &user, &path, query.permanent).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/laptops/restore/{path}",
    params(
        ("path" = String, Path, description = "Category full slug followed by the product slug or id")
    ),
    responses(
        (status = 200, description = "Laptop restored", body = ApiResponse<Product>),
        (status = 400, description = "Laptop is not deleted"),
        (status = 404, description = "Category or laptop not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn restore_laptop(
    State(state): State<AppState>,
    user: AuthUser,
    Path(path): Path<String>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = product_service::restore_product(&state, &user, &path).await?;
    Ok(Json(resp))
}
