use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};

use crate::{
    dto::catalog::{CatalogPage, CategoryProducts},
    error::AppResult,
    models::Product,
    response::ApiResponse,
    routes::params::CatalogQuery,
    services::catalog_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/laptops/filter/{*category_path}", get(filter_laptops))
        .route("/laptops/category/{*category_path}", get(category_laptops))
        .route("/laptop/{category_slug}/{*rest}", get(get_laptop))
}

#[utoipa::path(
    get,
    path = "/api/laptops/filter/{category_path}",
    params(
        ("category_path" = String, Path, description = "Category full slug, e.g. laptoplar/oyun-bilgisayarlari"),
        CatalogQuery
    ),
    responses(
        (status = 200, description = "Filtered, faceted page of laptops", body = ApiResponse<CatalogPage>),
        (status = 404, description = "Category not found")
    ),
    tag = "Catalog"
)]
pub async fn filter_laptops(
    State(state): State<AppState>,
    Path(category_path): Path<String>,
    Query(query): Query<CatalogQuery>,
) -> AppResult<Json<ApiResponse<CatalogPage>>> {
    let resp = catalog_service::list_products(&state, &category_path, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/laptops/category/{category_path}",
    params(
        ("category_path" = String, Path, description = "Category id, full slug or slug")
    ),
    responses(
        (status = 200, description = "All laptops under the category", body = ApiResponse<CategoryProducts>),
        (status = 404, description = "Category not found")
    ),
    tag = "Catalog"
)]
pub async fn category_laptops(
    State(state): State<AppState>,
    Path(category_path): Path<String>,
) -> AppResult<Json<ApiResponse<CategoryProducts>>> {
    let resp = catalog_service::list_category_products(&state, &category_path).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/laptop/{category_slug}/{rest}",
    params(
        ("category_slug" = String, Path, description = "Root category slug"),
        ("rest" = String, Path, description = "Subcategory slugs followed by the product slug")
    ),
    responses(
        (status = 200, description = "Laptop", body = ApiResponse<Product>),
        (status = 404, description = "Category or product not found")
    ),
    tag = "Catalog"
)]
pub async fn get_laptop(
    State(state): State<AppState>,
    Path((category_slug, rest)): Path<(String, String)>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = catalog_service::get_product(&state, &category_slug, &rest).await?;
    Ok(Json(resp))
}
