use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};

use crate::{
    dto::categories::CategoryTotal,
    error::AppResult,
    response::ApiResponse,
    services::category_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/with-product-count", get(with_product_count))
        .route("/products/count/{slug}", get(product_count))
}

#[utoipa::path(
    get,
    path = "/api/categories/with-product-count",
    responses(
        (status = 200, description = "Every category with its subtree product total", body = ApiResponse<Vec<CategoryTotal>>)
    ),
    tag = "Categories"
)]
pub async fn with_product_count(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<CategoryTotal>>>> {
    let resp = category_service::all_with_product_counts(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/categories/products/count/{slug}",
    params(
        ("slug" = String, Path, description = "Category slug")
    ),
    responses(
        (status = 200, description = "Products in the category and its descendants", body = ApiResponse<CategoryTotal>),
        (status = 404, description = "Category not found")
    ),
    tag = "Categories"
)]
pub async fn product_count(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<ApiResponse<CategoryTotal>>> {
    let resp = category_service::subtree_total(&state, &slug).await?;
    Ok(Json(resp))
}
