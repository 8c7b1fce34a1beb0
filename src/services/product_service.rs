use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::{
    catalog::scope::{PATH_SEPARATOR, slugify},
    dto::products::{CreateProductRequest, DeletedProducts, UpdateProductRequest},
    entity::{
        categories::{self, Entity as Categories, Model as CategoryModel},
        products::{ActiveModel, Column, Entity as Products, Model as ProductModel},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{CategorySummary, Product, ProductImage, ProductImages, Specifications},
    response::{ApiResponse, Meta},
    services::category_service::{self, refresh_product_count, resolve_chain},
    state::AppState,
};

pub fn product_from_entity(model: ProductModel, category: CategorySummary) -> Product {
    Product {
        id: model.id,
        name: model.name,
        description: model.description,
        price: model.price,
        stock: model.stock,
        category,
        slug: model.slug,
        images: model.images.0,
        specifications: model.specifications,
        is_active: model.is_active,
        is_deleted: model.is_deleted,
        created_at: model.created_at.to_utc(),
        updated_at: model.updated_at.to_utc(),
    }
}

/// Attach each product's category, skipping rows whose category is gone.
pub fn with_categories(
    rows: Vec<ProductModel>,
    categories: &HashMap<Uuid, CategorySummary>,
) -> Vec<Product> {
    rows.into_iter()
        .filter_map(|row| {
            let category = categories.get(&row.category_id)?.clone();
            Some(product_from_entity(row, category))
        })
        .collect()
}

pub fn category_index(categories: &[CategoryModel]) -> HashMap<Uuid, CategorySummary> {
    categories
        .iter()
        .map(|c| (c.id, category_service::summary(c)))
        .collect()
}

/// Exactly one image is main: the first flagged one, or the first image.
fn normalize_images(mut images: Vec<ProductImage>) -> Vec<ProductImage> {
    let main = images.iter().position(|i| i.is_main).unwrap_or(0);
    for (idx, image) in images.iter_mut().enumerate() {
        image.is_main = idx == main;
    }
    images
}

/// Split `category/full/slug/product-slug` into the category path and product slug.
fn split_product_path(path: &str) -> AppResult<(&str, &str)> {
    path.trim_matches(PATH_SEPARATOR)
        .rsplit_once(PATH_SEPARATOR)
        .filter(|(category, slug)| !category.is_empty() && !slug.is_empty())
        .ok_or_else(|| {
            AppError::BadRequest(format!("Expected <category>/<product> path, got {path}"))
        })
}

async fn category_by_full_slug(db: &DatabaseConnection, full_slug: &str) -> AppResult<CategoryModel> {
    Categories::find()
        .filter(categories::Column::FullSlug.eq(full_slug))
        .one(db)
        .await?
        .ok_or_else(|| AppError::CategoryNotFound(full_slug.to_string()))
}

pub async fn create_product(
    state: &AppState,
    user: &AuthUser,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;

    if payload.price.is_sign_negative() {
        return Err(AppError::BadRequest("Price must not be negative".into()));
    }
    if payload.stock < 0 {
        return Err(AppError::BadRequest("Stock must not be negative".into()));
    }

    let category = Categories::find_by_id(payload.category_id)
        .one(state.db())
        .await?
        .ok_or_else(|| AppError::CategoryNotFound(payload.category_id.to_string()))?;

    let slug = slugify(payload.slug.as_deref().unwrap_or(&payload.name));
    if slug.is_empty() {
        return Err(AppError::BadRequest("Product slug is empty".into()));
    }

    let taken = Products::find()
        .filter(Column::CategoryId.eq(category.id))
        .filter(Column::Slug.eq(slug.as_str()))
        .count(state.db())
        .await?;
    if taken > 0 {
        return Err(AppError::BadRequest(format!(
            "Product {slug} already exists in {}",
            category.full_slug
        )));
    }

    let product = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name),
        description: Set(payload.description),
        price: Set(payload.price),
        stock: Set(payload.stock),
        category_id: Set(category.id),
        slug: Set(slug),
        images: Set(ProductImages(normalize_images(payload.images))),
        specifications: Set(payload.specifications),
        is_active: Set(true),
        is_deleted: Set(false),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(state.db())
    .await?;

    refresh_product_count(state.db(), category.id).await?;

    tracing::info!(
        user_id = %user.user_id,
        product_id = %product.id,
        category = %category.full_slug,
        "product created"
    );

    Ok(ApiResponse::success(
        "Product created",
        product_from_entity(product, category_service::summary(&category)),
        Some(Meta::empty()),
    ))
}

/// Fold a partial specification document into the stored one.
///
/// `simple` values replace the stored value whenever present. Empty strings and nulls
/// under `detailed` keep the stored value.
fn merge_specifications(
    current: &Specifications,
    patch: serde_json::Value,
) -> AppResult<Specifications> {
    let invalid = |err: serde_json::Error| {
        AppError::BadRequest(format!("Invalid specifications: {err}"))
    };
    let serde_json::Value::Object(patch) = patch else {
        return Err(AppError::BadRequest(
            "Specifications must be a JSON object".into(),
        ));
    };

    let mut merged = serde_json::to_value(current).map_err(invalid)?;
    for (section, value) in patch {
        let keep_empty = section != "detailed";
        merge_value(&mut merged[section.as_str()], value, keep_empty);
    }
    serde_json::from_value(merged).map_err(invalid)
}

fn merge_value(target: &mut serde_json::Value, patch: serde_json::Value, keep_empty: bool) {
    use serde_json::Value;

    match (target, patch) {
        (Value::Object(target), Value::Object(patch)) => {
            for (key, value) in patch {
                let slot = target.entry(key).or_insert(Value::Null);
                merge_value(slot, value, keep_empty);
            }
        }
        (_, Value::Null) => {}
        (_, Value::String(s)) if s.is_empty() && !keep_empty => {}
        (target, patch) => *target = patch,
    }
}

/// Update a laptop addressed by its category chain and slug.
pub async fn update_product(
    state: &AppState,
    user: &AuthUser,
    path: &str,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;
    let (category_path, slug) = split_product_path(path)?;
    let mut segments = category_path.split(PATH_SEPARATOR);
    let root = segments.next().unwrap_or_default();
    let segments: Vec<&str> = segments.collect();
    let category = resolve_chain(state.db(), root, &segments).await?;

    let product = Products::find()
        .filter(Column::CategoryId.eq(category.id))
        .filter(Column::Slug.eq(slug))
        .filter(Column::IsDeleted.eq(false))
        .one(state.db())
        .await?
        .ok_or_else(|| AppError::ProductNotFound(slug.to_string()))?;

    if payload.price.is_some_and(|p| p.is_sign_negative()) {
        return Err(AppError::BadRequest("Price must not be negative".into()));
    }
    if payload.stock.is_some_and(|s| s < 0) {
        return Err(AppError::BadRequest("Stock must not be negative".into()));
    }

    let target = match payload.category_id {
        Some(id) if id != category.id => {
            let target = Categories::find_by_id(id)
                .one(state.db())
                .await?
                .ok_or_else(|| AppError::CategoryNotFound(id.to_string()))?;
            let taken = Products::find()
                .filter(Column::CategoryId.eq(target.id))
                .filter(Column::Slug.eq(slug))
                .count(state.db())
                .await?;
            if taken > 0 {
                return Err(AppError::BadRequest(format!(
                    "Product {slug} already exists in {}",
                    target.full_slug
                )));
            }
            target
        }
        _ => category.clone(),
    };

    let specifications = match payload.specifications {
        Some(patch) => Some(merge_specifications(&product.specifications, patch)?),
        None => None,
    };

    let mut active = product.into_active_model();
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(description) = payload.description {
        active.description = Set(description);
    }
    if let Some(price) = payload.price {
        active.price = Set(price);
    }
    if let Some(stock) = payload.stock {
        active.stock = Set(stock);
    }
    if let Some(images) = payload.images {
        active.images = Set(ProductImages(normalize_images(images)));
    }
    if let Some(specifications) = specifications {
        active.specifications = Set(specifications);
    }
    active.category_id = Set(target.id);
    active.updated_at = Set(Utc::now().fixed_offset());
    let product = active.update(state.db()).await?;

    refresh_product_count(state.db(), category.id).await?;
    if target.id != category.id {
        refresh_product_count(state.db(), target.id).await?;
    }

    tracing::info!(
        user_id = %user.user_id,
        product_id = %product.id,
        category = %target.full_slug,
        "product updated"
    );

    Ok(ApiResponse::success(
        "Product updated",
        product_from_entity(product, category_service::summary(&target)),
        Some(Meta::empty()),
    ))
}

/// Soft delete by default; `permanent` removes the row.
pub async fn delete_product(
    state: &AppState,
    user: &AuthUser,
    path: &str,
    permanent: bool,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;
    let (category_path, slug) = split_product_path(path)?;
    let category = category_by_full_slug(state.db(), category_path).await?;

    let mut finder = Products::find()
        .filter(Column::CategoryId.eq(category.id))
        .filter(Column::Slug.eq(slug));
    if !permanent {
        finder = finder.filter(Column::IsDeleted.eq(false));
    }
    let product = finder
        .one(state.db())
        .await?
        .ok_or_else(|| AppError::ProductNotFound(slug.to_string()))?;

    let (message, product) = if permanent {
        product.clone().delete(state.db()).await?;
        ("Product permanently deleted", product)
    } else {
        let mut active = product.into_active_model();
        active.is_deleted = Set(true);
        active.is_active = Set(false);
        active.updated_at = Set(Utc::now().fixed_offset());
        ("Product deleted", active.update(state.db()).await?)
    };

    refresh_product_count(state.db(), category.id).await?;

    tracing::info!(
        user_id = %user.user_id,
        product_id = %product.id,
        permanent,
        "product deleted"
    );

    Ok(ApiResponse::success(
        message,
        product_from_entity(product, category_service::summary(&category)),
        Some(Meta::empty()),
    ))
}

/// The last path segment is either a product id or a product slug.
pub async fn restore_product(
    state: &AppState,
    user: &AuthUser,
    path: &str,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;
    let (category_path, identifier) = split_product_path(path)?;
    let category = category_by_full_slug(state.db(), category_path).await?;

    let finder = Products::find().filter(Column::CategoryId.eq(category.id));
    let finder = match Uuid::parse_str(identifier) {
        Ok(id) => finder.filter(Column::Id.eq(id)),
        Err(_) => finder.filter(Column::Slug.eq(identifier)),
    };
    let product = finder
        .one(state.db())
        .await?
        .ok_or_else(|| AppError::ProductNotFound(identifier.to_string()))?;

    if !product.is_deleted {
        return Err(AppError::BadRequest("Product is not deleted".into()));
    }

    let mut active = product.into_active_model();
    active.is_deleted = Set(false);
    active.is_active = Set(true);
    active.updated_at = Set(Utc::now().fixed_offset());
    let product = active.update(state.db()).await?;

    refresh_product_count(state.db(), category.id).await?;

    tracing::info!(user_id = %user.user_id, product_id = %product.id, "product restored");

    Ok(ApiResponse::success(
        "Product restored",
        product_from_entity(product, category_service::summary(&category)),
        Some(Meta::empty()),
    ))
}

pub async fn list_deleted(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<DeletedProducts>> {
    ensure_admin(user)?;

    let rows = Products::find()
        .filter(Column::IsDeleted.eq(true))
        .order_by_desc(Column::UpdatedAt)
        .order_by_asc(Column::Id)
        .all(state.db())
        .await?;
    let categories = category_service::load_all(state.db()).await?;
    let laptops = with_categories(rows, &category_index(&categories));

    let count = laptops.len() as u64;
    let meta = Meta::new(1, count, count);
    Ok(ApiResponse::success(
        "Deleted products",
        DeletedProducts { count, laptops },
        Some(meta),
    ))
}
