use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, Condition, DatabaseConnection,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    catalog::{
        CategoryScope,
        scope::{child_full_slug, descendants_of, slugify, subtree_totals},
    },
    dto::categories::{CategoryTotal, CreateCategoryRequest},
    entity::{
        categories::{self, ActiveModel, Column, Entity as Categories, Model as CategoryModel},
        products::{self, Entity as Products},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Category, CategorySummary},
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Look a category up by full path, then by bare slug.
pub async fn resolve_category(db: &DatabaseConnection, path: &str) -> AppResult<CategoryModel> {
    if let Some(category) = Categories::find()
        .filter(Column::FullSlug.eq(path))
        .one(db)
        .await?
    {
        return Ok(category);
    }

    Categories::find()
        .filter(Column::Slug.eq(path))
        .order_by_asc(Column::FullSlug)
        .one(db)
        .await?
        .ok_or_else(|| AppError::CategoryNotFound(path.to_string()))
}

/// Walk `root_slug` and then each segment through the parent links.
pub async fn resolve_chain(
    db: &DatabaseConnection,
    root_slug: &str,
    segments: &[&str],
) -> AppResult<CategoryModel> {
    let mut current = Categories::find()
        .filter(Column::Slug.eq(root_slug))
        .filter(Column::ParentId.is_null())
        .one(db)
        .await?
        .ok_or_else(|| AppError::CategoryNotFound(root_slug.to_string()))?;

    let mut walked = root_slug.to_string();
    for segment in segments {
        walked = child_full_slug(Some(&walked), segment);
        current = Categories::find()
            .filter(Column::Slug.eq(*segment))
            .filter(Column::ParentId.eq(current.id))
            .one(db)
            .await?
            .ok_or_else(|| AppError::CategoryNotFound(walked.clone()))?;
    }

    Ok(current)
}

pub async fn load_all(db: &DatabaseConnection) -> AppResult<Vec<CategoryModel>> {
    let categories = Categories::find()
        .order_by_asc(Column::FullSlug)
        .all(db)
        .await?;
    Ok(categories)
}

/// Products matching `condition`, counted per directly assigned category.
pub async fn direct_product_counts(
    db: &DatabaseConnection,
    condition: Condition,
) -> AppResult<HashMap<Uuid, u64>> {
    let rows: Vec<(Uuid, i64)> = Products::find()
        .select_only()
        .column(products::Column::CategoryId)
        .column_as(
            Expr::col((products::Entity, products::Column::Id)).count(),
            "product_count",
        )
        .filter(condition)
        .group_by(products::Column::CategoryId)
        .into_tuple()
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(category_id, count)| (category_id, count.max(0) as u64))
        .collect())
}

fn live_products() -> Condition {
    Condition::all().add(products::Column::IsDeleted.eq(false))
}

pub async fn subtree_total(state: &AppState, slug: &str) -> AppResult<ApiResponse<CategoryTotal>> {
    let category = Categories::find()
        .filter(Column::Slug.eq(slug))
        .order_by_asc(Column::FullSlug)
        .one(state.db())
        .await?
        .ok_or_else(|| AppError::CategoryNotFound(slug.to_string()))?;

    let all = load_all(state.db()).await?;
    let direct = direct_product_counts(state.db(), live_products()).await?;
    let totals = subtree_totals(&all, &direct);
    let total = totals.get(&category.id).copied().unwrap_or(0);

    tracing::debug!(category = %category.full_slug, total, "category subtree total");

    Ok(ApiResponse::success(
        "Category product count",
        category_total(&category, total),
        Some(Meta::empty()),
    ))
}

pub async fn all_with_product_counts(
    state: &AppState,
) -> AppResult<ApiResponse<Vec<CategoryTotal>>> {
    let all = load_all(state.db()).await?;
    let direct = direct_product_counts(state.db(), live_products()).await?;
    let totals = subtree_totals(&all, &direct);

    let items: Vec<CategoryTotal> = all
        .iter()
        .map(|c| category_total(c, totals.get(&c.id).copied().unwrap_or(0)))
        .collect();
    let meta = Meta::new(1, items.len() as u64, items.len() as u64);
    Ok(ApiResponse::success("Categories", items, Some(meta)))
}

pub async fn create_category(
    state: &AppState,
    user: &AuthUser,
    payload: CreateCategoryRequest,
) -> AppResult<ApiResponse<Category>> {
    ensure_admin(user)?;

    let slug = payload
        .slug
        .as_deref()
        .map(slugify)
        .unwrap_or_else(|| slugify(&payload.name));
    if slug.is_empty() {
        return Err(AppError::BadRequest("Category slug is empty".into()));
    }

    let parent = match payload.parent_id {
        Some(parent_id) => Some(
            Categories::find_by_id(parent_id)
                .one(state.db())
                .await?
                .ok_or_else(|| AppError::CategoryNotFound(parent_id.to_string()))?,
        ),
        None => None,
    };
    let full_slug = child_full_slug(parent.as_ref().map(|p| p.full_slug.as_str()), &slug);

    let taken = Categories::find()
        .filter(Column::FullSlug.eq(full_slug.as_str()))
        .count(state.db())
        .await?;
    if taken > 0 {
        return Err(AppError::BadRequest(format!(
            "Category {full_slug} already exists"
        )));
    }

    let category = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name),
        slug: Set(slug),
        full_slug: Set(full_slug),
        parent_id: Set(parent.map(|p| p.id)),
        product_count: Set(0),
        created_at: NotSet,
    }
    .insert(state.db())
    .await?;

    tracing::info!(
        user_id = %user.user_id,
        category = %category.full_slug,
        "category created"
    );

    Ok(ApiResponse::success(
        "Category created",
        category_from_entity(category),
        Some(Meta::empty()),
    ))
}

/// Recount the non-deleted products assigned directly to a category.
pub async fn refresh_product_count(db: &DatabaseConnection, category_id: Uuid) -> AppResult<()> {
    let count = Products::find()
        .filter(products::Column::CategoryId.eq(category_id))
        .filter(products::Column::IsDeleted.eq(false))
        .count(db)
        .await?;

    categories::Entity::update_many()
        .col_expr(Column::ProductCount, Expr::value(count.min(i32::MAX as u64) as i32))
        .filter(Column::Id.eq(category_id))
        .exec(db)
        .await?;
    Ok(())
}

pub fn summary(model: &CategoryModel) -> CategorySummary {
    CategorySummary {
        id: model.id,
        name: model.name.clone(),
        slug: model.slug.clone(),
        full_slug: model.full_slug.clone(),
    }
}

pub fn category_from_entity(model: CategoryModel) -> Category {
    Category {
        id: model.id,
        name: model.name,
        slug: model.slug,
        full_slug: model.full_slug,
        parent_id: model.parent_id,
        product_count: model.product_count,
        created_at: model.created_at.to_utc(),
    }
}

fn category_total(model: &CategoryModel, total: u64) -> CategoryTotal {
    CategoryTotal {
        name: model.name.clone(),
        slug: model.slug.clone(),
        full_slug: model.full_slug.clone(),
        total_products: total,
    }
}

/// Scope of `root` taken from an already loaded category list.
pub fn scope_from_loaded(all: &[CategoryModel], root: &CategoryModel) -> CategoryScope {
    CategoryScope {
        category: root.clone(),
        descendants: descendants_of(all, root),
    }
}
