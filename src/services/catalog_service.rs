use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Select,
};
use uuid::Uuid;

use crate::{
    catalog::{ProductFilter, facets, scope::PATH_SEPARATOR},
    dto::catalog::{AppliedFilters, CatalogPage, CategoryProducts, FilterCounts, PaginationMeta},
    entity::{
        Categories,
        products::{Column, Entity as Products, Model as ProductModel},
    },
    error::{AppError, AppResult},
    models::Product,
    response::{ApiResponse, Meta},
    routes::params::{CatalogQuery, SortKey},
    services::{
        category_service::{self, load_all, resolve_category, resolve_chain, scope_from_loaded},
        product_service::{category_index, product_from_entity, with_categories},
    },
    state::AppState,
};

/// Order by the requested key, then by id so pages never overlap.
pub fn apply_sort(select: Select<Products>, key: SortKey) -> Select<Products> {
    let select = match key {
        SortKey::Newest => select.order_by_desc(Column::CreatedAt),
        SortKey::Oldest => select.order_by_asc(Column::CreatedAt),
        SortKey::PriceAsc => select.order_by_asc(Column::Price),
        SortKey::PriceDesc => select.order_by_desc(Column::Price),
        SortKey::NameAsc => select.order_by_asc(Column::Name),
        SortKey::NameDesc => select.order_by_desc(Column::Name),
    };
    select.order_by_asc(Column::Id)
}

/// Filtered, faceted and paginated listing of a category subtree.
pub async fn list_products(
    state: &AppState,
    category_path: &str,
    query: CatalogQuery,
) -> AppResult<ApiResponse<CatalogPage>> {
    let db = state.db();
    let category = resolve_category(db, category_path).await?;
    let categories = load_all(db).await?;
    let scope = scope_from_loaded(&categories, &category);

    let filter = ProductFilter::build(&query, scope.ids());
    tracing::debug!(category = %category.full_slug, ?filter, "catalog filter");

    let direct = category_service::direct_product_counts(db, filter.unscoped_condition()).await?;
    let category_counts = facets::category_counts(&categories, &direct);

    // Facets and the total come from the whole filtered set, not the current page.
    let matching = Products::find().filter(filter.condition()).all(db).await?;
    let filter_counts = FilterCounts::tally(matching.iter().map(|p| &p.specifications));
    let total = matching.len() as u64;

    let page = query.page_request(state.config.page_size);
    let rows = if page.offset() >= total {
        Vec::new()
    } else {
        apply_sort(Products::find().filter(filter.condition()), query.sort_key())
            .limit(page.limit)
            .offset(page.offset())
            .all(db)
            .await?
    };
    let products = with_categories(rows, &category_index(&categories));

    let pagination = PaginationMeta::new(page.page, page.limit, total, products.len() as u64);
    tracing::debug!(
        category = %category.full_slug,
        total,
        page = page.page,
        returned = products.len(),
        "catalog page"
    );

    let data = CatalogPage {
        category: category_service::summary(&category),
        products,
        category_counts,
        pagination,
        filters: AppliedFilters { applied: query },
        filter_counts,
    };
    Ok(ApiResponse::success(
        "Products",
        data,
        Some(Meta::new(page.page, page.limit, total)),
    ))
}

/// Every non-deleted product under a category, newest first.
///
/// `identifier` is a category id, a full path or a bare slug.
pub async fn list_category_products(
    state: &AppState,
    identifier: &str,
) -> AppResult<ApiResponse<CategoryProducts>> {
    let db = state.db();
    let category = match Uuid::parse_str(identifier) {
        Ok(id) => Categories::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::CategoryNotFound(identifier.to_string()))?,
        Err(_) => resolve_category(db, identifier).await?,
    };
    let categories = load_all(db).await?;
    let scope = scope_from_loaded(&categories, &category);

    let rows = apply_sort(
        Products::find()
            .filter(Column::CategoryId.is_in(scope.ids()))
            .filter(Column::IsDeleted.eq(false)),
        SortKey::Newest,
    )
    .all(db)
    .await?;
    let products = with_categories(rows, &category_index(&categories));
    let total = products.len() as u64;

    Ok(ApiResponse::success(
        "Category products",
        CategoryProducts {
            category: category_service::summary(&category),
            products,
            total_products: total,
        },
        Some(Meta::new(1, total, total)),
    ))
}

/// A single product addressed by its category chain, e.g.
/// `laptoplar/oyun-bilgisayarlari/msi-katana-15`.
pub async fn get_product(
    state: &AppState,
    category_slug: &str,
    rest: &str,
) -> AppResult<ApiResponse<Product>> {
    let segments: Vec<&str> = rest
        .split(PATH_SEPARATOR)
        .filter(|s| !s.is_empty())
        .collect();
    let Some((product_slug, subcategories)) = segments.split_last() else {
        return Err(AppError::ProductNotFound(rest.to_string()));
    };

    let category = resolve_chain(state.db(), category_slug, subcategories).await?;
    let product = find_live_product(state.db(), category.id, product_slug)
        .await?
        .ok_or_else(|| AppError::ProductNotFound((*product_slug).to_string()))?;

    Ok(ApiResponse::success(
        "Product",
        product_from_entity(product, category_service::summary(&category)),
        Some(Meta::empty()),
    ))
}

async fn find_live_product(
    db: &DatabaseConnection,
    category_id: Uuid,
    slug: &str,
) -> AppResult<Option<ProductModel>> {
    let product = Products::find()
        .filter(Column::CategoryId.eq(category_id))
        .filter(Column::Slug.eq(slug))
        .filter(Column::IsDeleted.eq(false))
        .one(db)
        .await?;
    Ok(product)
}

#[cfg(test)]
mod tests {
    use sea_orm::{QueryTrait, sea_query::PostgresQueryBuilder};

    use super::*;

    fn sql(key: SortKey) -> String {
        apply_sort(Products::find(), key)
            .into_query()
            .to_string(PostgresQueryBuilder)
    }

    #[test]
    fn every_sort_ends_with_the_id_tie_break() {
        for key in [
            SortKey::Newest,
            SortKey::Oldest,
            SortKey::PriceAsc,
            SortKey::PriceDesc,
            SortKey::NameAsc,
            SortKey::NameDesc,
        ] {
            assert!(
                sql(key).ends_with(r#""products"."id" ASC"#),
                "{key:?}: {}",
                sql(key)
            );
        }
    }

    #[test]
    fn sort_keys_map_to_columns() {
        assert!(sql(SortKey::Newest).contains(r#"ORDER BY "products"."created_at" DESC"#));
        assert!(sql(SortKey::PriceAsc).contains(r#"ORDER BY "products"."price" ASC"#));
        assert!(sql(SortKey::NameDesc).contains(r#"ORDER BY "products"."name" DESC"#));
    }
}
