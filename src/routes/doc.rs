use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        catalog::{
            AppliedFilters, CatalogPage, CategoryCount, CategoryProducts, FilterCounts,
            PaginationMeta,
        },
        categories::{CategoryTotal, CreateCategoryRequest},
        products::{CreateProductRequest, DeletedProducts, UpdateProductRequest},
    },
    models::{
        Category, CategorySummary, DetailedSpecs, Product, ProductImage, SimpleSpecs,
        Specifications, User,
    },
    response::{ApiResponse, Meta},
    routes::{admin, auth, catalog, categories, health, params},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::register,
        catalog::filter_laptops,
        catalog::category_laptops,
        catalog::get_laptop,
        categories::with_product_count,
        categories::product_count,
        admin::create_category,
        admin::create_laptop,
        admin::list_deleted_laptops,
        admin::update_laptop,
        admin::delete_laptop,
        admin::restore_laptop
    ),
    components(
        schemas(
            User,
            Category,
            CategorySummary,
            Product,
            ProductImage,
            Specifications,
            SimpleSpecs,
            DetailedSpecs,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            CatalogPage,
            CategoryCount,
            PaginationMeta,
            AppliedFilters,
            FilterCounts,
            CategoryProducts,
            CategoryTotal,
            CreateCategoryRequest,
            CreateProductRequest,
            UpdateProductRequest,
            DeletedProducts,
            params::CatalogQuery,
            Meta,
            ApiResponse<Product>,
            ApiResponse<CatalogPage>,
            ApiResponse<CategoryProducts>,
            ApiResponse<DeletedProducts>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Catalog", description = "Laptop listing, filtering and detail endpoints"),
        (name = "Categories", description = "Category product totals"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Admin", description = "Catalog administration endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_catalog_routes() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        for expected in [
            "/api/laptops/filter/{category_path}",
            "/api/laptop/{category_slug}/{rest}",
            "/api/categories/with-product-count",
            "/api/admin/laptops/{path}",
        ] {
            assert!(paths.iter().any(|p| p.as_str() == expected), "missing {expected}");
        }
        assert!(doc
            .components
            .as_ref()
            .is_some_and(|c| c.security_schemes.contains_key("bearer_auth")));
    }

    #[test]
    fn laptop_admin_path_supports_update_and_delete() {
        let doc = ApiDoc::openapi();
        let item = doc
            .paths
            .paths
            .get("/api/admin/laptops/{path}")
            .expect("admin laptop path documented");
        assert!(item.put.is_some());
        assert!(item.delete.is_some());
    }
}
