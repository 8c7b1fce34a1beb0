use std::collections::BTreeMap;

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    models::{CategorySummary, Product},
    routes::params::CatalogQuery,
};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CatalogPage {
    pub category: CategorySummary,
    pub products: Vec<Product>,
    pub category_counts: Vec<CategoryCount>,
    pub pagination: PaginationMeta,
    pub filters: AppliedFilters,
    pub filter_counts: FilterCounts,
}

/// Number of products matching the active filter under one category subtree.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub full_slug: String,
    pub filtered_count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub current_page: u64,
    pub total_pages: u64,
    pub total_products: u64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
    pub limit: u64,
}

impl PaginationMeta {
    /// `returned` is the number of items on the current page.
    pub fn new(page: u64, limit: u64, total: u64, returned: u64) -> Self {
        let offset = (page.saturating_sub(1)).saturating_mul(limit);
        Self {
            current_page: page,
            total_pages: total.div_ceil(limit.max(1)),
            total_products: total,
            has_next_page: offset + returned < total,
            has_prev_page: page > 1,
            limit,
        }
    }
}

/// Echo of the raw filter parameters the listing was computed with.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AppliedFilters {
    pub applied: CatalogQuery,
}

/// Occurrences of each raw stored value among the filtered products, per dimension.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FilterCounts {
    pub processor: BTreeMap<String, u64>,
    pub processor_architecture: BTreeMap<String, u64>,
    pub graphics: BTreeMap<String, u64>,
    pub memory: BTreeMap<String, u64>,
    pub display: BTreeMap<String, u64>,
    pub os: BTreeMap<String, u64>,
    pub first_port: BTreeMap<String, u64>,
    pub second_port: BTreeMap<String, u64>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryProducts {
    pub category: CategorySummary,
    pub products: Vec<Product>,
    pub total_products: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_past_the_end_is_empty_but_well_formed() {
        let meta = PaginationMeta::new(3, 12, 20, 0);
        assert_eq!(meta.total_pages, 2);
        assert!(!meta.has_next_page);
        assert!(meta.has_prev_page);
        assert_eq!(meta.total_products, 20);
    }

    #[test]
    fn next_page_flag_tracks_remaining_items() {
        let first = PaginationMeta::new(1, 12, 20, 12);
        assert!(first.has_next_page);
        assert!(!first.has_prev_page);

        let last = PaginationMeta::new(2, 12, 20, 8);
        assert!(!last.has_next_page);

        let exact = PaginationMeta::new(2, 10, 20, 10);
        assert_eq!(exact.total_pages, 2);
        assert!(!exact.has_next_page);
    }

    #[test]
    fn empty_result_has_no_pages() {
        let meta = PaginationMeta::new(1, 12, 0, 0);
        assert_eq!(meta.total_pages, 0);
        assert!(!meta.has_next_page);
        assert!(!meta.has_prev_page);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let json = serde_json::to_value(PaginationMeta::new(1, 12, 13, 12)).unwrap();
        assert_eq!(json["currentPage"], 1);
        assert_eq!(json["totalPages"], 2);
        assert_eq!(json["hasNextPage"], true);
        assert_eq!(json["hasPrevPage"], false);
    }
}
