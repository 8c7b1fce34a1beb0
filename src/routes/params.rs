use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

pub const DEFAULT_PAGE_SIZE: u64 = 12;
pub const MAX_PAGE_SIZE: u64 = 100;

/// Query string of the filtered catalog listing.
///
/// Every value is kept as the raw string so a malformed number or flag never rejects the
/// request: it is echoed back under `filters.applied` and otherwise ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CatalogQuery {
    /// e.g. `i7-13700H`
    pub processor: Option<String>,
    /// e.g. `6GB RTX 4050`, `Intel® Iris® Xe`
    pub graphics: Option<String>,
    /// e.g. `13. Nesil`
    pub processor_architecture: Option<String>,
    /// e.g. `2x16GB 4800MHz`
    pub memory: Option<String>,
    /// e.g. `512GB M.2 SSD`
    pub storage: Option<String>,
    pub display: Option<String>,
    pub os: Option<String>,
    pub first_port: Option<String>,
    pub second_port: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    /// Only `true` restricts the listing to products with stock.
    pub in_stock: Option<String>,
    /// newest | oldest | price_asc | price_desc | name_asc | name_desc
    pub sort_by: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl CatalogQuery {
    pub fn min_price(&self) -> Option<Decimal> {
        parse_price(self.min_price.as_deref())
    }

    pub fn max_price(&self) -> Option<Decimal> {
        parse_price(self.max_price.as_deref())
    }

    pub fn in_stock_only(&self) -> bool {
        self.in_stock.as_deref() == Some("true")
    }

    pub fn sort_key(&self) -> SortKey {
        SortKey::parse(self.sort_by.as_deref())
    }

    pub fn page_request(&self, default_limit: u64) -> PageRequest {
        PageRequest::new(
            parse_number(self.page.as_deref()),
            parse_number(self.limit.as_deref()).or(Some(default_limit)),
        )
    }
}

/// Returns the value when it is present and non-empty.
pub fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn parse_price(value: Option<&str>) -> Option<Decimal> {
    let raw = value.map(str::trim).filter(|v| !v.is_empty())?;
    match Decimal::from_str(raw) {
        Ok(price) => Some(price),
        Err(_) => {
            tracing::debug!(value = raw, "ignoring malformed price bound");
            None
        }
    }
}

fn parse_number(value: Option<&str>) -> Option<u64> {
    value.and_then(|v| v.trim().parse::<u64>().ok())
}

/// A validated page/limit pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl PageRequest {
    pub fn new(page: Option<u64>, limit: Option<u64>) -> Self {
        let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        // The offset is bound as a signed 64-bit value.
        let last_page = i64::MAX as u64 / limit + 1;
        let page = page.unwrap_or(1).clamp(1, last_page);
        Self { page, limit }
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Newest,
    Oldest,
    PriceAsc,
    PriceDesc,
    NameAsc,
    NameDesc,
}

impl SortKey {
    /// Unknown or missing keys sort newest first.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("oldest") => SortKey::Oldest,
            Some("price_asc") => SortKey::PriceAsc,
            Some("price_desc") => SortKey::PriceDesc,
            Some("name_asc") => SortKey::NameAsc,
            Some("name_desc") => SortKey::NameDesc,
            _ => SortKey::Newest,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DeleteQuery {
    /// Remove the row instead of marking it deleted.
    #[serde(default)]
    pub permanent: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_request_defaults_and_clamps() {
        assert_eq!(PageRequest::new(None, None), PageRequest { page: 1, limit: 12 });
        assert_eq!(PageRequest::new(Some(0), Some(0)), PageRequest { page: 1, limit: 1 });
        assert_eq!(
            PageRequest::new(Some(3), Some(500)),
            PageRequest { page: 3, limit: 100 }
        );
        assert_eq!(PageRequest::new(Some(3), Some(12)).offset(), 24);
    }

    #[test]
    fn unknown_sort_keys_fall_back_to_newest() {
        assert_eq!(SortKey::parse(None), SortKey::Newest);
        assert_eq!(SortKey::parse(Some("rating")), SortKey::Newest);
        assert_eq!(SortKey::parse(Some("price_desc")), SortKey::PriceDesc);
        assert_eq!(SortKey::parse(Some("name_asc")), SortKey::NameAsc);
    }

    #[test]
    fn malformed_numbers_are_ignored() {
        let query = CatalogQuery {
            min_price: Some("abc".into()),
            max_price: Some(" 25000.50 ".into()),
            page: Some("two".into()),
            limit: Some("24".into()),
            in_stock: Some("yes".into()),
            ..Default::default()
        };
        assert_eq!(query.min_price(), None);
        assert_eq!(query.max_price(), Some(Decimal::new(2500050, 2)));
        assert!(!query.in_stock_only());
        assert_eq!(query.page_request(12), PageRequest { page: 1, limit: 24 });
    }

    #[test]
    fn huge_pages_keep_the_offset_in_range() {
        let query = CatalogQuery {
            page: Some("9223372036854775807".into()),
            ..Default::default()
        };
        let request = query.page_request(12);
        assert!(request.offset() <= i64::MAX as u64);

        let request = PageRequest::new(Some(u64::MAX), Some(1));
        assert_eq!(request.offset(), i64::MAX as u64);
    }

    #[test]
    fn configured_page_size_applies_without_limit() {
        let query = CatalogQuery::default();
        assert_eq!(query.page_request(20).limit, 20);
    }
}
