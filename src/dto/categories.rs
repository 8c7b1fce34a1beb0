use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryRequest {
    pub name: String,
    /// Derived from `name` when omitted.
    pub slug: Option<String>,
    pub parent_id: Option<Uuid>,
}

/// Non-deleted products in a category and all of its descendants.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    pub name: String,
    pub slug: String,
    pub full_slug: String,
    pub total_products: u64,
}
