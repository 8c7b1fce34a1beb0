use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Product, ProductImage, Specifications};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    #[serde(default)]
    pub stock: i32,
    pub category_id: Uuid,
    /// Derived from `name` when omitted.
    pub slug: Option<String>,
    #[serde(default)]
    pub images: Vec<ProductImage>,
    #[serde(default)]
    pub specifications: Specifications,
}

/// Partial update; omitted fields keep their stored value.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
    /// Moves the laptop to another category.
    pub category_id: Option<Uuid>,
    /// Replaces the image list.
    pub images: Option<Vec<ProductImage>>,
    /// Merged into the stored specifications. Empty `detailed` values keep the stored
    /// value.
    #[schema(value_type = Option<Object>)]
    pub specifications: Option<serde_json::Value>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeletedProducts {
    pub count: u64,
    pub laptops: Vec<Product>,
}
