use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub role: String,
}

/// The category fields embedded in product payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub full_slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub full_slug: String,
    pub parent_id: Option<Uuid>,
    pub product_count: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock: i32,
    pub category: CategorySummary,
    pub slug: String,
    pub images: Vec<ProductImage>,
    pub specifications: Specifications,
    pub is_active: bool,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductImage {
    pub url: String,
    #[serde(default)]
    pub alt: String,
    #[serde(default)]
    pub is_main: bool,
}

/// Ordered product images, stored as one JSONB array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(transparent)]
pub struct ProductImages(pub Vec<ProductImage>);

/// Laptop specifications: flat display strings plus structured per-subsystem details.
#[derive(
    Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema, FromJsonQueryResult,
)]
#[serde(default)]
pub struct Specifications {
    pub simple: SimpleSpecs,
    pub detailed: DetailedSpecs,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct SimpleSpecs {
    pub processor: String,
    pub graphics: String,
    pub memory: String,
    pub display: String,
    pub storage: String,
    pub os: String,
    pub disksupport: String,
    pub keyboard: String,
    pub thickness: String,
    pub weight: String,
    pub promotion: String,
    pub material: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct DetailedSpecs {
    pub processor: ProcessorDetails,
    pub graphics: GraphicsDetails,
    pub memory: MemoryDetails,
    pub display: DisplayDetails,
    pub storage: StorageDetails,
    pub design: DesignDetails,
    pub ports: PortDetails,
    pub hardware: HardwareDetails,
    pub other: OtherDetails,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct ProcessorDetails {
    pub processor_architecture: String,
    pub processor: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct GraphicsDetails {
    pub gpu: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct MemoryDetails {
    pub ram: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct DisplayDetails {
    pub screen: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct StorageDetails {
    pub first_port: String,
    pub second_port: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct DesignDetails {
    pub dimensions: String,
    pub weight: String,
    pub materialtype: String,
    pub adapter: String,
    pub battery: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct PortDetails {
    pub usb2: String,
    pub usb3: String,
    pub usb3c: String,
    pub hdmi: String,
    pub portsupport: String,
    pub speakers: String,
    pub microphone: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct HardwareDetails {
    pub keyboard: String,
    pub camera: String,
    pub wireless: String,
    pub speakers: String,
    pub soundsystem: String,
    pub internalcardreader: String,
    pub gigaethernet: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct OtherDetails {
    pub guarantee: String,
    pub notification: String,
}
