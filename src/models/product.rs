use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Product {
  pub id: Uuid,
  pub category_id: Uuid,
  pub name: String,
  pub description: Option<String>,
  // Display default only. The purchasable price lives on the variant.
  pub price_cents: i64,
  pub in_stock: bool,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// A purchasable SKU-level specialization of a product. Prices are
/// authoritative here, not on the parent product.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ProductVariant {
  pub id: Uuid,
  pub product_id: Uuid,
  pub color: String,
  pub style: String,
  pub price_cents: i64,
  pub image_url: Option<String>,
}

/// Product with its variants attached, as returned by the catalog listing
/// and detail endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct ProductWithVariants {
  #[serde(flatten)]
  pub product: Product,
  pub variants: Vec<ProductVariant>,
}
