use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Frozen copy of a cart line captured at checkout. Name, price, color and
/// style are snapshots; later catalog changes must not affect them.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OrderItem {
  pub id: Uuid,
  pub order_id: Uuid,
  pub product_id: Uuid,
  pub variant_id: Uuid,
  pub product_name: String,
  pub variant_price_cents: i64,
  pub color: String,
  pub style: String,
  pub quantity: i32,
}
