use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// One cart per user, created at registration and reused across checkouts.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Cart {
  pub id: Uuid,
  pub user_id: Uuid,
  pub created_at: DateTime<Utc>,
}

/// One (product, variant, quantity) line in a cart. At most one row exists
/// per (cart_id, product_id, variant_id); adds on an existing key increment
/// the quantity instead of duplicating the line.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CartItem {
  pub id: Uuid,
  pub cart_id: Uuid,
  pub product_id: Uuid,
  pub variant_id: Uuid,
  pub quantity: i32,
  pub added_at: DateTime<Utc>,
}
