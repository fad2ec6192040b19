//! Cart aggregation: line upserts, quantity updates, removals and the
//! live-priced summary. Orders snapshot prices at checkout; the cart summary
//! deliberately reflects the *current* catalog instead.

use crate::errors::{AppError, Result};
use crate::models::CartItem;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use tracing::{info, instrument};
use uuid::Uuid;

pub fn validate_quantity(quantity: i32) -> Result<()> {
  if quantity <= 0 {
    return Err(AppError::Validation("Quantity must be a positive number.".to_string()));
  }
  Ok(())
}

/// Resolves the id of the user's cart. Every user gets a cart at
/// registration, so a miss here means the user id itself is stale.
pub async fn cart_id_by_user(pool: &PgPool, user_id: Uuid) -> Result<Uuid> {
  let cart_id: Option<Uuid> = sqlx::query_scalar("SELECT id FROM carts WHERE user_id = $1")
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
  cart_id.ok_or_else(|| AppError::NotFound(format!("No cart found for user {}.", user_id)))
}

/// Adds a line to the cart, or increments the quantity when a line for the
/// same (product, variant) already exists. Single upsert statement so
/// concurrent adds on the same key cannot lose updates.
#[instrument(name = "cart_service::add_to_cart", skip(pool), fields(cart_id = %cart_id, product_id = %product_id))]
pub async fn add_to_cart(
  pool: &PgPool,
  cart_id: Uuid,
  product_id: Uuid,
  variant_id: Uuid,
  quantity: i32,
) -> Result<CartItem> {
  validate_quantity(quantity)?;

  let item: CartItem = sqlx::query_as(
    r#"
    INSERT INTO cart_items (id, cart_id, product_id, variant_id, quantity, added_at)
    VALUES ($1, $2, $3, $4, $5, NOW())
    ON CONFLICT (cart_id, product_id, variant_id)
    DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity, added_at = NOW()
    RETURNING id, cart_id, product_id, variant_id, quantity, added_at
    "#,
  )
  .bind(Uuid::new_v4())
  .bind(cart_id)
  .bind(product_id)
  .bind(variant_id)
  .bind(quantity)
  .fetch_one(pool)
  .await
  .map_err(|e| match foreign_key_violation(&e) {
    true => AppError::NotFound("Referenced cart, product or variant does not exist.".to_string()),
    false => AppError::Sqlx(e),
  })?;

  info!(
    "Cart line upserted (cart {}, product {}, variant {}). Quantity now {}.",
    cart_id, product_id, variant_id, item.quantity
  );
  Ok(item)
}

/// Overwrites the stored quantity of an existing line.
#[instrument(name = "cart_service::update_cart_item", skip(pool), fields(cart_item_id = %cart_item_id))]
pub async fn update_cart_item(pool: &PgPool, cart_item_id: Uuid, quantity: i32) -> Result<CartItem> {
  validate_quantity(quantity)?;

  let updated: Option<CartItem> = sqlx::query_as(
    r#"
    UPDATE cart_items SET quantity = $1
    WHERE id = $2
    RETURNING id, cart_id, product_id, variant_id, quantity, added_at
    "#,
  )
  .bind(quantity)
  .bind(cart_item_id)
  .fetch_optional(pool)
  .await?;

  updated.ok_or_else(|| AppError::NotFound(format!("Cart item {} not found.", cart_item_id)))
}

/// Removes the matching line. Removing a line that is already gone is a
/// success, callers must not assume prior existence.
#[instrument(name = "cart_service::delete_product", skip(pool), fields(cart_id = %cart_id, product_id = %product_id))]
pub async fn delete_product(pool: &PgPool, cart_id: Uuid, product_id: Uuid, variant_id: Uuid) -> Result<()> {
  let result = sqlx::query("DELETE FROM cart_items WHERE cart_id = $1 AND product_id = $2 AND variant_id = $3")
    .bind(cart_id)
    .bind(product_id)
    .bind(variant_id)
    .execute(pool)
    .await?;

  info!(
    "Cart line delete (cart {}, product {}, variant {}): {} row(s) removed.",
    cart_id,
    product_id,
    variant_id,
    result.rows_affected()
  );
  Ok(())
}

/// One joined row of the summary query: cart line plus live display data.
#[derive(Debug, Clone, FromRow)]
pub struct SummaryRow {
  pub cart_item_id: Uuid,
  pub product_id: Uuid,
  pub variant_id: Uuid,
  pub product_name: String,
  pub color: String,
  pub style: String,
  pub image_url: Option<String>,
  pub variant_price_cents: i64,
  pub quantity: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryLine {
  pub cart_item_id: Uuid,
  pub product_id: Uuid,
  pub variant_id: Uuid,
  pub product_name: String,
  pub color: String,
  pub style: String,
  pub image_url: Option<String>,
  pub variant_price_cents: i64,
  pub quantity: i32,
  pub subtotal_cents: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CartSummary {
  pub cart_id: Uuid,
  pub lines: Vec<SummaryLine>,
  pub total_cents: i64,
}

/// Pure aggregation over the joined rows: per-line subtotal plus grand total.
pub fn build_summary(cart_id: Uuid, rows: Vec<SummaryRow>) -> CartSummary {
  let lines: Vec<SummaryLine> = rows
    .into_iter()
    .map(|r| {
      let subtotal_cents = r.variant_price_cents * i64::from(r.quantity);
      SummaryLine {
        cart_item_id: r.cart_item_id,
        product_id: r.product_id,
        variant_id: r.variant_id,
        product_name: r.product_name,
        color: r.color,
        style: r.style,
        image_url: r.image_url,
        variant_price_cents: r.variant_price_cents,
        quantity: r.quantity,
        subtotal_cents,
      }
    })
    .collect();
  let total_cents = lines.iter().map(|l| l.subtotal_cents).sum();
  CartSummary {
    cart_id,
    lines,
    total_cents,
  }
}

/// Current cart contents joined with live product/variant display data.
#[instrument(name = "cart_service::get_cart_summary", skip(pool), fields(user_id = %user_id))]
pub async fn get_cart_summary(pool: &PgPool, user_id: Uuid) -> Result<CartSummary> {
  let cart_id = cart_id_by_user(pool, user_id).await?;

  let rows: Vec<SummaryRow> = sqlx::query_as(
    r#"
    SELECT ci.id AS cart_item_id,
           ci.product_id,
           ci.variant_id,
           p.name AS product_name,
           pv.color,
           pv.style,
           pv.image_url,
           pv.price_cents AS variant_price_cents,
           ci.quantity
    FROM cart_items ci
    JOIN products p ON p.id = ci.product_id
    JOIN product_variants pv ON pv.id = ci.variant_id
    WHERE ci.cart_id = $1
    ORDER BY ci.added_at ASC
    "#,
  )
  .bind(cart_id)
  .fetch_all(pool)
  .await?;

  Ok(build_summary(cart_id, rows))
}

fn foreign_key_violation(err: &sqlx::Error) -> bool {
  err
    .as_database_error()
    .and_then(|db| db.code())
    .map(|code| code == "23503")
    .unwrap_or(false)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn row(price_cents: i64, quantity: i32) -> SummaryRow {
    SummaryRow {
      cart_item_id: Uuid::new_v4(),
      product_id: Uuid::new_v4(),
      variant_id: Uuid::new_v4(),
      product_name: "Camisa".into(),
      color: "azul".into(),
      style: "slim".into(),
      image_url: None,
      variant_price_cents: price_cents,
      quantity,
    }
  }

  #[test]
  fn rejects_zero_and_negative_quantities() {
    assert!(validate_quantity(0).is_err());
    assert!(validate_quantity(-3).is_err());
    assert!(validate_quantity(1).is_ok());
  }

  #[test]
  fn summary_totals_sum_per_line_subtotals() {
    let cart_id = Uuid::new_v4();
    let summary = build_summary(cart_id, vec![row(1000, 2), row(2500, 1)]);
    assert_eq!(summary.lines.len(), 2);
    assert_eq!(summary.lines[0].subtotal_cents, 2000);
    assert_eq!(summary.lines[1].subtotal_cents, 2500);
    assert_eq!(summary.total_cents, 4500);
    assert_eq!(summary.cart_id, cart_id);
  }

  #[test]
  fn empty_cart_summarizes_to_zero() {
    let summary = build_summary(Uuid::new_v4(), vec![]);
    assert!(summary.lines.is_empty());
    assert_eq!(summary.total_cents, 0);
  }
}
