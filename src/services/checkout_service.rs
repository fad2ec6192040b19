//! Converts a cart into an immutable order. The whole conversion runs inside
//! one transaction with the cart row locked, so two concurrent checkouts for
//! the same cart cannot both observe the pre-clear lines: the second waits on
//! the lock, then finds the cart empty.

use crate::errors::{AppError, Result};
use crate::models::{Address, Order, OrderItem, OrderStatus, OrderWithItems};
use sqlx::{FromRow, PgPool};
use tracing::{info, instrument};
use uuid::Uuid;

/// One cart line as read at checkout time, carrying everything that gets
/// frozen into the order_items snapshot.
#[derive(Debug, Clone, FromRow)]
pub struct CheckoutLine {
  pub product_id: Uuid,
  pub variant_id: Uuid,
  pub product_name: String,
  pub variant_price_cents: i64,
  pub color: String,
  pub style: String,
  pub quantity: i32,
}

/// Sum of `variant_price * quantity` across all lines. Computed once at
/// checkout and stored on the order, never recomputed on read.
pub fn compute_order_total(lines: &[CheckoutLine]) -> i64 {
  lines
    .iter()
    .map(|l| l.variant_price_cents * i64::from(l.quantity))
    .sum()
}

#[instrument(name = "checkout_service::process_checkout", skip(pool), fields(user_id = %user_id, address_id = %address_id))]
pub async fn process_checkout(pool: &PgPool, user_id: Uuid, address_id: Uuid) -> Result<OrderWithItems> {
  let mut tx = pool.begin().await?;

  // Lock the cart row for the duration of the conversion. Everything below
  // either commits as a unit or rolls back when the transaction drops.
  let cart_id: Option<Uuid> = sqlx::query_scalar("SELECT id FROM carts WHERE user_id = $1 FOR UPDATE")
    .bind(user_id)
    .fetch_optional(&mut *tx)
    .await?;
  let cart_id = cart_id.ok_or_else(|| AppError::NotFound(format!("No cart found for user {}.", user_id)))?;

  let lines: Vec<CheckoutLine> = sqlx::query_as(
    r#"
    SELECT ci.product_id,
           ci.variant_id,
           p.name AS product_name,
           pv.price_cents AS variant_price_cents,
           pv.color,
           pv.style,
           ci.quantity
    FROM cart_items ci
    JOIN products p ON p.id = ci.product_id
    JOIN product_variants pv ON pv.id = ci.variant_id
    WHERE ci.cart_id = $1
    ORDER BY ci.added_at ASC
    "#,
  )
  .bind(cart_id)
  .fetch_all(&mut *tx)
  .await?;

  // Zero-item orders are never created.
  if lines.is_empty() {
    return Err(AppError::EmptyCart);
  }

  // Ownership is validated before any mutation.
  let address: Option<Address> = sqlx::query_as(
    "SELECT id, user_id, recipient, line1, line2, city, postal_code, phone, created_at FROM addresses WHERE id = $1",
  )
  .bind(address_id)
  .fetch_optional(&mut *tx)
  .await?;
  let address = address.ok_or_else(|| AppError::NotFound(format!("Address {} not found.", address_id)))?;
  if address.user_id != user_id {
    return Err(AppError::Forbidden(
      "Address does not belong to the authenticated user.".to_string(),
    ));
  }

  let total_cents = compute_order_total(&lines);

  let order: Order = sqlx::query_as(
    r#"
    INSERT INTO orders (id, user_id, address_id, shipping_address, total_cents, status, created_at, updated_at)
    VALUES ($1, $2, $3, $4, $5, $6, NOW(), NOW())
    RETURNING id, user_id, address_id, shipping_address, total_cents, status, status_updated_by, created_at, updated_at
    "#,
  )
  .bind(Uuid::new_v4())
  .bind(user_id)
  .bind(address_id)
  .bind(address.render())
  .bind(total_cents)
  .bind(OrderStatus::Received)
  .fetch_one(&mut *tx)
  .await?;

  let mut items = Vec::with_capacity(lines.len());
  for line in &lines {
    let item: OrderItem = sqlx::query_as(
      r#"
      INSERT INTO order_items (id, order_id, product_id, variant_id, product_name, variant_price_cents, color, style, quantity)
      VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
      RETURNING id, order_id, product_id, variant_id, product_name, variant_price_cents, color, style, quantity
      "#,
    )
    .bind(Uuid::new_v4())
    .bind(order.id)
    .bind(line.product_id)
    .bind(line.variant_id)
    .bind(&line.product_name)
    .bind(line.variant_price_cents)
    .bind(&line.color)
    .bind(&line.style)
    .bind(line.quantity)
    .fetch_one(&mut *tx)
    .await?;
    items.push(item);
  }

  // The cart row itself survives for reuse; only its lines go.
  sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
    .bind(cart_id)
    .execute(&mut *tx)
    .await?;

  tx.commit().await?;

  info!(
    "Checkout complete for user {}: order {} with {} line(s), total {} cents.",
    user_id,
    order.id,
    items.len(),
    total_cents
  );
  Ok(OrderWithItems { order, items })
}

#[cfg(test)]
mod tests {
  use super::*;

  fn line(price_cents: i64, quantity: i32) -> CheckoutLine {
    CheckoutLine {
      product_id: Uuid::new_v4(),
      variant_id: Uuid::new_v4(),
      product_name: "producto".into(),
      variant_price_cents: price_cents,
      color: "negro".into(),
      style: "classic".into(),
      quantity,
    }
  }

  #[test]
  fn total_matches_the_two_line_reference_scenario() {
    // (qty 2 at $10.00) + (qty 1 at $25.00) = $45.00
    let lines = vec![line(1000, 2), line(2500, 1)];
    assert_eq!(compute_order_total(&lines), 4500);
  }

  #[test]
  fn total_of_no_lines_is_zero() {
    assert_eq!(compute_order_total(&[]), 0);
  }

  #[test]
  fn total_does_not_overflow_i32_ranges() {
    // Large but realistic: 50_000 units at $90,000.00 each.
    let lines = vec![line(9_000_000, 50_000)];
    assert_eq!(compute_order_total(&lines), 450_000_000_000);
  }
}
