//! Order queries and the admin-only status transition.

use crate::errors::{AppError, Result};
use crate::models::{Order, OrderItem, OrderStatus, OrderWithItems};
use sqlx::PgPool;
use std::collections::HashMap;
use std::str::FromStr;
use tracing::{info, instrument};
use uuid::Uuid;

const ORDER_COLUMNS: &str =
  "id, user_id, address_id, shipping_address, total_cents, status, status_updated_by, created_at, updated_at";

/// Groups item rows under their orders, preserving the order ordering.
pub fn attach_items(orders: Vec<Order>, items: Vec<OrderItem>) -> Vec<OrderWithItems> {
  let mut by_order: HashMap<Uuid, Vec<OrderItem>> = HashMap::new();
  for item in items {
    by_order.entry(item.order_id).or_default().push(item);
  }
  orders
    .into_iter()
    .map(|order| {
      let items = by_order.remove(&order.id).unwrap_or_default();
      OrderWithItems { order, items }
    })
    .collect()
}

async fn items_for_orders(pool: &PgPool, order_ids: &[Uuid]) -> Result<Vec<OrderItem>> {
  if order_ids.is_empty() {
    return Ok(Vec::new());
  }
  let items: Vec<OrderItem> = sqlx::query_as(
    r#"
    SELECT id, order_id, product_id, variant_id, product_name, variant_price_cents, color, style, quantity
    FROM order_items
    WHERE order_id = ANY($1)
    "#,
  )
  .bind(order_ids)
  .fetch_all(pool)
  .await?;
  Ok(items)
}

/// Orders owned by the user, newest first, with their snapshot lines.
#[instrument(name = "order_service::fetch_user_orders", skip(pool), fields(user_id = %user_id))]
pub async fn fetch_user_orders(pool: &PgPool, user_id: Uuid) -> Result<Vec<OrderWithItems>> {
  let orders: Vec<Order> = sqlx::query_as(&format!(
    "SELECT {} FROM orders WHERE user_id = $1 ORDER BY created_at DESC",
    ORDER_COLUMNS
  ))
  .bind(user_id)
  .fetch_all(pool)
  .await?;

  let ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
  let items = items_for_orders(pool, &ids).await?;
  Ok(attach_items(orders, items))
}

/// All orders across users, newest first. Admin-only at the web layer.
#[instrument(name = "order_service::fetch_all_orders", skip(pool))]
pub async fn fetch_all_orders(pool: &PgPool) -> Result<Vec<OrderWithItems>> {
  let orders: Vec<Order> = sqlx::query_as(&format!(
    "SELECT {} FROM orders ORDER BY created_at DESC",
    ORDER_COLUMNS
  ))
  .fetch_all(pool)
  .await?;

  let ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
  let items = items_for_orders(pool, &ids).await?;
  Ok(attach_items(orders, items))
}

/// Validates the status string against the fixed enumeration before touching
/// the row, and records who made the transition.
#[instrument(name = "order_service::update_order_status", skip(pool), fields(order_id = %order_id, new_status = %new_status))]
pub async fn update_order_status(pool: &PgPool, order_id: Uuid, new_status: &str, acting_admin_id: Uuid) -> Result<()> {
  let status = OrderStatus::from_str(new_status)?;

  let result = sqlx::query("UPDATE orders SET status = $1, status_updated_by = $2, updated_at = NOW() WHERE id = $3")
    .bind(status)
    .bind(acting_admin_id)
    .bind(order_id)
    .execute(pool)
    .await?;

  if result.rows_affected() == 0 {
    return Err(AppError::NotFound(format!("Order {} not found.", order_id)));
  }

  info!("Order {} moved to status '{}' by admin {}.", order_id, status, acting_admin_id);
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::Utc;

  fn order(id: Uuid) -> Order {
    Order {
      id,
      user_id: Uuid::new_v4(),
      address_id: Uuid::new_v4(),
      shipping_address: "Calle 1".into(),
      total_cents: 1000,
      status: OrderStatus::Received,
      status_updated_by: None,
      created_at: Utc::now(),
      updated_at: Utc::now(),
    }
  }

  fn item(order_id: Uuid) -> OrderItem {
    OrderItem {
      id: Uuid::new_v4(),
      order_id,
      product_id: Uuid::new_v4(),
      variant_id: Uuid::new_v4(),
      product_name: "producto".into(),
      variant_price_cents: 500,
      color: "rojo".into(),
      style: "basic".into(),
      quantity: 2,
    }
  }

  #[test]
  fn attach_items_groups_by_order_and_keeps_ordering() {
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
    let orders = vec![order(a), order(b)];
    let items = vec![item(b), item(a), item(a)];

    let combined = attach_items(orders, items);
    assert_eq!(combined.len(), 2);
    assert_eq!(combined[0].order.id, a);
    assert_eq!(combined[0].items.len(), 2);
    assert_eq!(combined[1].order.id, b);
    assert_eq!(combined[1].items.len(), 1);
  }

  #[test]
  fn attach_items_leaves_itemless_orders_empty() {
    let combined = attach_items(vec![order(Uuid::new_v4())], vec![]);
    assert_eq!(combined.len(), 1);
    assert!(combined[0].items.is_empty());
  }
}
