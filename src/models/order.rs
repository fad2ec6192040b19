use crate::errors::AppError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type as SqlxType};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, SqlxType)]
#[sqlx(type_name = "order_status_enum", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
  Received,
  Processing,
  Shipped,
  Delivered,
  Cancelled,
}

impl OrderStatus {
  pub fn as_str(&self) -> &'static str {
    match self {
      OrderStatus::Received => "received",
      OrderStatus::Processing => "processing",
      OrderStatus::Shipped => "shipped",
      OrderStatus::Delivered => "delivered",
      OrderStatus::Cancelled => "cancelled",
    }
  }
}

impl fmt::Display for OrderStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for OrderStatus {
  type Err = AppError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "received" => Ok(OrderStatus::Received),
      "processing" => Ok(OrderStatus::Processing),
      "shipped" => Ok(OrderStatus::Shipped),
      "delivered" => Ok(OrderStatus::Delivered),
      "cancelled" => Ok(OrderStatus::Cancelled),
      other => Err(AppError::Validation(format!("Unrecognized order status '{}'.", other))),
    }
  }
}

/// Immutable after creation except for `status`. Item rows and the shipping
/// address are denormalized snapshots taken at checkout time; they are never
/// re-derived from the live catalog or address book.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Order {
  pub id: Uuid,
  pub user_id: Uuid,
  pub address_id: Uuid,
  // Rendered copy of the address, kept so historical receipts survive later
  // edits or deletion of the address row.
  pub shipping_address: String,
  pub total_cents: i64,
  pub status: OrderStatus,
  pub status_updated_by: Option<Uuid>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Order joined with its snapshot lines, the shape returned to clients.
#[derive(Debug, Clone, Serialize)]
pub struct OrderWithItems {
  #[serde(flatten)]
  pub order: Order,
  pub items: Vec<crate::models::OrderItem>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_every_known_status() {
    for s in ["received", "processing", "shipped", "delivered", "cancelled"] {
      let status = OrderStatus::from_str(s).unwrap();
      assert_eq!(status.as_str(), s);
    }
  }

  #[test]
  fn rejects_unknown_status() {
    let err = OrderStatus::from_str("refunded").unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
  }

  #[test]
  fn rejects_wrong_case() {
    // The enumeration is exact; "Shipped" is not a valid wire value.
    assert!(OrderStatus::from_str("Shipped").is_err());
  }
}
