//! User address book. Orders keep their own rendered copy of the address, so
//! rows here can be edited or removed without breaking old receipts.

use crate::errors::{AppError, Result};
use crate::models::Address;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

const ADDRESS_COLUMNS: &str = "id, user_id, recipient, line1, line2, city, postal_code, phone, created_at";

#[derive(Debug, Clone, Deserialize)]
pub struct AddressInput {
  pub recipient: String,
  pub line1: String,
  pub line2: Option<String>,
  pub city: String,
  pub postal_code: String,
  pub phone: Option<String>,
}

pub async fn create_address(pool: &PgPool, user_id: Uuid, input: &AddressInput) -> Result<Address> {
  if input.recipient.trim().is_empty() || input.line1.trim().is_empty() || input.city.trim().is_empty() {
    return Err(AppError::Validation("Recipient, line1 and city are required.".to_string()));
  }

  let address: Address = sqlx::query_as(&format!(
    r#"
    INSERT INTO addresses (id, user_id, recipient, line1, line2, city, postal_code, phone, created_at)
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW())
    RETURNING {}
    "#,
    ADDRESS_COLUMNS
  ))
  .bind(Uuid::new_v4())
  .bind(user_id)
  .bind(input.recipient.trim())
  .bind(input.line1.trim())
  .bind(input.line2.as_deref())
  .bind(input.city.trim())
  .bind(input.postal_code.trim())
  .bind(input.phone.as_deref())
  .fetch_one(pool)
  .await?;
  Ok(address)
}

pub async fn list_addresses(pool: &PgPool, user_id: Uuid) -> Result<Vec<Address>> {
  let addresses: Vec<Address> = sqlx::query_as(&format!(
    "SELECT {} FROM addresses WHERE user_id = $1 ORDER BY created_at DESC",
    ADDRESS_COLUMNS
  ))
  .bind(user_id)
  .fetch_all(pool)
  .await?;
  Ok(addresses)
}

pub async fn get_address(pool: &PgPool, address_id: Uuid) -> Result<Address> {
  let address: Option<Address> = sqlx::query_as(&format!("SELECT {} FROM addresses WHERE id = $1", ADDRESS_COLUMNS))
    .bind(address_id)
    .fetch_optional(pool)
    .await?;
  address.ok_or_else(|| AppError::NotFound(format!("Address {} not found.", address_id)))
}
