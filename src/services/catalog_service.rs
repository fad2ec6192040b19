//! Category and product catalog management. Variant prices are the
//! purchasable ones; the product-level price is a display default.

use crate::errors::{AppError, Result};
use crate::models::product::ProductWithVariants;
use crate::models::{Category, Product, ProductVariant};
use crate::services::paging::PageParams;
use serde::Deserialize;
use sqlx::{PgPool, Postgres, Transaction};
use std::collections::HashMap;
use tracing::{info, instrument};
use uuid::Uuid;

const PRODUCT_COLUMNS: &str = "id, category_id, name, description, price_cents, in_stock, created_at, updated_at";
const VARIANT_COLUMNS: &str = "id, product_id, color, style, price_cents, image_url";

// --- Categories ---

pub async fn list_categories(pool: &PgPool) -> Result<Vec<Category>> {
  let categories: Vec<Category> =
    sqlx::query_as("SELECT id, code, name, image_url, created_at FROM categories ORDER BY name ASC")
      .fetch_all(pool)
      .await?;
  Ok(categories)
}

fn validate_category_fields(code: &str, name: &str) -> Result<()> {
  if code.trim().is_empty() {
    return Err(AppError::Validation("Category code is required.".to_string()));
  }
  if name.trim().is_empty() {
    return Err(AppError::Validation("Category name is required.".to_string()));
  }
  Ok(())
}

pub async fn create_category(pool: &PgPool, code: &str, name: &str, image_url: Option<&str>) -> Result<Category> {
  validate_category_fields(code, name)?;

  let category: Category = sqlx::query_as(
    r#"
    INSERT INTO categories (id, code, name, image_url, created_at)
    VALUES ($1, $2, $3, $4, NOW())
    RETURNING id, code, name, image_url, created_at
    "#,
  )
  .bind(Uuid::new_v4())
  .bind(code.trim())
  .bind(name.trim())
  .bind(image_url)
  .fetch_one(pool)
  .await
  .map_err(|e| match unique_violation(&e) {
    true => AppError::Conflict(format!("Category code '{}' already exists.", code.trim())),
    false => AppError::Sqlx(e),
  })?;
  Ok(category)
}

pub async fn update_category(
  pool: &PgPool,
  category_id: Uuid,
  code: &str,
  name: &str,
  image_url: Option<&str>,
) -> Result<()> {
  validate_category_fields(code, name)?;

  let result = sqlx::query("UPDATE categories SET code = $1, name = $2, image_url = $3 WHERE id = $4")
    .bind(code.trim())
    .bind(name.trim())
    .bind(image_url)
    .bind(category_id)
    .execute(pool)
    .await
    .map_err(|e| match unique_violation(&e) {
      true => AppError::Conflict(format!("Category code '{}' already exists.", code.trim())),
      false => AppError::Sqlx(e),
    })?;

  if result.rows_affected() == 0 {
    return Err(AppError::NotFound(format!("Category {} not found.", category_id)));
  }
  Ok(())
}

pub async fn delete_category(pool: &PgPool, category_id: Uuid) -> Result<()> {
  let result = sqlx::query("DELETE FROM categories WHERE id = $1")
    .bind(category_id)
    .execute(pool)
    .await?;

  if result.rows_affected() == 0 {
    return Err(AppError::NotFound(format!("Category {} not found.", category_id)));
  }
  Ok(())
}

// --- Products ---

/// Variant payload for product create/update. A present `id` means "this is
/// an existing variant, keep and update it"; an absent one means "insert".
#[derive(Debug, Clone, Deserialize)]
pub struct VariantInput {
  pub id: Option<Uuid>,
  pub color: String,
  pub style: String,
  pub price_cents: i64,
  pub image_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductInput {
  pub category_id: Uuid,
  pub name: String,
  pub description: Option<String>,
  pub price_cents: i64,
  pub in_stock: bool,
  pub variants: Vec<VariantInput>,
}

fn validate_product_input(input: &ProductInput) -> Result<()> {
  if input.name.trim().is_empty() {
    return Err(AppError::Validation("Product name is required.".to_string()));
  }
  if input.variants.is_empty() {
    return Err(AppError::Validation("At least one variant is required.".to_string()));
  }
  if input.variants.iter().any(|v| v.price_cents < 0) || input.price_cents < 0 {
    return Err(AppError::Validation("Prices cannot be negative.".to_string()));
  }
  Ok(())
}

async fn insert_variant(tx: &mut Transaction<'_, Postgres>, product_id: Uuid, v: &VariantInput) -> Result<()> {
  sqlx::query(
    r#"
    INSERT INTO product_variants (id, product_id, color, style, price_cents, image_url)
    VALUES ($1, $2, $3, $4, $5, $6)
    "#,
  )
  .bind(Uuid::new_v4())
  .bind(product_id)
  .bind(&v.color)
  .bind(&v.style)
  .bind(v.price_cents)
  .bind(v.image_url.as_deref())
  .execute(&mut **tx)
  .await?;
  Ok(())
}

#[instrument(name = "catalog_service::create_product", skip(pool, input), fields(name = %input.name))]
pub async fn create_product(pool: &PgPool, input: &ProductInput) -> Result<ProductWithVariants> {
  validate_product_input(input)?;

  let mut tx = pool.begin().await?;

  let product: Product = sqlx::query_as(&format!(
    r#"
    INSERT INTO products (id, category_id, name, description, price_cents, in_stock, created_at, updated_at)
    VALUES ($1, $2, $3, $4, $5, $6, NOW(), NOW())
    RETURNING {}
    "#,
    PRODUCT_COLUMNS
  ))
  .bind(Uuid::new_v4())
  .bind(input.category_id)
  .bind(input.name.trim())
  .bind(input.description.as_deref())
  .bind(input.price_cents)
  .bind(input.in_stock)
  .fetch_one(&mut *tx)
  .await
  .map_err(|e| match foreign_key_violation(&e) {
    true => AppError::NotFound(format!("Category {} not found.", input.category_id)),
    false => AppError::Sqlx(e),
  })?;

  for v in &input.variants {
    insert_variant(&mut tx, product.id, v).await?;
  }

  let variants: Vec<ProductVariant> = sqlx::query_as(&format!(
    "SELECT {} FROM product_variants WHERE product_id = $1",
    VARIANT_COLUMNS
  ))
  .bind(product.id)
  .fetch_all(&mut *tx)
  .await?;

  tx.commit().await?;

  info!("Product {} created with {} variant(s).", product.id, variants.len());
  Ok(ProductWithVariants { product, variants })
}

/// Attaches each variant batch to its parent product.
pub fn attach_variants(products: Vec<Product>, variants: Vec<ProductVariant>) -> Vec<ProductWithVariants> {
  let mut by_product: HashMap<Uuid, Vec<ProductVariant>> = HashMap::new();
  for variant in variants {
    by_product.entry(variant.product_id).or_default().push(variant);
  }
  products
    .into_iter()
    .map(|product| {
      let variants = by_product.remove(&product.id).unwrap_or_default();
      ProductWithVariants { product, variants }
    })
    .collect()
}

pub async fn list_products(pool: &PgPool, params: PageParams) -> Result<(Vec<ProductWithVariants>, i64)> {
  let products: Vec<Product> = sqlx::query_as(&format!(
    "SELECT {} FROM products ORDER BY name ASC LIMIT $1 OFFSET $2",
    PRODUCT_COLUMNS
  ))
  .bind(params.limit)
  .bind(params.offset())
  .fetch_all(pool)
  .await?;

  let ids: Vec<Uuid> = products.iter().map(|p| p.id).collect();
  let variants: Vec<ProductVariant> = if ids.is_empty() {
    Vec::new()
  } else {
    sqlx::query_as(&format!(
      "SELECT {} FROM product_variants WHERE product_id = ANY($1)",
      VARIANT_COLUMNS
    ))
    .bind(&ids)
    .fetch_all(pool)
    .await?
  };

  let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products").fetch_one(pool).await?;
  Ok((attach_variants(products, variants), total))
}

pub async fn get_product(pool: &PgPool, product_id: Uuid) -> Result<ProductWithVariants> {
  let product: Option<Product> = sqlx::query_as(&format!("SELECT {} FROM products WHERE id = $1", PRODUCT_COLUMNS))
    .bind(product_id)
    .fetch_optional(pool)
    .await?;
  let product = product.ok_or_else(|| AppError::NotFound(format!("Product {} not found.", product_id)))?;

  let variants: Vec<ProductVariant> = sqlx::query_as(&format!(
    "SELECT {} FROM product_variants WHERE product_id = $1",
    VARIANT_COLUMNS
  ))
  .bind(product_id)
  .fetch_all(pool)
  .await?;

  Ok(ProductWithVariants { product, variants })
}

/// Variants present in the database but absent from the incoming update.
pub fn variants_to_delete(current_ids: &[Uuid], incoming: &[VariantInput]) -> Vec<Uuid> {
  current_ids
    .iter()
    .copied()
    .filter(|existing| !incoming.iter().any(|v| v.id == Some(*existing)))
    .collect()
}

/// Updates the product row and reconciles its variants against the incoming
/// set: delete the missing ones, then update the surviving ones, then insert
/// the new ones, strictly in that order, inside one transaction.
#[instrument(name = "catalog_service::update_product", skip(pool, input), fields(product_id = %product_id))]
pub async fn update_product(pool: &PgPool, product_id: Uuid, input: &ProductInput) -> Result<()> {
  validate_product_input(input)?;

  let mut tx = pool.begin().await?;

  let result = sqlx::query(
    r#"
    UPDATE products
    SET category_id = $1, name = $2, description = $3, price_cents = $4, in_stock = $5, updated_at = NOW()
    WHERE id = $6
    "#,
  )
  .bind(input.category_id)
  .bind(input.name.trim())
  .bind(input.description.as_deref())
  .bind(input.price_cents)
  .bind(input.in_stock)
  .bind(product_id)
  .execute(&mut *tx)
  .await?;

  if result.rows_affected() == 0 {
    return Err(AppError::NotFound(format!("Product {} not found.", product_id)));
  }

  let current_ids: Vec<Uuid> = sqlx::query_scalar("SELECT id FROM product_variants WHERE product_id = $1")
    .bind(product_id)
    .fetch_all(&mut *tx)
    .await?;

  let to_delete = variants_to_delete(&current_ids, &input.variants);
  if !to_delete.is_empty() {
    sqlx::query("DELETE FROM product_variants WHERE id = ANY($1)")
      .bind(&to_delete)
      .execute(&mut *tx)
      .await?;
  }

  for v in input.variants.iter().filter(|v| v.id.is_some()) {
    let variant_id = v.id.unwrap();
    let updated = sqlx::query(
      "UPDATE product_variants SET color = $1, style = $2, price_cents = $3, image_url = $4 WHERE id = $5 AND product_id = $6",
    )
    .bind(&v.color)
    .bind(&v.style)
    .bind(v.price_cents)
    .bind(v.image_url.as_deref())
    .bind(variant_id)
    .bind(product_id)
    .execute(&mut *tx)
    .await?;
    if updated.rows_affected() == 0 {
      return Err(AppError::NotFound(format!(
        "Variant {} does not belong to product {}.",
        variant_id, product_id
      )));
    }
  }

  for v in input.variants.iter().filter(|v| v.id.is_none()) {
    insert_variant(&mut tx, product_id, v).await?;
  }

  tx.commit().await?;

  info!("Product {} updated; {} variant(s) removed.", product_id, to_delete.len());
  Ok(())
}

/// Deletes the product; its variants go with it (ON DELETE CASCADE).
pub async fn delete_product(pool: &PgPool, product_id: Uuid) -> Result<()> {
  let result = sqlx::query("DELETE FROM products WHERE id = $1")
    .bind(product_id)
    .execute(pool)
    .await?;

  if result.rows_affected() == 0 {
    return Err(AppError::NotFound(format!("Product {} not found.", product_id)));
  }
  info!("Product {} deleted.", product_id);
  Ok(())
}

fn unique_violation(err: &sqlx::Error) -> bool {
  err
    .as_database_error()
    .and_then(|db| db.code())
    .map(|code| code == "23505")
    .unwrap_or(false)
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

  fn variant(id: Option<Uuid>) -> VariantInput {
    VariantInput {
      id,
      color: "azul".into(),
      style: "slim".into(),
      price_cents: 1000,
      image_url: None,
    }
  }

  #[test]
  fn reconciliation_deletes_only_rows_missing_from_update() {
    let keep = Uuid::new_v4();
    let drop = Uuid::new_v4();
    let incoming = vec![variant(Some(keep)), variant(None)];

    let to_delete = variants_to_delete(&[keep, drop], &incoming);
    assert_eq!(to_delete, vec![drop]);
  }

  #[test]
  fn reconciliation_with_no_incoming_ids_drops_everything() {
    let current = vec![Uuid::new_v4(), Uuid::new_v4()];
    let to_delete = variants_to_delete(&current, &[variant(None)]);
    assert_eq!(to_delete, current);
  }

  #[test]
  fn product_without_variants_is_rejected() {
    let input = ProductInput {
      category_id: Uuid::new_v4(),
      name: "Camisa".into(),
      description: None,
      price_cents: 1000,
      in_stock: true,
      variants: vec![],
    };
    assert!(matches!(validate_product_input(&input), Err(AppError::Validation(_))));
  }

  #[test]
  fn negative_prices_are_rejected() {
    let input = ProductInput {
      category_id: Uuid::new_v4(),
      name: "Camisa".into(),
      description: None,
      price_cents: 1000,
      in_stock: true,
      variants: vec![VariantInput {
        price_cents: -5,
        ..variant(None)
      }],
    };
    assert!(validate_product_input(&input).is_err());
  }
}
