//! Product reviews: creation, paginated listing, deletion by the author or
//! an admin, and the per-product rating aggregate.

use crate::errors::{AppError, Result};
use crate::models::Review;
use crate::services::paging::PageParams;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use tracing::{info, instrument};
use uuid::Uuid;

pub fn validate_rating(rating: i16) -> Result<()> {
  if !(1..=5).contains(&rating) {
    return Err(AppError::Validation("Rating must be between 1 and 5.".to_string()));
  }
  Ok(())
}

#[instrument(name = "review_service::add_review", skip(pool, comment), fields(product_id = %product_id, user_id = %user_id))]
pub async fn add_review(
  pool: &PgPool,
  product_id: Uuid,
  user_id: Uuid,
  rating: i16,
  comment: Option<&str>,
) -> Result<Review> {
  validate_rating(rating)?;

  let review: Review = sqlx::query_as(
    r#"
    INSERT INTO reviews (id, product_id, user_id, rating, comment, created_at)
    VALUES ($1, $2, $3, $4, $5, NOW())
    RETURNING id, product_id, user_id, rating, comment, created_at
    "#,
  )
  .bind(Uuid::new_v4())
  .bind(product_id)
  .bind(user_id)
  .bind(rating)
  .bind(comment)
  .fetch_one(pool)
  .await
  .map_err(|e| match foreign_key_violation(&e) {
    true => AppError::NotFound(format!("Product {} not found.", product_id)),
    false => AppError::Sqlx(e),
  })?;

  info!("Review {} created on product {}.", review.id, product_id);
  Ok(review)
}

/// Review joined with the author's display name for listing.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ReviewWithAuthor {
  pub id: Uuid,
  pub product_id: Uuid,
  pub user_id: Uuid,
  pub author_name: String,
  pub rating: i16,
  pub comment: Option<String>,
  pub created_at: chrono::DateTime<chrono::Utc>,
}

pub async fn list_reviews(pool: &PgPool, product_id: Uuid, params: PageParams) -> Result<(Vec<ReviewWithAuthor>, i64)> {
  let reviews: Vec<ReviewWithAuthor> = sqlx::query_as(
    r#"
    SELECT r.id, r.product_id, r.user_id, u.name AS author_name, r.rating, r.comment, r.created_at
    FROM reviews r
    JOIN users u ON u.id = r.user_id
    WHERE r.product_id = $1
    ORDER BY r.created_at DESC
    LIMIT $2 OFFSET $3
    "#,
  )
  .bind(product_id)
  .bind(params.limit)
  .bind(params.offset())
  .fetch_all(pool)
  .await?;

  let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reviews WHERE product_id = $1")
    .bind(product_id)
    .fetch_one(pool)
    .await?;

  Ok((reviews, total))
}

/// The author may delete their own review; admins may delete any.
#[instrument(name = "review_service::delete_review", skip(pool), fields(review_id = %review_id, user_id = %user_id))]
pub async fn delete_review(pool: &PgPool, review_id: Uuid, user_id: Uuid, is_admin: bool) -> Result<()> {
  let owner: Option<Uuid> = sqlx::query_scalar("SELECT user_id FROM reviews WHERE id = $1")
    .bind(review_id)
    .fetch_optional(pool)
    .await?;
  let owner = owner.ok_or_else(|| AppError::NotFound(format!("Review {} not found.", review_id)))?;

  if owner != user_id && !is_admin {
    return Err(AppError::Forbidden("Not allowed to delete this review.".to_string()));
  }

  sqlx::query("DELETE FROM reviews WHERE id = $1")
    .bind(review_id)
    .execute(pool)
    .await?;

  info!("Review {} deleted by {} ({}).", review_id, user_id, if is_admin { "admin" } else { "author" });
  Ok(())
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RatingStats {
  pub average_rating: Option<f64>,
  pub total_reviews: i64,
}

pub async fn average_rating(pool: &PgPool, product_id: Uuid) -> Result<RatingStats> {
  let stats: RatingStats = sqlx::query_as(
    "SELECT AVG(rating)::float8 AS average_rating, COUNT(*) AS total_reviews FROM reviews WHERE product_id = $1",
  )
  .bind(product_id)
  .fetch_one(pool)
  .await?;
  Ok(stats)
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

  #[test]
  fn rating_bounds_are_inclusive() {
    assert!(validate_rating(1).is_ok());
    assert!(validate_rating(5).is_ok());
    assert!(validate_rating(0).is_err());
    assert!(validate_rating(6).is_err());
  }
}
