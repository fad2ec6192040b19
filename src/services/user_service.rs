//! User accounts: registration (with cart provisioning), lookups, the admin
//! listing/maintenance operations and dashboard stats.

use crate::config::AppConfig;
use crate::errors::{AppError, Result};
use crate::models::{User, UserRole};
use crate::services::auth_service;
use crate::services::paging::PageParams;
use serde::Serialize;
use sqlx::PgPool;
use tracing::{info, instrument};
use uuid::Uuid;

const USER_COLUMNS: &str = "id, name, email, phone, password_hash, role, created_at, updated_at";

/// Creates the user and their cart in one transaction. The login token
/// carries the cart id, so the cart must exist from registration onward.
#[instrument(name = "user_service::create_user", skip(pool, config, password), fields(email = %email))]
pub async fn create_user(
  pool: &PgPool,
  config: &AppConfig,
  name: &str,
  email: &str,
  phone: Option<&str>,
  password: &str,
) -> Result<User> {
  if name.trim().is_empty() || email.trim().is_empty() {
    return Err(AppError::Validation("Name and email are required.".to_string()));
  }
  let password_hash = auth_service::hash_password(password)?;
  let role = if email.eq_ignore_ascii_case(&config.admin_email) {
    UserRole::Admin
  } else {
    UserRole::User
  };

  let mut tx = pool.begin().await?;

  let user: User = sqlx::query_as(&format!(
    r#"
    INSERT INTO users (id, name, email, phone, password_hash, role, created_at, updated_at)
    VALUES ($1, $2, $3, $4, $5, $6, NOW(), NOW())
    RETURNING {}
    "#,
    USER_COLUMNS
  ))
  .bind(Uuid::new_v4())
  .bind(name.trim())
  .bind(email.trim())
  .bind(phone)
  .bind(&password_hash)
  .bind(role)
  .fetch_one(&mut *tx)
  .await
  .map_err(|e| match unique_violation(&e) {
    true => AppError::Conflict("Email is already registered.".to_string()),
    false => AppError::Sqlx(e),
  })?;

  sqlx::query("INSERT INTO carts (id, user_id, created_at) VALUES ($1, $2, NOW())")
    .bind(Uuid::new_v4())
    .bind(user.id)
    .execute(&mut *tx)
    .await?;

  tx.commit().await?;

  info!("User {} registered with role {:?}.", user.id, user.role);
  Ok(user)
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>> {
  let user: Option<User> = sqlx::query_as(&format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS))
    .bind(email)
    .fetch_optional(pool)
    .await?;
  Ok(user)
}

pub async fn find_by_id(pool: &PgPool, user_id: Uuid) -> Result<User> {
  let user: Option<User> = sqlx::query_as(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
  user.ok_or_else(|| AppError::NotFound(format!("User {} not found.", user_id)))
}

/// Verifies the current password before storing the new hash. The caller
/// dispatches the security alert after this returns.
#[instrument(name = "user_service::change_password", skip(pool, current_password, new_password), fields(user_id = %user_id))]
pub async fn change_password(pool: &PgPool, user_id: Uuid, current_password: &str, new_password: &str) -> Result<()> {
  let user = find_by_id(pool, user_id).await?;
  if !auth_service::verify_password(&user.password_hash, current_password)? {
    return Err(AppError::Auth("Current password is incorrect.".to_string()));
  }

  let new_hash = auth_service::hash_password(new_password)?;
  sqlx::query("UPDATE users SET password_hash = $1, updated_at = NOW() WHERE id = $2")
    .bind(&new_hash)
    .bind(user_id)
    .execute(pool)
    .await?;

  info!("Password changed for user {}.", user_id);
  Ok(())
}

pub async fn list_users(pool: &PgPool, params: PageParams) -> Result<(Vec<User>, i64)> {
  let users: Vec<User> = sqlx::query_as(&format!(
    "SELECT {} FROM users ORDER BY created_at DESC LIMIT $1 OFFSET $2",
    USER_COLUMNS
  ))
  .bind(params.limit)
  .bind(params.offset())
  .fetch_all(pool)
  .await?;

  let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users").fetch_one(pool).await?;
  Ok((users, total))
}

pub async fn update_user(pool: &PgPool, user_id: Uuid, name: &str, email: &str, phone: Option<&str>) -> Result<()> {
  if name.trim().is_empty() || email.trim().is_empty() {
    return Err(AppError::Validation("Name and email are required.".to_string()));
  }

  let result = sqlx::query("UPDATE users SET name = $1, email = $2, phone = $3, updated_at = NOW() WHERE id = $4")
    .bind(name.trim())
    .bind(email.trim())
    .bind(phone)
    .bind(user_id)
    .execute(pool)
    .await
    .map_err(|e| match unique_violation(&e) {
      true => AppError::Conflict("Email is already registered.".to_string()),
      false => AppError::Sqlx(e),
    })?;

  if result.rows_affected() == 0 {
    return Err(AppError::NotFound(format!("User {} not found.", user_id)));
  }
  Ok(())
}

pub async fn delete_user(pool: &PgPool, user_id: Uuid) -> Result<()> {
  let result = sqlx::query("DELETE FROM users WHERE id = $1")
    .bind(user_id)
    .execute(pool)
    .await?;

  if result.rows_affected() == 0 {
    return Err(AppError::NotFound(format!("User {} not found.", user_id)));
  }
  info!("User {} deleted.", user_id);
  Ok(())
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
  pub users: i64,
  pub products: i64,
  pub orders: i64,
  pub revenue_cents: i64,
}

pub async fn dashboard_stats(pool: &PgPool) -> Result<DashboardStats> {
  let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users").fetch_one(pool).await?;
  let products: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products").fetch_one(pool).await?;
  let orders: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders").fetch_one(pool).await?;
  let revenue_cents: i64 = sqlx::query_scalar("SELECT COALESCE(SUM(total_cents), 0) FROM orders")
    .fetch_one(pool)
    .await?;

  Ok(DashboardStats {
    users,
    products,
    orders,
    revenue_cents,
  })
}

fn unique_violation(err: &sqlx::Error) -> bool {
  err
    .as_database_error()
    .and_then(|db| db.code())
    .map(|code| code == "23505")
    .unwrap_or(false)
}
