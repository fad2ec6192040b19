//! In-app notifications: user-scoped or global, read via a fixed-size
//! most-recent-first feed. Inserts triggered by checkout and security events
//! are best-effort; callers log failures and move on.

use crate::errors::{AppError, Result};
use crate::models::{Notification, NotificationKind};
use sqlx::PgPool;
use tracing::{info, instrument};
use uuid::Uuid;

/// Fixed feed size. A product decision, not configuration.
pub const FEED_LIMIT: i64 = 10;

const NOTIFICATION_COLUMNS: &str = "id, user_id, title, message, is_global, kind, is_read, created_at";

pub async fn notify_user(
  pool: &PgPool,
  user_id: Uuid,
  kind: NotificationKind,
  title: &str,
  message: &str,
) -> Result<Notification> {
  let notification: Notification = sqlx::query_as(&format!(
    r#"
    INSERT INTO notifications (id, user_id, title, message, is_global, kind, is_read, created_at)
    VALUES ($1, $2, $3, $4, FALSE, $5, FALSE, NOW())
    RETURNING {}
    "#,
    NOTIFICATION_COLUMNS
  ))
  .bind(Uuid::new_v4())
  .bind(user_id)
  .bind(title)
  .bind(message)
  .bind(kind)
  .fetch_one(pool)
  .await?;
  Ok(notification)
}

pub async fn notify_all(pool: &PgPool, kind: NotificationKind, title: &str, message: &str) -> Result<Notification> {
  let notification: Notification = sqlx::query_as(&format!(
    r#"
    INSERT INTO notifications (id, user_id, title, message, is_global, kind, is_read, created_at)
    VALUES ($1, NULL, $2, $3, TRUE, $4, FALSE, NOW())
    RETURNING {}
    "#,
    NOTIFICATION_COLUMNS
  ))
  .bind(Uuid::new_v4())
  .bind(title)
  .bind(message)
  .bind(kind)
  .fetch_one(pool)
  .await?;
  Ok(notification)
}

/// The 10 most-recent rows visible to the user: their own plus globals.
#[instrument(name = "notification_service::fetch_notifications", skip(pool), fields(user_id = %user_id))]
pub async fn fetch_notifications(pool: &PgPool, user_id: Uuid) -> Result<Vec<Notification>> {
  let notifications: Vec<Notification> = sqlx::query_as(&format!(
    r#"
    SELECT {}
    FROM notifications
    WHERE is_global = TRUE OR user_id = $1
    ORDER BY created_at DESC
    LIMIT $2
    "#,
    NOTIFICATION_COLUMNS
  ))
  .bind(user_id)
  .bind(FEED_LIMIT)
  .fetch_all(pool)
  .await?;
  Ok(notifications)
}

#[instrument(name = "notification_service::remove_notification", skip(pool), fields(notification_id = %notification_id))]
pub async fn remove_notification(pool: &PgPool, notification_id: Uuid) -> Result<()> {
  let result = sqlx::query("DELETE FROM notifications WHERE id = $1")
    .bind(notification_id)
    .execute(pool)
    .await?;

  if result.rows_affected() == 0 {
    return Err(AppError::NotFound(format!(
      "Notification {} not found or already deleted.",
      notification_id
    )));
  }
  Ok(())
}

/// Marks every notification owned by the user as read. Global rows have no
/// owning user and are deliberately left untouched.
#[instrument(name = "notification_service::mark_all_read", skip(pool), fields(user_id = %user_id))]
pub async fn mark_all_read(pool: &PgPool, user_id: Uuid) -> Result<u64> {
  let result = sqlx::query("UPDATE notifications SET is_read = TRUE WHERE user_id = $1")
    .bind(user_id)
    .execute(pool)
    .await?;

  info!("Marked {} notification(s) read for user {}.", result.rows_affected(), user_id);
  Ok(result.rows_affected())
}
