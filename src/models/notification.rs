use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "notification_kind_enum", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
  OrderConfirmation,
  SecurityAlert,
  Announcement,
}

/// Either user-scoped (`user_id = Some`) or global (`is_global`, no owner).
/// Global rows are visible to everyone and are never marked read per-user.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Notification {
  pub id: Uuid,
  pub user_id: Option<Uuid>,
  pub title: String,
  pub message: String,
  pub is_global: bool,
  pub kind: NotificationKind,
  pub is_read: bool,
  pub created_at: DateTime<Utc>,
}
