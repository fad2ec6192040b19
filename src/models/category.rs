use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Category {
  pub id: Uuid,
  pub code: String,
  pub name: String,
  pub image_url: Option<String>,
  pub created_at: DateTime<Utc>,
}
