use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Address {
  pub id: Uuid,
  pub user_id: Uuid,
  pub recipient: String,
  pub line1: String,
  pub line2: Option<String>,
  pub city: String,
  pub postal_code: String,
  pub phone: Option<String>,
  pub created_at: DateTime<Utc>,
}

impl Address {
  /// Single-line rendering stored on orders so receipts stay printable even
  /// if this row is later edited or deleted.
  pub fn render(&self) -> String {
    let mut parts = vec![self.recipient.clone(), self.line1.clone()];
    if let Some(line2) = &self.line2 {
      if !line2.is_empty() {
        parts.push(line2.clone());
      }
    }
    parts.push(format!("{} {}", self.postal_code, self.city));
    if let Some(phone) = &self.phone {
      if !phone.is_empty() {
        parts.push(format!("tel. {}", phone));
      }
    }
    parts.join(", ")
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::Utc;
  use uuid::Uuid;

  fn sample() -> Address {
    Address {
      id: Uuid::new_v4(),
      user_id: Uuid::new_v4(),
      recipient: "Ana Torres".into(),
      line1: "Av. Central 123".into(),
      line2: None,
      city: "Lima".into(),
      postal_code: "15001".into(),
      phone: Some("999111222".into()),
      created_at: Utc::now(),
    }
  }

  #[test]
  fn renders_without_optional_line2() {
    let rendered = sample().render();
    assert_eq!(rendered, "Ana Torres, Av. Central 123, 15001 Lima, tel. 999111222");
  }

  #[test]
  fn renders_with_line2_and_no_phone() {
    let mut addr = sample();
    addr.line2 = Some("Dpto 4B".into());
    addr.phone = None;
    assert_eq!(addr.render(), "Ana Torres, Av. Central 123, Dpto 4B, 15001 Lima");
  }
}
