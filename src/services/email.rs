//! Outbound email. This is a mock transport that logs instead of talking to
//! an SMTP relay; the rendering and the dispatch contract are real. Dispatch
//! failures are surfaced as `AppError::Email` and swallowed at call sites,
//! they never roll back the operation that triggered them.

use crate::errors::{AppError, Result};
use crate::models::OrderWithItems;
use tracing::info;

#[derive(Debug)]
pub struct SentEmailInfo {
  pub to: String,
  pub from: String,
  pub subject: String,
  pub message_id: String,
}

pub async fn send_email(to: &str, from: &str, subject: &str, html_body: &str) -> Result<SentEmailInfo> {
  info!(
    "Sending email: To='{}', From='{}', Subject='{}' ({} bytes)",
    to,
    from,
    subject,
    html_body.len()
  );
  tokio::time::sleep(std::time::Duration::from_millis(20)).await; // Simulate network latency

  if to.is_empty() {
    return Err(AppError::Email("Recipient address is empty.".to_string()));
  }

  let message_id = format!("email_{}", uuid::Uuid::new_v4());
  info!("Email sent. Message ID: {}", message_id);

  Ok(SentEmailInfo {
    to: to.to_string(),
    from: from.to_string(),
    subject: subject.to_string(),
    message_id,
  })
}

/// "$45.00" style rendering of an integer cent amount.
pub fn format_cents(cents: i64) -> String {
  format!("${}.{:02}", cents / 100, (cents % 100).abs())
}

/// Renders the purchase-confirmation message for an order snapshot.
/// Returns (subject, html body).
pub fn render_purchase_confirmation(recipient_name: &str, order: &OrderWithItems) -> (String, String) {
  let subject = format!("Your order #{} is confirmed!", order.order.id);

  let mut body = String::new();
  body.push_str(&format!("<p>Hi {},</p>", recipient_name));
  body.push_str(&format!(
    "<p>Thanks for your purchase! Order <strong>#{}</strong> has been received.</p>",
    order.order.id
  ));
  body.push_str("<ul>");
  for item in &order.items {
    let subtotal = item.variant_price_cents * i64::from(item.quantity);
    body.push_str(&format!(
      "<li>{} ({}, {}) x{} @ {} = {}</li>",
      item.product_name,
      item.color,
      item.style,
      item.quantity,
      format_cents(item.variant_price_cents),
      format_cents(subtotal)
    ));
  }
  body.push_str("</ul>");
  body.push_str(&format!("<p>Total: <strong>{}</strong></p>", format_cents(order.order.total_cents)));
  body.push_str(&format!("<p>Shipping to: {}</p>", order.order.shipping_address));

  (subject, body)
}

pub async fn send_purchase_confirmation(
  sender: &str,
  recipient_email: &str,
  recipient_name: &str,
  order: &OrderWithItems,
) -> Result<SentEmailInfo> {
  let (subject, body) = render_purchase_confirmation(recipient_name, order);
  send_email(recipient_email, sender, &subject, &body).await
}

pub async fn send_security_alert(sender: &str, recipient_email: &str, detail: &str) -> Result<SentEmailInfo> {
  let body = format!(
    "<p>A security-relevant change just happened on your account: {}.</p>\
     <p>If this wasn't you, contact support immediately.</p>",
    detail
  );
  send_email(recipient_email, sender, "Security alert on your account", &body).await
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::{Order, OrderItem, OrderStatus};
  use chrono::Utc;
  use uuid::Uuid;

  #[test]
  fn formats_cents_with_two_decimals() {
    assert_eq!(format_cents(4500), "$45.00");
    assert_eq!(format_cents(5), "$0.05");
    assert_eq!(format_cents(120), "$1.20");
  }

  #[test]
  fn confirmation_body_lists_items_and_total() {
    let order_id = Uuid::new_v4();
    let order = OrderWithItems {
      order: Order {
        id: order_id,
        user_id: Uuid::new_v4(),
        address_id: Uuid::new_v4(),
        shipping_address: "Ana, Av. Central 123, 15001 Lima".into(),
        total_cents: 4500,
        status: OrderStatus::Received,
        status_updated_by: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
      },
      items: vec![OrderItem {
        id: Uuid::new_v4(),
        order_id,
        product_id: Uuid::new_v4(),
        variant_id: Uuid::new_v4(),
        product_name: "Camisa".into(),
        variant_price_cents: 1000,
        color: "azul".into(),
        style: "slim".into(),
        quantity: 2,
      }],
    };

    let (subject, body) = render_purchase_confirmation("Ana", &order);
    assert!(subject.contains(&order_id.to_string()));
    assert!(body.contains("Camisa (azul, slim) x2 @ $10.00 = $20.00"));
    assert!(body.contains("Total: <strong>$45.00</strong>"));
    assert!(body.contains("Av. Central 123"));
  }
}
