use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{NotificationKind, OrderWithItems};
use crate::services::{checkout_service, email, notification_service, user_service};
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

#[derive(Deserialize, Debug)]
pub struct CheckoutPayload {
  pub address_id: Uuid,
}

#[instrument(
    name = "handler::checkout",
    skip(app_state, payload, auth_user),
    fields(user_id = %auth_user.user_id, address_id = %payload.address_id)
)]
pub async fn checkout_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<CheckoutPayload>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let order = checkout_service::process_checkout(&app_state.db_pool, auth_user.user_id, payload.address_id).await?;

  // The order is committed. Confirmation dispatch is best-effort: log and
  // keep the success response on failure.
  if let Err(e) = dispatch_confirmation(app_state.get_ref(), auth_user.user_id, &order).await {
    warn!("Order confirmation dispatch failed for order {}: {}", order.order.id, e);
  }

  info!("Order {} created for user {}.", order.order.id, auth_user.user_id);
  Ok(HttpResponse::Ok().json(json!({
      "message": "Order created.",
      "order": order
  })))
}

async fn dispatch_confirmation(
  app_state: &AppState,
  user_id: Uuid,
  order: &OrderWithItems,
) -> Result<(), AppError> {
  let user = user_service::find_by_id(&app_state.db_pool, user_id).await?;

  notification_service::notify_user(
    &app_state.db_pool,
    user.id,
    NotificationKind::OrderConfirmation,
    "Order received",
    &format!("Your order #{} has been received.", order.order.id),
  )
  .await?;

  email::send_purchase_confirmation(&app_state.config.email_sender, &user.email, &user.name, order).await?;
  Ok(())
}
