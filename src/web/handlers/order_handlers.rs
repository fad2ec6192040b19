use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::errors::AppError;
use crate::services::order_service;
use crate::state::AppState;
use crate::web::extractors::{AdminUser, AuthenticatedUser};

#[instrument(name = "handler::user_orders", skip(app_state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn user_orders_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let orders = order_service::fetch_user_orders(&app_state.db_pool, auth_user.user_id).await?;
  Ok(HttpResponse::Ok().json(json!({ "orders": orders })))
}

#[instrument(name = "handler::all_orders", skip(app_state, admin), fields(admin_id = %admin.0.user_id))]
pub async fn all_orders_handler(app_state: web::Data<AppState>, admin: AdminUser) -> Result<HttpResponse, AppError> {
  let orders = order_service::fetch_all_orders(&app_state.db_pool).await?;
  Ok(HttpResponse::Ok().json(json!({ "orders": orders })))
}

#[derive(Deserialize, Debug)]
pub struct UpdateOrderStatusPayload {
  pub order_id: Uuid,
  pub new_status: String,
}

#[instrument(
    name = "handler::update_order_status",
    skip(app_state, payload, admin),
    fields(admin_id = %admin.0.user_id, order_id = %payload.order_id, new_status = %payload.new_status)
)]
pub async fn update_order_status_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<UpdateOrderStatusPayload>,
  admin: AdminUser,
) -> Result<HttpResponse, AppError> {
  order_service::update_order_status(&app_state.db_pool, payload.order_id, &payload.new_status, admin.0.user_id)
    .await?;
  Ok(HttpResponse::Ok().json(json!({"message": "Order status updated."})))
}
