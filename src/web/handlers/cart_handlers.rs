use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::services::cart_service;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

#[derive(Deserialize, Debug)]
pub struct AddToCartPayload {
  pub product_id: Uuid,
  pub variant_id: Uuid,
  pub quantity: i32,
}

#[instrument(
    name = "handler::add_to_cart",
    skip(app_state, payload, auth_user),
    fields(user_id = %auth_user.user_id, product_id = %payload.product_id, quantity = %payload.quantity)
)]
pub async fn add_to_cart_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<AddToCartPayload>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let item = cart_service::add_to_cart(
    &app_state.db_pool,
    auth_user.cart_id,
    payload.product_id,
    payload.variant_id,
    payload.quantity,
  )
  .await?;

  info!("Cart line {} now at quantity {}.", item.id, item.quantity);
  Ok(HttpResponse::Ok().json(json!({
      "message": "Item added to cart successfully.",
      "cartItem": item
  })))
}

#[derive(Deserialize, Debug)]
pub struct UpdateCartItemPayload {
  pub quantity: i32,
}

#[instrument(name = "handler::update_cart_item", skip(app_state, payload, _auth_user), fields(cart_item_id = %path))]
pub async fn update_cart_item_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  payload: web::Json<UpdateCartItemPayload>,
  _auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let item = cart_service::update_cart_item(&app_state.db_pool, path.into_inner(), payload.quantity).await?;
  Ok(HttpResponse::Ok().json(json!({
      "message": "Cart item updated.",
      "cartItem": item
  })))
}

#[derive(Deserialize, Debug)]
pub struct RemoveFromCartPayload {
  pub product_id: Uuid,
  pub variant_id: Uuid,
}

#[instrument(name = "handler::remove_from_cart", skip(app_state, payload, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn remove_from_cart_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<RemoveFromCartPayload>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  cart_service::delete_product(&app_state.db_pool, auth_user.cart_id, payload.product_id, payload.variant_id).await?;
  Ok(HttpResponse::Ok().json(json!({"message": "Product removed from cart."})))
}

#[instrument(name = "handler::cart_summary", skip(app_state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn cart_summary_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let summary = cart_service::get_cart_summary(&app_state.db_pool, auth_user.user_id).await?;
  Ok(HttpResponse::Ok().json(summary))
}
