use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::instrument;

use crate::errors::AppError;
use crate::services::address_service::{self, AddressInput};
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

#[instrument(name = "handler::create_address", skip(app_state, payload, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn create_address_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<AddressInput>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let address = address_service::create_address(&app_state.db_pool, auth_user.user_id, &payload).await?;
  Ok(HttpResponse::Created().json(address))
}

#[instrument(name = "handler::list_addresses", skip(app_state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn list_addresses_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let addresses = address_service::list_addresses(&app_state.db_pool, auth_user.user_id).await?;
  Ok(HttpResponse::Ok().json(json!({ "addresses": addresses })))
}
