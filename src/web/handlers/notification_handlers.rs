use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::errors::AppError;
use crate::services::notification_service;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

#[instrument(name = "handler::notifications", skip(app_state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn list_notifications_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let user_id = path.into_inner();
  if user_id != auth_user.user_id {
    return Err(AppError::Forbidden("Not allowed to view these notifications.".to_string()));
  }

  let notifications = notification_service::fetch_notifications(&app_state.db_pool, user_id).await?;
  Ok(HttpResponse::Ok().json(notifications))
}

#[instrument(name = "handler::delete_notification", skip(app_state, _auth_user), fields(notification_id = %path))]
pub async fn delete_notification_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  _auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  notification_service::remove_notification(&app_state.db_pool, path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(json!({"message": "Notification deleted."})))
}

#[instrument(name = "handler::mark_notifications_read", skip(app_state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn mark_notifications_read_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let user_id = path.into_inner();
  if user_id != auth_user.user_id {
    return Err(AppError::Forbidden(
      "Not allowed to modify these notifications.".to_string(),
    ));
  }

  let updated = notification_service::mark_all_read(&app_state.db_pool, user_id).await?;
  Ok(HttpResponse::Ok().json(json!({"success": true, "updated": updated})))
}
