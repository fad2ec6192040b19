use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::errors::AppError;
use crate::services::paging::{PageInfo, PageParams};
use crate::services::user_service;
use crate::state::AppState;
use crate::web::extractors::AdminUser;

#[derive(Deserialize, Debug)]
pub struct ListUsersQuery {
  pub page: Option<i64>,
  pub limit: Option<i64>,
}

#[instrument(name = "handler::list_users", skip(app_state, query, admin), fields(admin_id = %admin.0.user_id))]
pub async fn list_users_handler(
  app_state: web::Data<AppState>,
  query: web::Query<ListUsersQuery>,
  admin: AdminUser,
) -> Result<HttpResponse, AppError> {
  let params = PageParams::clamped(query.page, query.limit);
  let (users, total) = user_service::list_users(&app_state.db_pool, params).await?;
  Ok(HttpResponse::Ok().json(json!({
      "users": users,
      "pagination": PageInfo::new(params, total)
  })))
}

#[derive(Deserialize, Debug)]
pub struct UpdateUserPayload {
  pub name: String,
  pub email: String,
  pub phone: Option<String>,
}

#[instrument(name = "handler::update_user", skip(app_state, payload, admin), fields(admin_id = %admin.0.user_id, user_id = %path))]
pub async fn update_user_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  payload: web::Json<UpdateUserPayload>,
  admin: AdminUser,
) -> Result<HttpResponse, AppError> {
  user_service::update_user(
    &app_state.db_pool,
    path.into_inner(),
    &payload.name,
    &payload.email,
    payload.phone.as_deref(),
  )
  .await?;
  Ok(HttpResponse::Ok().json(json!({"message": "User updated successfully."})))
}

#[instrument(name = "handler::delete_user", skip(app_state, admin), fields(admin_id = %admin.0.user_id, user_id = %path))]
pub async fn delete_user_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  admin: AdminUser,
) -> Result<HttpResponse, AppError> {
  user_service::delete_user(&app_state.db_pool, path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(json!({"message": "User deleted successfully."})))
}

#[instrument(name = "handler::dashboard_stats", skip(app_state, admin), fields(admin_id = %admin.0.user_id))]
pub async fn dashboard_stats_handler(
  app_state: web::Data<AppState>,
  admin: AdminUser,
) -> Result<HttpResponse, AppError> {
  let stats = user_service::dashboard_stats(&app_state.db_pool).await?;
  Ok(HttpResponse::Ok().json(stats))
}
