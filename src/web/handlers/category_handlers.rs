use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::errors::AppError;
use crate::services::catalog_service;
use crate::state::AppState;
use crate::web::extractors::AdminUser;

pub async fn list_categories_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let categories = catalog_service::list_categories(&app_state.db_pool).await?;
  Ok(HttpResponse::Ok().json(json!({ "categories": categories })))
}

#[derive(Deserialize, Debug)]
pub struct CategoryPayload {
  pub code: String,
  pub name: String,
  pub image_url: Option<String>,
}

#[instrument(name = "handler::create_category", skip(app_state, payload, admin), fields(admin_id = %admin.0.user_id, code = %payload.code))]
pub async fn create_category_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<CategoryPayload>,
  admin: AdminUser,
) -> Result<HttpResponse, AppError> {
  let category =
    catalog_service::create_category(&app_state.db_pool, &payload.code, &payload.name, payload.image_url.as_deref())
      .await?;
  Ok(HttpResponse::Created().json(category))
}

#[instrument(name = "handler::update_category", skip(app_state, payload, admin), fields(admin_id = %admin.0.user_id, category_id = %path))]
pub async fn update_category_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  payload: web::Json<CategoryPayload>,
  admin: AdminUser,
) -> Result<HttpResponse, AppError> {
  catalog_service::update_category(
    &app_state.db_pool,
    path.into_inner(),
    &payload.code,
    &payload.name,
    payload.image_url.as_deref(),
  )
  .await?;
  Ok(HttpResponse::Ok().json(json!({"message": "Category updated."})))
}

#[instrument(name = "handler::delete_category", skip(app_state, admin), fields(admin_id = %admin.0.user_id, category_id = %path))]
pub async fn delete_category_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  admin: AdminUser,
) -> Result<HttpResponse, AppError> {
  catalog_service::delete_category(&app_state.db_pool, path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(json!({"message": "Category deleted."})))
}
