use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::services::catalog_service::{self, ProductInput};
use crate::services::paging::{PageInfo, PageParams};
use crate::state::AppState;
use crate::web::extractors::AdminUser;

#[derive(Deserialize, Debug)]
pub struct ListProductsQuery {
  pub page: Option<i64>,
  pub limit: Option<i64>,
}

#[instrument(name = "handler::list_products", skip(app_state, query))]
pub async fn list_products_handler(
  app_state: web::Data<AppState>,
  query: web::Query<ListProductsQuery>,
) -> Result<HttpResponse, AppError> {
  let params = PageParams::clamped(query.page, query.limit);
  let (products, total) = catalog_service::list_products(&app_state.db_pool, params).await?;

  info!("Fetched {} product(s) (page {}).", products.len(), params.page);
  Ok(HttpResponse::Ok().json(json!({
      "products": products,
      "pagination": PageInfo::new(params, total)
  })))
}

#[instrument(name = "handler::get_product", skip(app_state, path), fields(product_id = %path))]
pub async fn get_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let product = catalog_service::get_product(&app_state.db_pool, path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(product))
}

#[instrument(name = "handler::create_product", skip(app_state, payload, admin), fields(admin_id = %admin.0.user_id, name = %payload.name))]
pub async fn create_product_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<ProductInput>,
  admin: AdminUser,
) -> Result<HttpResponse, AppError> {
  let product = catalog_service::create_product(&app_state.db_pool, &payload).await?;
  Ok(HttpResponse::Created().json(json!({
      "message": "Product created successfully.",
      "product": product
  })))
}

#[instrument(name = "handler::update_product", skip(app_state, payload, admin), fields(admin_id = %admin.0.user_id, product_id = %path))]
pub async fn update_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  payload: web::Json<ProductInput>,
  admin: AdminUser,
) -> Result<HttpResponse, AppError> {
  catalog_service::update_product(&app_state.db_pool, path.into_inner(), &payload).await?;
  Ok(HttpResponse::Ok().json(json!({"message": "Product and variants updated."})))
}

#[instrument(name = "handler::delete_product", skip(app_state, admin), fields(admin_id = %admin.0.user_id, product_id = %path))]
pub async fn delete_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  admin: AdminUser,
) -> Result<HttpResponse, AppError> {
  catalog_service::delete_product(&app_state.db_pool, path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(json!({"message": "Product deleted."})))
}
