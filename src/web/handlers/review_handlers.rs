use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::errors::AppError;
use crate::services::paging::{PageInfo, PageParams};
use crate::services::review_service;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

#[derive(Deserialize, Debug)]
pub struct CreateReviewPayload {
  pub product_id: Uuid,
  pub rating: i16,
  pub comment: Option<String>,
}

#[instrument(name = "handler::create_review", skip(app_state, payload, auth_user), fields(user_id = %auth_user.user_id, product_id = %payload.product_id))]
pub async fn create_review_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<CreateReviewPayload>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let review = review_service::add_review(
    &app_state.db_pool,
    payload.product_id,
    auth_user.user_id,
    payload.rating,
    payload.comment.as_deref(),
  )
  .await?;
  Ok(HttpResponse::Created().json(json!({
      "message": "Review created successfully.",
      "review": review
  })))
}

#[derive(Deserialize, Debug)]
pub struct ListReviewsQuery {
  pub page: Option<i64>,
  pub limit: Option<i64>,
}

#[instrument(name = "handler::list_reviews", skip(app_state, query), fields(product_id = %path))]
pub async fn list_reviews_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  query: web::Query<ListReviewsQuery>,
) -> Result<HttpResponse, AppError> {
  let params = PageParams::clamped(query.page, query.limit);
  let (reviews, total) = review_service::list_reviews(&app_state.db_pool, path.into_inner(), params).await?;
  Ok(HttpResponse::Ok().json(json!({
      "reviews": reviews,
      "pagination": PageInfo::new(params, total)
  })))
}

#[instrument(name = "handler::delete_review", skip(app_state, auth_user), fields(review_id = %path, user_id = %auth_user.user_id))]
pub async fn delete_review_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  review_service::delete_review(
    &app_state.db_pool,
    path.into_inner(),
    auth_user.user_id,
    auth_user.is_admin(),
  )
  .await?;
  Ok(HttpResponse::Ok().json(json!({"message": "Review deleted."})))
}

#[instrument(name = "handler::product_rating", skip(app_state), fields(product_id = %path))]
pub async fn product_rating_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let stats = review_service::average_rating(&app_state.db_pool, path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(stats))
}
