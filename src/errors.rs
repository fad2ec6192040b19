use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Authentication Failed: {0}")]
  Auth(String),

  #[error("Forbidden: {0}")]
  Forbidden(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Conflict: {0}")]
  Conflict(String),

  // Checkout on a cart with no lines. A duplicate checkout submission lands
  // here too: the first request clears the cart, the second observes it empty.
  #[error("Cart is empty.")]
  EmptyCart,

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  // Raised by the email sender; callers at dispatch sites log and swallow it,
  // it never overturns an already-committed operation.
  #[error("Email Dispatch Error: {0}")]
  Email(String),

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

// Allow anyhow::Error to be converted into AppError::Internal for convenience
// in handlers that call into anyhow-returning helpers.
impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    if err.is::<sqlx::Error>() {
      return AppError::Sqlx(err.downcast::<sqlx::Error>().unwrap());
    }
    AppError::Internal(err.to_string())
  }
}

impl From<jsonwebtoken::errors::Error> for AppError {
  fn from(err: jsonwebtoken::errors::Error) -> Self {
    AppError::Auth(format!("Invalid or expired token: {}", err))
  }
}

impl ResponseError for AppError {
  fn error_response(&self) -> HttpResponse {
    // Log the full error when it's turned into a response
    tracing::error!(application_error = %self, "Responding with error");
    match self {
      AppError::Validation(m) => HttpResponse::BadRequest().json(json!({"error": m})),
      AppError::Auth(m) => HttpResponse::Unauthorized().json(json!({"error": m})),
      AppError::Forbidden(m) => HttpResponse::Forbidden().json(json!({"error": m})),
      AppError::NotFound(m) => HttpResponse::NotFound().json(json!({"error": m})),
      AppError::Conflict(m) => HttpResponse::Conflict().json(json!({"error": m})),
      AppError::EmptyCart => {
        HttpResponse::Conflict().json(json!({"error": "Cart is empty; nothing to check out."}))
      }
      AppError::Config(m) => {
        HttpResponse::InternalServerError().json(json!({"error": "Configuration issue", "detail": m}))
      }
      // Never leak SQL details to clients.
      AppError::Sqlx(_) => HttpResponse::InternalServerError().json(json!({"error": "Database operation failed"})),
      AppError::Email(m) => {
        HttpResponse::InternalServerError().json(json!({"error": "Email service error", "detail": m}))
      }
      AppError::Internal(m) => {
        HttpResponse::InternalServerError().json(json!({"error": "An internal error occurred", "detail": m}))
      }
    }
  }
}

// Define a Result type alias for the application
pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;
  use actix_web::http::StatusCode;

  #[test]
  fn validation_maps_to_400() {
    let resp = AppError::Validation("quantity must be positive".into()).error_response();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  #[test]
  fn auth_maps_to_401_and_forbidden_to_403() {
    assert_eq!(
      AppError::Auth("missing token".into()).error_response().status(),
      StatusCode::UNAUTHORIZED
    );
    assert_eq!(
      AppError::Forbidden("not your address".into()).error_response().status(),
      StatusCode::FORBIDDEN
    );
  }

  #[test]
  fn not_found_maps_to_404() {
    let resp = AppError::NotFound("cart item".into()).error_response();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[test]
  fn empty_cart_and_conflict_map_to_409() {
    assert_eq!(AppError::EmptyCart.error_response().status(), StatusCode::CONFLICT);
    assert_eq!(
      AppError::Conflict("checkout already in progress".into())
        .error_response()
        .status(),
      StatusCode::CONFLICT
    );
  }

  #[test]
  fn database_error_response_does_not_leak_details() {
    let resp = AppError::Sqlx(sqlx::Error::RowNotFound).error_response();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
  }
}
