//! Request extractors for authenticated and admin users. The session token is
//! accepted either as a `Bearer` header or as the `__secure` cookie set at
//! login.

use crate::errors::AppError;
use crate::models::UserRole;
use crate::services::auth_service;
use crate::state::AppState;
use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "__secure";

#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
  pub user_id: Uuid,
  pub role: UserRole,
  pub cart_id: Uuid,
}

impl AuthenticatedUser {
  pub fn is_admin(&self) -> bool {
    self.role == UserRole::Admin
  }
}

fn token_from_request(req: &HttpRequest) -> Option<String> {
  if let Some(header) = req.headers().get("Authorization") {
    if let Ok(value) = header.to_str() {
      if let Some(token) = value.strip_prefix("Bearer ") {
        return Some(token.to_string());
      }
    }
  }
  req.cookie(SESSION_COOKIE).map(|c| c.value().to_string())
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, AppError> {
  let state = req
    .app_data::<web::Data<AppState>>()
    .ok_or_else(|| AppError::Internal("Application state is not configured.".to_string()))?;

  let token =
    token_from_request(req).ok_or_else(|| AppError::Auth("Missing session token.".to_string()))?;
  let claims = auth_service::decode_token(&state.config, &token)?;

  Ok(AuthenticatedUser {
    user_id: claims.sub,
    role: claims.role,
    cart_id: claims.cart_id,
  })
}

impl FromRequest for AuthenticatedUser {
  type Error = AppError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    ready(authenticate(req))
  }
}

/// Same as `AuthenticatedUser` but rejects non-admin tokens with 403.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthenticatedUser);

impl FromRequest for AdminUser {
  type Error = AppError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    ready(authenticate(req).and_then(|user| {
      if user.is_admin() {
        Ok(AdminUser(user))
      } else {
        Err(AppError::Forbidden("Administrator role required.".to_string()))
      }
    }))
  }
}
