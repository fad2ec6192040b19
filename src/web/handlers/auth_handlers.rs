use actix_web::{cookie::time::Duration as CookieDuration, cookie::Cookie, web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::services::{auth_service, cart_service, email, notification_service, user_service};
use crate::models::NotificationKind;
use crate::state::AppState;
use crate::web::extractors::{AuthenticatedUser, SESSION_COOKIE};

#[derive(Deserialize, Debug)]
pub struct RegisterPayload {
  pub name: String,
  pub email: String,
  pub phone: Option<String>,
  pub password: String,
}

#[instrument(name = "handler::register", skip(app_state, payload), fields(email = %payload.email))]
pub async fn register_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<RegisterPayload>,
) -> Result<HttpResponse, AppError> {
  let user = user_service::create_user(
    &app_state.db_pool,
    &app_state.config,
    &payload.name,
    &payload.email,
    payload.phone.as_deref(),
    &payload.password,
  )
  .await?;

  Ok(HttpResponse::Created().json(json!({
      "message": "User registered successfully.",
      "user": user
  })))
}

#[derive(Deserialize, Debug)]
pub struct LoginPayload {
  pub email: String,
  pub password: String,
}

#[instrument(name = "handler::login", skip(app_state, payload), fields(email = %payload.email))]
pub async fn login_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<LoginPayload>,
) -> Result<HttpResponse, AppError> {
  let user = match user_service::find_by_email(&app_state.db_pool, &payload.email).await? {
    Some(user) => user,
    None => {
      warn!("Login attempt for unknown email.");
      return Err(AppError::Validation("Unknown email.".to_string()));
    }
  };

  if !auth_service::verify_password(&user.password_hash, &payload.password)? {
    warn!("Wrong password for user {}.", user.id);
    return Err(AppError::Validation("Incorrect password.".to_string()));
  }

  let cart_id = cart_service::cart_id_by_user(&app_state.db_pool, user.id).await?;
  let token = auth_service::issue_token(&app_state.config, user.id, user.role, cart_id)?;

  let cookie = Cookie::build(SESSION_COOKIE, token.clone())
    .http_only(true)
    .secure(true)
    .max_age(CookieDuration::hours(1))
    .finish();

  info!("Login successful for user {} (role {:?}).", user.id, user.role);
  Ok(HttpResponse::Ok().cookie(cookie).json(json!({
      "message": "Login successful.",
      "token": token
  })))
}

#[instrument(name = "handler::me", skip(app_state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn me_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let user = user_service::find_by_id(&app_state.db_pool, auth_user.user_id).await?;
  Ok(HttpResponse::Ok().json(json!({ "user": user })))
}

pub async fn logout_handler(auth_user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
  let mut cookie = Cookie::build(SESSION_COOKIE, "").http_only(true).secure(true).finish();
  cookie.make_removal();

  info!("Logout for user {}.", auth_user.user_id);
  Ok(HttpResponse::Ok().cookie(cookie).json(json!({"message": "Session closed."})))
}

#[derive(Deserialize, Debug)]
pub struct ChangePasswordPayload {
  pub current_password: String,
  pub new_password: String,
}

#[instrument(name = "handler::change_password", skip_all, fields(user_id = %auth_user.user_id))]
pub async fn change_password_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  payload: web::Json<ChangePasswordPayload>,
) -> Result<HttpResponse, AppError> {
  user_service::change_password(
    &app_state.db_pool,
    auth_user.user_id,
    &payload.current_password,
    &payload.new_password,
  )
  .await?;

  // Best-effort security alert: the password is already changed, a failed
  // dispatch must not undo that.
  let alert = async {
    let user = user_service::find_by_id(&app_state.db_pool, auth_user.user_id).await?;
    notification_service::notify_user(
      &app_state.db_pool,
      user.id,
      NotificationKind::SecurityAlert,
      "Password changed",
      "Your account password was just changed.",
    )
    .await?;
    email::send_security_alert(&app_state.config.email_sender, &user.email, "password change").await?;
    Ok::<_, AppError>(())
  };
  if let Err(e) = alert.await {
    warn!("Security alert dispatch failed for user {}: {}", auth_user.user_id, e);
  }

  Ok(HttpResponse::Ok().json(json!({"message": "Password changed successfully."})))
}
