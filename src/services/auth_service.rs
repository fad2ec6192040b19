//! Password hashing/verification and session token issuance.

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::models::UserRole;
use argon2::{
  password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
  Argon2,
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};
use uuid::Uuid;

/// Session token lifetime in seconds.
const TOKEN_TTL_SECS: i64 = 60 * 60;

/// Hashes a plain-text password using Argon2 with a random salt.
#[instrument(name = "auth_service::hash_password", skip(password), err(Display))]
pub fn hash_password(password: &str) -> Result<String, AppError> {
  if password.is_empty() {
    return Err(AppError::Validation("Password cannot be empty.".to_string()));
  }

  let salt = SaltString::generate(&mut OsRng);
  let argon2_hasher = Argon2::default();

  match argon2_hasher.hash_password(password.as_bytes(), &salt) {
    Ok(password_hash_obj) => Ok(password_hash_obj.to_string()),
    Err(argon_err) => {
      error!(error = %argon_err, "Argon2 password hashing failed.");
      Err(AppError::Internal(format!("Password hashing process failed: {}", argon_err)))
    }
  }
}

/// Verifies a plain-text password against a stored Argon2 hash.
/// `Ok(false)` means the password simply does not match.
#[instrument(name = "auth_service::verify_password", skip(hashed_password_str, provided_password), err(Display))]
pub fn verify_password(hashed_password_str: &str, provided_password: &str) -> Result<bool, AppError> {
  if hashed_password_str.is_empty() {
    return Err(AppError::Auth("Invalid stored password format (empty).".to_string()));
  }
  if provided_password.is_empty() {
    return Err(AppError::Auth("Provided password cannot be empty.".to_string()));
  }

  let parsed_hash = match PasswordHash::new(hashed_password_str) {
    Ok(ph) => ph,
    Err(parse_err) => {
      error!(error = %parse_err, "Failed to parse stored password hash string.");
      return Err(AppError::Internal(format!(
        "Invalid stored password hash format: {}",
        parse_err
      )));
    }
  };

  let argon2_verifier = Argon2::default();
  match argon2_verifier.verify_password(provided_password.as_bytes(), &parsed_hash) {
    Ok(()) => Ok(true),
    Err(argon2::password_hash::Error::Password) => {
      debug!("Password verification failed: passwords do not match.");
      Ok(false)
    }
    Err(other_argon_err) => {
      error!(error = %other_argon_err, "Argon2 password verification encountered an error.");
      Err(AppError::Internal(format!(
        "Password verification process failed: {}",
        other_argon_err
      )))
    }
  }
}

/// Claims carried by the session token. The cart id rides along so cart
/// mutations don't need an extra lookup per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
  pub sub: Uuid,
  pub role: UserRole,
  pub cart_id: Uuid,
  pub iat: i64,
  pub exp: i64,
}

pub fn issue_token(config: &AppConfig, user_id: Uuid, role: UserRole, cart_id: Uuid) -> Result<String, AppError> {
  let now = chrono::Utc::now().timestamp();
  let claims = Claims {
    sub: user_id,
    role,
    cart_id,
    iat: now,
    exp: now + TOKEN_TTL_SECS,
  };
  let token = encode(
    &Header::default(),
    &claims,
    &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
  )?;
  Ok(token)
}

pub fn decode_token(config: &AppConfig, token: &str) -> Result<Claims, AppError> {
  let data = decode::<Claims>(
    token,
    &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
    &Validation::default(),
  )?;
  Ok(data.claims)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn test_config() -> AppConfig {
    AppConfig {
      server_host: "127.0.0.1".into(),
      server_port: 8080,
      database_url: "postgres://unused".into(),
      jwt_secret: "test-secret-not-for-production".into(),
      admin_email: "admin@example.com".into(),
      email_sender: "noreply@example.com".into(),
    }
  }

  #[test]
  fn hash_then_verify_roundtrip() {
    let hash = hash_password("hunter2!").unwrap();
    assert!(verify_password(&hash, "hunter2!").unwrap());
    assert!(!verify_password(&hash, "hunter3!").unwrap());
  }

  #[test]
  fn empty_password_is_rejected() {
    assert!(hash_password("").is_err());
  }

  #[test]
  fn token_roundtrip_preserves_claims() {
    let config = test_config();
    let (user_id, cart_id) = (Uuid::new_v4(), Uuid::new_v4());

    let token = issue_token(&config, user_id, UserRole::Admin, cart_id).unwrap();
    let claims = decode_token(&config, &token).unwrap();

    assert_eq!(claims.sub, user_id);
    assert_eq!(claims.cart_id, cart_id);
    assert_eq!(claims.role, UserRole::Admin);
    assert!(claims.exp > claims.iat);
  }

  #[test]
  fn token_signed_with_other_secret_is_rejected() {
    let config = test_config();
    let mut other = test_config();
    other.jwt_secret = "a-different-secret".into();

    let token = issue_token(&other, Uuid::new_v4(), UserRole::User, Uuid::new_v4()).unwrap();
    assert!(matches!(decode_token(&config, &token), Err(AppError::Auth(_))));
  }
}
