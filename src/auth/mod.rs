use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::config::SecurityConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: String,
    pub kind: TokenKind,
    pub exp: i64,
    pub iat: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("JWT secret not configured")]
    MissingSecret,
    #[error("token generation failed: {0}")]
    Generation(String),
    #[error("invalid or expired token")]
    Invalid,
    #[error("wrong token type for this operation")]
    WrongKind,
}

fn claims(user_id: Uuid, email: &str, role: &str, kind: TokenKind, ttl_secs: i64) -> Claims {
    let now = Utc::now();
    Claims {
        sub: user_id,
        email: email.to_string(),
        role: role.to_string(),
        kind,
        exp: (now + Duration::seconds(ttl_secs)).timestamp(),
        iat: now.timestamp(),
    }
}

fn sign(claims: &Claims, security: &SecurityConfig) -> Result<String, JwtError> {
    if security.jwt_secret.is_empty() {
        return Err(JwtError::MissingSecret);
    }
    let key = EncodingKey::from_secret(security.jwt_secret.as_bytes());
    encode(&Header::default(), claims, &key).map_err(|e| JwtError::Generation(e.to_string()))
}

pub fn issue_access_token(
    user_id: Uuid,
    email: &str,
    role: &str,
    security: &SecurityConfig,
) -> Result<String, JwtError> {
    let claims = claims(user_id, email, role, TokenKind::Access, security.access_token_ttl_secs);
    sign(&claims, security)
}

pub fn issue_refresh_token(
    user_id: Uuid,
    email: &str,
    role: &str,
    security: &SecurityConfig,
) -> Result<String, JwtError> {
    let claims = claims(user_id, email, role, TokenKind::Refresh, security.refresh_token_ttl_secs);
    sign(&claims, security)
}

/// Validate a token and require it to be of the expected kind, so a refresh
/// token cannot be used as a bearer credential and vice versa.
pub fn verify_token(
    token: &str,
    expected: TokenKind,
    security: &SecurityConfig,
) -> Result<Claims, JwtError> {
    if security.jwt_secret.is_empty() {
        return Err(JwtError::MissingSecret);
    }
    let key = DecodingKey::from_secret(security.jwt_secret.as_bytes());
    let data = decode::<Claims>(token, &key, &Validation::default()).map_err(|_| JwtError::Invalid)?;
    if data.claims.kind != expected {
        return Err(JwtError::WrongKind);
    }
    Ok(data.claims)
}

/// Salted SHA-256 password digest in `salt$hex` form.
pub fn hash_password(password: &str) -> String {
    let salt = Uuid::new_v4().simple().to_string();
    format!("{}${}", salt, digest(&salt, password))
}

pub fn verify_password(password: &str, stored: &str) -> bool {
    match stored.split_once('$') {
        Some((salt, expected)) => digest(salt, password) == expected,
        None => false,
    }
}

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}
