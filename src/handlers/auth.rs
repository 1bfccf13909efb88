use axum::{extract::State, Extension};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

use crate::error::ApiError;
use crate::extract::Json;
use crate::middleware::auth::AuthUser;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::services::auth_service::NewUser;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
}

impl RegisterRequest {
    fn validate(self) -> Result<NewUser, ApiError> {
        let mut errors: HashMap<String, String> = HashMap::new();

        let email = self
            .email
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        let email = match email {
            Some(v) if v.contains('@') => v,
            Some(_) => {
                errors.insert("email".to_string(), "Invalid email address".to_string());
                String::new()
            }
            None => {
                errors.insert("email".to_string(), "This field is required".to_string());
                String::new()
            }
        };

        let password = match self.password.filter(|v| !v.is_empty()) {
            Some(v) if v.len() >= 8 => v,
            Some(_) => {
                errors.insert(
                    "password".to_string(),
                    "Password must be at least 8 characters".to_string(),
                );
                String::new()
            }
            None => {
                errors.insert("password".to_string(), "This field is required".to_string());
                String::new()
            }
        };

        if !errors.is_empty() {
            return Err(ApiError::validation_fields("Invalid registration payload", errors));
        }

        Ok(NewUser {
            email,
            password,
            first_name: self.first_name.unwrap_or_default(),
            last_name: self.last_name.unwrap_or_default(),
        })
    }
}

fn decode<T: serde::de::DeserializeOwned>(payload: Value) -> Result<T, ApiError> {
    serde_json::from_value(payload)
        .map_err(|e| ApiError::validation(format!("Invalid request body: {}", e)))
}

/// POST /api/auth/register
pub async fn register(State(state): State<AppState>, Json(payload): Json<Value>) -> ApiResult<Value> {
    let input = decode::<RegisterRequest>(payload)?.validate()?;
    let user = state.auth.register(input).await?;

    Ok(ApiResponse::created("User registered successfully", user.to_public()))
}

/// POST /api/auth/login
pub async fn login(State(state): State<AppState>, Json(payload): Json<Value>) -> ApiResult<Value> {
    let request = decode::<LoginRequest>(payload)?;
    let email = request
        .email
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ApiError::validation("email is required"))?;
    let password = request
        .password
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::validation("password is required"))?;

    let login = state.auth.login(&email, &password).await?;

    Ok(ApiResponse::success(
        "Login successful",
        serde_json::to_value(login).unwrap_or(Value::Null),
    ))
}

/// POST /api/auth/refresh
pub async fn refresh(State(state): State<AppState>, Json(payload): Json<Value>) -> ApiResult<Value> {
    let request = decode::<RefreshRequest>(payload)?;
    let token = request
        .refresh_token
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::validation("refresh_token is required"))?;

    let refreshed = state.auth.refresh(&token).await?;

    Ok(ApiResponse::success(
        "Token refreshed successfully",
        serde_json::to_value(refreshed).unwrap_or(Value::Null),
    ))
}

/// GET /api/auth/me - requires a valid access token
pub async fn me(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<Value> {
    let user = state.auth.user(auth_user.user_id).await?;

    Ok(ApiResponse::success("User retrieved successfully", user.to_public()))
}
