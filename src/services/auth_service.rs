use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::{
    hash_password, issue_access_token, issue_refresh_token, verify_password, verify_token,
    TokenKind,
};
use crate::config::SecurityConfig;
use crate::database::models::User;
use crate::database::store::UserStore;
use crate::error::ApiError;

/// Validated registration input; constructed at the router boundary.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: Value,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub access_token: String,
    pub expires_in: i64,
}

/// Credential verification and token issuance. This layer never parses JWT
/// payloads beyond the standard claims; cryptography stays in the jwt crate.
pub struct AuthService {
    store: Arc<dyn UserStore>,
    security: SecurityConfig,
}

impl AuthService {
    pub fn new(store: Arc<dyn UserStore>, security: SecurityConfig) -> Self {
        Self { store, security }
    }

    pub async fn register(&self, input: NewUser) -> Result<User, ApiError> {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: input.email.trim().to_ascii_lowercase(),
            password_hash: hash_password(&input.password),
            first_name: input.first_name,
            last_name: input.last_name,
            role: "user".to_string(),
            organization_id: None,
            created_at: now,
            updated_at: now,
        };

        let created = self.store.insert(user).await?;
        tracing::info!(user_id = %created.id, "registered user");
        Ok(created)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        // One message for both unknown email and bad password, so the
        // endpoint does not leak which emails are registered.
        let user = self
            .store
            .find_by_email(email.trim())
            .await?
            .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

        if !verify_password(password, &user.password_hash) {
            return Err(ApiError::unauthorized("Invalid credentials"));
        }

        let access_token = issue_access_token(user.id, &user.email, &user.role, &self.security)
            .map_err(|e| ApiError::internal(e.to_string()))?;
        let refresh_token = issue_refresh_token(user.id, &user.email, &user.role, &self.security)
            .map_err(|e| ApiError::internal(e.to_string()))?;

        Ok(LoginResponse {
            user: user.to_public(),
            access_token,
            refresh_token,
            expires_in: self.security.access_token_ttl_secs,
        })
    }

    pub async fn refresh(&self, refresh_token: &str) -> Result<RefreshResponse, ApiError> {
        let claims = verify_token(refresh_token, TokenKind::Refresh, &self.security)
            .map_err(|_| ApiError::unauthorized("Invalid or expired refresh token"))?;

        // The account may have been removed since the token was issued.
        let user = self
            .store
            .find_by_id(claims.sub)
            .await?
            .ok_or_else(|| ApiError::unauthorized("Invalid or expired refresh token"))?;

        let access_token = issue_access_token(user.id, &user.email, &user.role, &self.security)
            .map_err(|e| ApiError::internal(e.to_string()))?;

        Ok(RefreshResponse {
            access_token,
            expires_in: self.security.access_token_ttl_secs,
        })
    }

    pub async fn user(&self, id: Uuid) -> Result<User, ApiError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("user not found"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::database::memory::MemoryUserStore;

    fn service() -> AuthService {
        AuthService::new(
            Arc::new(MemoryUserStore::new()),
            AppConfig::development().security,
        )
    }

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            password: "hunter2".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
        }
    }

    #[tokio::test]
    async fn register_login_refresh_roundtrip() {
        let svc = service();
        svc.register(new_user("ada@example.com")).await.unwrap();

        let login = svc.login("ada@example.com", "hunter2").await.unwrap();
        assert_eq!(login.expires_in, 3600);

        let refreshed = svc.refresh(&login.refresh_token).await.unwrap();
        assert!(!refreshed.access_token.is_empty());
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let svc = service();
        svc.register(new_user("ada@example.com")).await.unwrap();
        let err = svc.register(new_user("ADA@example.com")).await.unwrap_err();
        assert_eq!(err.error_code(), "CONFLICT");
    }

    #[tokio::test]
    async fn bad_credentials_are_unauthorized() {
        let svc = service();
        svc.register(new_user("ada@example.com")).await.unwrap();

        let wrong_password = svc.login("ada@example.com", "nope").await.unwrap_err();
        assert_eq!(wrong_password.error_code(), "UNAUTHORIZED");

        let unknown_email = svc.login("none@example.com", "hunter2").await.unwrap_err();
        assert_eq!(unknown_email.error_code(), "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn access_token_is_rejected_as_refresh_token() {
        let svc = service();
        svc.register(new_user("ada@example.com")).await.unwrap();
        let login = svc.login("ada@example.com", "hunter2").await.unwrap();

        let err = svc.refresh(&login.access_token).await.unwrap_err();
        assert_eq!(err.error_code(), "UNAUTHORIZED");
    }
}
