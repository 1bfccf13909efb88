// HTTP API error types and the error half of the response envelope.
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};
use std::collections::HashMap;

/// Domain/API error with appropriate status codes and client-friendly messages.
///
/// Every variant renders as the uniform error envelope:
/// `{status:"error", message, detail?, error_code, field_errors?, timestamp, request_id}`
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    Validation {
        message: String,
        field_errors: Option<HashMap<String, String>>,
    },

    // 401 Unauthorized
    Unauthorized(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 405 Method Not Allowed
    MethodNotAllowed(String),

    // 409 Conflict (duplicate unique field)
    Conflict(String),

    // 422 Unprocessable Entity (well-formed but semantically invalid)
    UnprocessableEntity {
        message: String,
        field_errors: HashMap<String, String>,
    },

    // 500 Internal Server Error
    Internal(String),

    // 502 Bad Gateway (collaborator failure)
    Upstream(String),

    // 503 Service Unavailable
    ServiceUnavailable(String),

    // 504 Gateway Timeout (collaborator timed out)
    UpstreamTimeout(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::UnprocessableEntity { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::UpstreamTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    /// Stable machine-readable code so API consumers can branch programmatically.
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Validation { .. } => "VALIDATION_ERROR",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::MethodNotAllowed(_) => "METHOD_NOT_ALLOWED",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::UnprocessableEntity { .. } => "UNPROCESSABLE_ENTITY",
            ApiError::Internal(_) => "INTERNAL_ERROR",
            ApiError::Upstream(_) => "UPSTREAM_ERROR",
            ApiError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            ApiError::UpstreamTimeout(_) => "UPSTREAM_TIMEOUT",
        }
    }

    /// Client-safe error message.
    pub fn message(&self) -> &str {
        match self {
            ApiError::Validation { message, .. } => message,
            ApiError::Unauthorized(msg) => msg,
            ApiError::Forbidden(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::MethodNotAllowed(msg) => msg,
            ApiError::Conflict(msg) => msg,
            ApiError::UnprocessableEntity { message, .. } => message,
            ApiError::Internal(msg) => msg,
            ApiError::Upstream(msg) => msg,
            ApiError::ServiceUnavailable(msg) => msg,
            ApiError::UpstreamTimeout(msg) => msg,
        }
    }

    pub fn to_envelope(&self, request_id: uuid::Uuid) -> Value {
        let mut body = json!({
            "status": "error",
            "message": self.message(),
            "error_code": self.error_code(),
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "request_id": request_id.to_string(),
        });

        let field_errors = match self {
            ApiError::Validation { field_errors, .. } => field_errors.as_ref(),
            ApiError::UnprocessableEntity { field_errors, .. } => Some(field_errors),
            _ => None,
        };
        if let Some(errors) = field_errors {
            body["field_errors"] = json!(errors);
            body["detail"] = json!("One or more fields failed validation");
        }

        body
    }
}

// Constructor helpers, mirroring how handlers raise errors.
impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation {
            message: message.into(),
            field_errors: None,
        }
    }

    pub fn validation_fields(message: impl Into<String>, field_errors: HashMap<String, String>) -> Self {
        ApiError::Validation {
            message: message.into(),
            field_errors: Some(field_errors),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        ApiError::Upstream(message.into())
    }

    pub fn upstream_timeout(message: impl Into<String>) -> Self {
        ApiError::UpstreamTimeout(message.into())
    }
}

impl From<crate::database::store::StoreError> for ApiError {
    fn from(err: crate::database::store::StoreError) -> Self {
        use crate::database::store::StoreError;
        match err {
            StoreError::NotFound(msg) => ApiError::not_found(msg),
            StoreError::Conflict(msg) => ApiError::conflict(msg),
            StoreError::Connection(msg) => {
                tracing::error!("store connection error: {}", msg);
                ApiError::ServiceUnavailable("Database temporarily unavailable".to_string())
            }
            StoreError::Sqlx(e) => {
                // Log the real error but return a generic message
                tracing::error!("sqlx error: {}", e);
                ApiError::internal("An error occurred while processing your request")
            }
        }
    }
}

impl From<crate::services::ai_client::AiClientError> for ApiError {
    fn from(err: crate::services::ai_client::AiClientError) -> Self {
        use crate::services::ai_client::AiClientError;
        match err {
            AiClientError::Timeout => {
                ApiError::upstream_timeout("AI analysis service timed out")
            }
            AiClientError::NotConfigured => {
                ApiError::ServiceUnavailable("AI analysis service is not configured".to_string())
            }
            AiClientError::Upstream(msg) => {
                tracing::warn!("AI collaborator failure: {}", msg);
                ApiError::upstream("AI analysis service is unavailable")
            }
            AiClientError::InvalidResponse(msg) => {
                tracing::error!("AI collaborator returned invalid payload: {}", msg);
                ApiError::upstream("AI analysis service returned an invalid response")
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let request_id = uuid::Uuid::new_v4();
        (self.status_code(), Json(self.to_envelope(request_id))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_and_code_mapping() {
        assert_eq!(ApiError::validation("x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::unauthorized("x").status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::not_found("x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::conflict("x").status_code(), StatusCode::CONFLICT);
        assert_eq!(ApiError::upstream("x").status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(ApiError::upstream_timeout("x").status_code(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(ApiError::not_found("x").error_code(), "NOT_FOUND");
        assert_eq!(ApiError::validation("x").error_code(), "VALIDATION_ERROR");
    }

    #[test]
    fn ai_client_errors_map_to_gateway_statuses() {
        use crate::services::ai_client::AiClientError;

        let timeout = ApiError::from(AiClientError::Timeout);
        assert_eq!(timeout.status_code(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(timeout.error_code(), "UPSTREAM_TIMEOUT");

        let upstream = ApiError::from(AiClientError::Upstream("boom".to_string()));
        assert_eq!(upstream.status_code(), StatusCode::BAD_GATEWAY);

        let unconfigured = ApiError::from(AiClientError::NotConfigured);
        assert_eq!(unconfigured.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn envelope_shape() {
        let mut fields = HashMap::new();
        fields.insert("address".to_string(), "This field is required".to_string());
        let err = ApiError::validation_fields("Missing required fields", fields);
        let body = err.to_envelope(uuid::Uuid::new_v4());

        assert_eq!(body["status"], "error");
        assert_eq!(body["error_code"], "VALIDATION_ERROR");
        assert_eq!(body["field_errors"]["address"], "This field is required");
        assert!(body["timestamp"].is_string());
        assert!(body["request_id"].is_string());
    }
}
