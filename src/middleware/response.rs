use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{json, Value};

/// Success half of the response envelope:
/// `{status:"success", message, data, timestamp}`.
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub message: String,
    pub status_code: StatusCode,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            data,
            message: message.into(),
            status_code: StatusCode::OK,
        }
    }

    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self {
            data,
            message: message.into(),
            status_code: StatusCode::CREATED,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let data = match serde_json::to_value(&self.data) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("failed to serialize response data: {}", e);
                return crate::error::ApiError::internal("Failed to format response").into_response();
            }
        };

        let envelope: Value = json!({
            "status": "success",
            "message": self.message,
            "data": data,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });

        (self.status_code, Json(envelope)).into_response()
    }
}

/// Handler result alias: success envelope or domain error.
pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;
