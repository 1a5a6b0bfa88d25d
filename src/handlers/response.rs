//! The uniform JSON envelope returned by every endpoint:
//! `{ success, message?, data?, error? }`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            data: None,
            error: Some(error.into()),
        }
    }
}

/// A successful reply: status code plus envelope.
pub struct Reply<T> {
    status: StatusCode,
    body: ApiResponse<T>,
}

impl<T> Reply<T> {
    /// 200 with a payload and no message.
    pub fn ok(data: T) -> Self {
        Self::success(StatusCode::OK, Some(data), None)
    }

    /// 200 with a payload and a message.
    pub fn updated(data: T, message: impl Into<String>) -> Self {
        Self::success(StatusCode::OK, Some(data), Some(message.into()))
    }

    /// 201 with the created entity.
    pub fn created(data: T, message: impl Into<String>) -> Self {
        Self::success(StatusCode::CREATED, Some(data), Some(message.into()))
    }

    fn success(status: StatusCode, data: Option<T>, message: Option<String>) -> Self {
        Self {
            status,
            body: ApiResponse {
                success: true,
                message,
                data,
                error: None,
            },
        }
    }
}

impl Reply<()> {
    /// 200 with only a message, e.g. after a delete.
    pub fn message(message: impl Into<String>) -> Self {
        Self::success(StatusCode::OK, None, Some(message.into()))
    }
}

impl<T: Serialize> IntoResponse for Reply<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
