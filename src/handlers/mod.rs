//! HTTP handlers. They decode input, call one service operation and wrap the
//! outcome in the response envelope; no business rules live here.

use axum::{Json, extract::rejection::JsonRejection};

use crate::errors::AppError;

pub mod bucket_handlers;
pub mod health_handlers;
pub mod pet_handlers;
pub mod response;
pub mod seller_handlers;
pub mod user_handlers;

/// Parse a numeric id from a path or query segment, failing with
/// `invalid_msg` before any store access.
pub(crate) fn parse_id(raw: &str, invalid_msg: &str) -> Result<i64, AppError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| AppError::bad_request(invalid_msg))
}

/// Unwrap a JSON body, mapping every rejection (syntax, wrong types, missing
/// content type) to one client error.
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => {
            tracing::debug!("rejected request body: {}", rejection.body_text());
            Err(AppError::bad_request("Invalid JSON payload"))
        }
    }
}

/// Query flags are on only for the literal `true`.
pub(crate) fn flag(value: Option<&str>) -> bool {
    value == Some("true")
}
