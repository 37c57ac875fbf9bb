use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use serde::Serialize;
use serde_json::json;

use crate::status::BusinessCode;

/// Uniform envelope wrapped around every handler result.
///
/// `transport_status` is internal plumbing: it is resolved from `code` at
/// construction, drives the wire-level HTTP status in `into_response`, and is
/// never serialized into the body.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub code: u16,
    pub message: String,
    pub data: Option<T>,
    pub timestamp: String,
    #[serde(skip)]
    transport_status: StatusCode,
}

/// Envelope timestamp format: second precision, no timezone offset.
pub fn format_timestamp(at: chrono::DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}

impl<T: Serialize> ApiResponse<T> {
    fn outcome(code: BusinessCode, message: Option<String>, data: Option<T>) -> Self {
        Self {
            code: code.as_u16(),
            message: message.unwrap_or_else(|| code.default_message().to_string()),
            data,
            timestamp: format_timestamp(Utc::now()),
            transport_status: code.transport_status(),
        }
    }

    pub fn transport_status(&self) -> StatusCode {
        self.transport_status
    }

    /// Successful result carrying a payload.
    pub fn success(data: T) -> Self {
        Self::outcome(BusinessCode::Success, None, Some(data))
    }

    /// Successful result with a custom message.
    pub fn success_msg(data: T, message: impl Into<String>) -> Self {
        Self::outcome(BusinessCode::Success, Some(message.into()), Some(data))
    }

    /// Create outcome. Same code space as success; only the message differs.
    pub fn created(data: T) -> Self {
        Self::outcome(BusinessCode::Success, Some("Created".to_string()), Some(data))
    }
}

/// Error factories. These always carry `data: null`; the field is serialized
/// as JSON null rather than omitted.
impl ApiResponse<()> {
    fn failure(code: BusinessCode, message: Option<String>) -> Self {
        Self::outcome(code, message, None)
    }

    // Soft business outcomes (HTTP 200)

    pub fn business_error(message: impl Into<String>) -> Self {
        Self::failure(BusinessCode::Error, Some(message.into()))
    }

    pub fn validation_failed(message: impl Into<String>) -> Self {
        Self::failure(BusinessCode::ValidationFailed, Some(message.into()))
    }

    pub fn resource_not_found(message: impl Into<String>) -> Self {
        Self::failure(BusinessCode::NotFound, Some(message.into()))
    }

    pub fn resource_exists(message: impl Into<String>) -> Self {
        Self::failure(BusinessCode::AlreadyExists, Some(message.into()))
    }

    pub fn operation_forbidden(message: impl Into<String>) -> Self {
        Self::failure(BusinessCode::Forbidden, Some(message.into()))
    }

    pub fn parameter_invalid(message: impl Into<String>) -> Self {
        Self::failure(BusinessCode::ParamInvalid, Some(message.into()))
    }

    // Flat-era aliases, resolved onto the layered code table

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::parameter_invalid(message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::resource_not_found(message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::resource_exists(message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::operation_forbidden(message)
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::validation_failed(message)
    }

    // Hard transport outcomes (literal HTTP status)

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::failure(BusinessCode::Unauthorized, Some(message.into()))
    }

    pub fn login_expired() -> Self {
        Self::failure(BusinessCode::Unauthorized, Some("Login expired".to_string()))
    }

    pub fn request_timeout() -> Self {
        Self::failure(BusinessCode::Timeout, None)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::failure(BusinessCode::InternalError, Some(message.into()))
    }

    pub fn service_busy() -> Self {
        Self::failure(BusinessCode::ServiceBusy, None)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::failure(BusinessCode::ServiceBusy, Some(message.into()))
    }
}

/// Transport adapter: the single point where the internal status hint becomes
/// the wire status. Serialization skips the hint itself.
impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.transport_status;
        match serde_json::to_value(&self) {
            Ok(body) => (status, Json(body)).into_response(),
            Err(e) => {
                tracing::error!("failed to serialize response envelope: {}", e);
                let fallback = ApiResponse::internal_error("Internal server error");
                let body = json!({
                    "code": fallback.code,
                    "message": fallback.message,
                    "data": serde_json::Value::Null,
                    "timestamp": fallback.timestamp,
                });
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}

/// Explicit marker for handler results that bypass the envelope entirely.
/// The adapter dispatches on this type, never on body shape.
#[derive(Debug)]
pub struct Passthrough<T: Serialize>(pub T);

impl<T: Serialize> IntoResponse for Passthrough<T> {
    fn into_response(self) -> Response {
        Json(self.0).into_response()
    }
}

/// Handler result alias: envelope on success, `ApiError` (rendered as an
/// error envelope) on failure.
pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_serializes_all_wire_fields_and_nothing_else() {
        let resp = ApiResponse::success(json!({"id": 1}));
        let value = serde_json::to_value(&resp).unwrap();
        let obj = value.as_object().unwrap();

        assert_eq!(obj.len(), 4);
        assert!(obj.contains_key("code"));
        assert!(obj.contains_key("message"));
        assert!(obj.contains_key("data"));
        assert!(obj.contains_key("timestamp"));
        assert!(!obj.contains_key("transport_status"));
        assert!(!obj.contains_key("transportStatus"));
    }

    #[test]
    fn null_data_is_serialized_not_omitted() {
        let resp = ApiResponse::resource_not_found("no such category");
        let value = serde_json::to_value(&resp).unwrap();
        assert!(value.get("data").is_some());
        assert!(value["data"].is_null());
    }

    #[test]
    fn soft_failures_ride_http_200() {
        assert_eq!(
            ApiResponse::operation_forbidden("guests are read-only").transport_status(),
            StatusCode::OK
        );
        assert_eq!(ApiResponse::conflict("exists").transport_status(), StatusCode::OK);
        assert_eq!(ApiResponse::bad_request("bad").transport_status(), StatusCode::OK);
    }

    #[test]
    fn hard_failures_ride_their_literal_status() {
        assert_eq!(ApiResponse::login_expired().transport_status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiResponse::internal_error("boom").transport_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(ApiResponse::service_busy().transport_status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(ApiResponse::request_timeout().transport_status(), StatusCode::REQUEST_TIMEOUT);
    }

    #[test]
    fn flat_aliases_resolve_onto_layered_codes() {
        assert_eq!(ApiResponse::bad_request("x").code, 305);
        assert_eq!(ApiResponse::not_found("x").code, 302);
        assert_eq!(ApiResponse::conflict("x").code, 303);
        assert_eq!(ApiResponse::forbidden("x").code, 304);
        assert_eq!(ApiResponse::unprocessable("x").code, 301);
    }

    #[test]
    fn timestamp_uses_second_precision_space_separator() {
        let resp = ApiResponse::success(());
        // "YYYY-MM-DD HH:mm:ss"
        assert_eq!(resp.timestamp.len(), 19);
        assert_eq!(resp.timestamp.as_bytes()[10], b' ');
        assert_eq!(resp.timestamp.matches(':').count(), 2);
    }

    #[test]
    fn default_messages_apply_when_not_overridden() {
        let resp = ApiResponse::service_busy();
        assert_eq!(resp.message, "Service busy");
        let resp = ApiResponse::success_msg((), "Login ok");
        assert_eq!(resp.message, "Login ok");
    }
}
