// Business status code registry
//
// The API uses a layered code space: soft business outcomes (300-305) always
// travel as HTTP 200 so a client's generic HTTP error handling never
// intercepts an expected failure, while hard transport outcomes
// (401/408/500/503) travel at their literal HTTP value so the client's HTTP
// stack can react directly (auto-logout on 401, retry handling on 503).

use axum::http::StatusCode;

/// Closed set of business outcome codes carried in the `code` field of every
/// API envelope. The wire value is the discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum BusinessCode {
    /// Operation succeeded (also used for creates; no 201 era exists)
    Success = 200,

    // Soft business errors, transported as HTTP 200
    Error = 300,
    ValidationFailed = 301,
    NotFound = 302,
    AlreadyExists = 303,
    Forbidden = 304,
    ParamInvalid = 305,

    // Hard transport errors, transported at their literal value
    Unauthorized = 401,
    Timeout = 408,
    InternalError = 500,
    ServiceBusy = 503,
}

impl BusinessCode {
    /// Wire value serialized into the envelope's `code` field.
    pub fn as_u16(self) -> u16 {
        self as u16
    }

    /// Resolve the HTTP status this outcome travels at. Total over the
    /// registry; soft outcomes collapse to 200.
    pub fn transport_status(self) -> StatusCode {
        match self {
            BusinessCode::Success
            | BusinessCode::Error
            | BusinessCode::ValidationFailed
            | BusinessCode::NotFound
            | BusinessCode::AlreadyExists
            | BusinessCode::Forbidden
            | BusinessCode::ParamInvalid => StatusCode::OK,
            BusinessCode::Unauthorized => StatusCode::UNAUTHORIZED,
            BusinessCode::Timeout => StatusCode::REQUEST_TIMEOUT,
            BusinessCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            BusinessCode::ServiceBusy => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Default human message when the caller does not override one.
    pub fn default_message(self) -> &'static str {
        match self {
            BusinessCode::Success => "OK",
            BusinessCode::Error => "Operation failed",
            BusinessCode::ValidationFailed => "Validation failed",
            BusinessCode::NotFound => "Resource not found",
            BusinessCode::AlreadyExists => "Resource already exists",
            BusinessCode::Forbidden => "Operation forbidden",
            BusinessCode::ParamInvalid => "Invalid parameter",
            BusinessCode::Unauthorized => "Unauthorized",
            BusinessCode::Timeout => "Request timed out",
            BusinessCode::InternalError => "Internal server error",
            BusinessCode::ServiceBusy => "Service busy",
        }
    }

    pub const ALL: [BusinessCode; 11] = [
        BusinessCode::Success,
        BusinessCode::Error,
        BusinessCode::ValidationFailed,
        BusinessCode::NotFound,
        BusinessCode::AlreadyExists,
        BusinessCode::Forbidden,
        BusinessCode::ParamInvalid,
        BusinessCode::Unauthorized,
        BusinessCode::Timeout,
        BusinessCode::InternalError,
        BusinessCode::ServiceBusy,
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn soft_codes_travel_as_http_200() {
        for code in [
            BusinessCode::Error,
            BusinessCode::ValidationFailed,
            BusinessCode::NotFound,
            BusinessCode::AlreadyExists,
            BusinessCode::Forbidden,
            BusinessCode::ParamInvalid,
        ] {
            assert_eq!(code.transport_status(), StatusCode::OK, "{:?}", code);
        }
    }

    #[test]
    fn hard_codes_travel_at_their_literal_value() {
        for code in [
            BusinessCode::Unauthorized,
            BusinessCode::Timeout,
            BusinessCode::InternalError,
            BusinessCode::ServiceBusy,
        ] {
            assert_eq!(code.transport_status().as_u16(), code.as_u16(), "{:?}", code);
        }
    }

    #[test]
    fn resolution_is_deterministic() {
        for code in BusinessCode::ALL {
            assert_eq!(code.transport_status(), code.transport_status());
            assert!(!code.default_message().is_empty());
        }
    }

    #[test]
    fn wire_values_match_the_code_table() {
        assert_eq!(BusinessCode::Success.as_u16(), 200);
        assert_eq!(BusinessCode::Error.as_u16(), 300);
        assert_eq!(BusinessCode::ParamInvalid.as_u16(), 305);
        assert_eq!(BusinessCode::Unauthorized.as_u16(), 401);
        assert_eq!(BusinessCode::ServiceBusy.as_u16(), 503);
    }
}
