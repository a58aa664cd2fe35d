use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Per-field validation failure surfaced in 400 responses.
#[derive(Debug, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("{0}")]
    Conflict(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("No OTP is pending for this account. Please login again.")]
    OtpMissing,

    #[error("OTP has expired. Please login again to request a new one.")]
    OtpExpired,

    #[error("Invalid OTP")]
    OtpMismatch,

    #[error("Access denied. No token provided.")]
    NoToken,

    #[error("Access denied. Invalid token format.")]
    InvalidTokenFormat,

    #[error("Token expired. Please login again.")]
    TokenExpired,

    #[error("Invalid token. Please login again.")]
    InvalidToken,

    #[error("User not found. Token is invalid.")]
    TokenUserNotFound,

    #[error("Authentication required.")]
    AuthRequired,

    #[error("Access denied. Required role(s): {required}. Your role: {actual}")]
    InsufficientPermissions { required: String, actual: String },

    #[error("Account not verified. Please complete email verification.")]
    NotVerified,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Authentication failed")]
    AuthInternal(#[source] anyhow::Error),

    #[error("Something went wrong")]
    Internal(#[from] anyhow::Error),
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        Self::Internal(anyhow::Error::new(e))
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::Conflict(_) => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials
            | Self::OtpMissing
            | Self::OtpExpired
            | Self::OtpMismatch
            | Self::NoToken
            | Self::InvalidTokenFormat
            | Self::TokenExpired
            | Self::InvalidToken
            | Self::TokenUserNotFound
            | Self::AuthRequired => StatusCode::UNAUTHORIZED,
            Self::InsufficientPermissions { .. } | Self::NotVerified => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::AuthInternal(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine code for client branching. Only expected auth-flow
    /// conditions carry one.
    pub fn code(&self) -> Option<&'static str> {
        match self {
            Self::Validation(_) => Some("VALIDATION_ERROR"),
            Self::OtpMissing => Some("OTP_MISSING"),
            Self::OtpExpired => Some("OTP_EXPIRED"),
            Self::OtpMismatch => Some("OTP_MISMATCH"),
            Self::NoToken => Some("NO_TOKEN"),
            Self::InvalidTokenFormat => Some("INVALID_TOKEN_FORMAT"),
            Self::TokenExpired => Some("TOKEN_EXPIRED"),
            Self::InvalidToken => Some("INVALID_TOKEN"),
            Self::TokenUserNotFound => Some("USER_NOT_FOUND"),
            Self::AuthRequired => Some("AUTH_REQUIRED"),
            Self::InsufficientPermissions { .. } => Some("INSUFFICIENT_PERMISSIONS"),
            Self::NotVerified => Some("ACCOUNT_NOT_VERIFIED"),
            Self::AuthInternal(_) => Some("AUTH_ERROR"),
            _ => None,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<FieldError>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();
        let message = self.to_string();

        // Internal detail stays out of production responses.
        let detail = match &self {
            Self::AuthInternal(e) | Self::Internal(e) => {
                error!(error = %e, "internal error");
                cfg!(debug_assertions).then(|| format!("{e:#}"))
            }
            _ => None,
        };
        let errors = match self {
            Self::Validation(fields) => Some(fields),
            _ => None,
        };

        (
            status,
            Json(ErrorBody {
                success: false,
                message,
                code,
                errors,
                error: detail,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_errors_map_to_machine_codes_and_statuses() {
        let cases: Vec<(ApiError, StatusCode, &str)> = vec![
            (ApiError::NoToken, StatusCode::UNAUTHORIZED, "NO_TOKEN"),
            (
                ApiError::InvalidTokenFormat,
                StatusCode::UNAUTHORIZED,
                "INVALID_TOKEN_FORMAT",
            ),
            (
                ApiError::TokenExpired,
                StatusCode::UNAUTHORIZED,
                "TOKEN_EXPIRED",
            ),
            (
                ApiError::InvalidToken,
                StatusCode::UNAUTHORIZED,
                "INVALID_TOKEN",
            ),
            (
                ApiError::TokenUserNotFound,
                StatusCode::UNAUTHORIZED,
                "USER_NOT_FOUND",
            ),
            (
                ApiError::AuthRequired,
                StatusCode::UNAUTHORIZED,
                "AUTH_REQUIRED",
            ),
            (
                ApiError::InsufficientPermissions {
                    required: "admin".into(),
                    actual: "customer".into(),
                },
                StatusCode::FORBIDDEN,
                "INSUFFICIENT_PERMISSIONS",
            ),
            (
                ApiError::NotVerified,
                StatusCode::FORBIDDEN,
                "ACCOUNT_NOT_VERIFIED",
            ),
            (
                ApiError::AuthInternal(anyhow::anyhow!("pool closed")),
                StatusCode::INTERNAL_SERVER_ERROR,
                "AUTH_ERROR",
            ),
        ];
        for (err, status, code) in cases {
            assert_eq!(err.status(), status);
            assert_eq!(err.code(), Some(code));
        }
    }

    #[test]
    fn error_body_carries_success_false_and_code() {
        let response = ApiError::OtpExpired.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn validation_error_keeps_field_detail() {
        let err = ApiError::Validation(vec![FieldError::new("email", "Valid email is required")]);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), Some("VALIDATION_ERROR"));
    }
}
