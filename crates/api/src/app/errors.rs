//! Error responses.
//!
//! Validation failures are a JSON array of field/global errors. Authorization
//! and not-found responses have empty bodies. Storage failures are logged and
//! surface as a bare 500.

use axum::extract::rejection::{FormRejection, JsonRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use eventdesk_auth::TokenError;
use eventdesk_core::ValidationErrors;
use eventdesk_infra::{AccountError, RepositoryError};

/// Global error code for bodies that cannot be read into the target type.
pub const UNREADABLE_CODE: &str = "HttpMessageNotReadable";

#[derive(Debug)]
pub enum ApiError {
    Validation(ValidationErrors),
    Unauthorized,
    NotFound,
    UnsupportedMediaType,
    Conflict(String),
    /// Token endpoint failure in the OAuth2 `{error, error_description}` shape.
    OAuth {
        status: StatusCode,
        error: &'static str,
        description: String,
    },
    Internal(String),
}

impl ApiError {
    /// Single global error for a body that could not be deserialized.
    pub fn unreadable(object_name: &str, message: impl Into<String>) -> Self {
        let mut errors = ValidationErrors::new(object_name);
        errors.reject(UNREADABLE_CODE, message);
        Self::Validation(errors)
    }

    /// Map an axum JSON rejection for a body bound to `object_name`.
    pub fn from_json_rejection(object_name: &str, rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::MissingJsonContentType(_) => Self::UnsupportedMediaType,
            other => Self::unreadable(object_name, other.body_text()),
        }
    }

    pub fn invalid_client() -> Self {
        Self::OAuth {
            status: StatusCode::UNAUTHORIZED,
            error: "invalid_client",
            description: "Bad client credentials".to_string(),
        }
    }

    pub fn invalid_grant() -> Self {
        Self::OAuth {
            status: StatusCode::BAD_REQUEST,
            error: "invalid_grant",
            description: "Bad credentials".to_string(),
        }
    }

    pub fn unsupported_grant_type(grant_type: &str) -> Self {
        Self::OAuth {
            status: StatusCode::BAD_REQUEST,
            error: "unsupported_grant_type",
            description: format!("Unsupported grant type: {grant_type}"),
        }
    }

    pub fn invalid_request(description: impl Into<String>) -> Self {
        Self::OAuth {
            status: StatusCode::BAD_REQUEST,
            error: "invalid_request",
            description: description.into(),
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::UsernameNotFound(_) | AccountError::BadCredentials => Self::invalid_grant(),
            AccountError::DuplicateEmail(email) => {
                Self::Conflict(format!("email already registered: {email}"))
            }
            AccountError::Invalid(message) => {
                let mut errors = ValidationErrors::new("accountDto");
                errors.reject("invalid", message);
                Self::Validation(errors)
            }
            AccountError::Repository(e) => e.into(),
        }
    }
}

impl From<FormRejection> for ApiError {
    fn from(rejection: FormRejection) -> Self {
        Self::invalid_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => {
                (StatusCode::BAD_REQUEST, axum::Json(errors)).into_response()
            }
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
            ApiError::NotFound => StatusCode::NOT_FOUND.into_response(),
            ApiError::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE.into_response(),
            ApiError::Conflict(message) => json_error(StatusCode::CONFLICT, "conflict", message),
            ApiError::OAuth {
                status,
                error,
                description,
            } => (
                status,
                axum::Json(json!({
                    "error": error,
                    "error_description": description,
                })),
            )
                .into_response(),
            ApiError::Internal(message) => {
                tracing::error!(error = %message, "request failed");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreadable_body_is_a_single_global_error() {
        let ApiError::Validation(errors) = ApiError::unreadable("eventDto", "unknown field `id`") else {
            panic!("expected validation error");
        };
        assert_eq!(errors.len(), 1);
        let error = errors.iter().next().unwrap();
        assert!(error.is_global());
        assert_eq!(error.code, UNREADABLE_CODE);
    }

    #[test]
    fn status_codes() {
        assert_eq!(ApiError::Unauthorized.into_response().status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::NotFound.into_response().status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::invalid_client().into_response().status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::invalid_grant().into_response().status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::from(RepositoryError::Storage("down".into())).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::from(AccountError::DuplicateEmail("a@b.c".into())).into_response().status(),
            StatusCode::CONFLICT
        );
    }
}
