use poem_openapi::{payload::Json, ApiResponse, Object};
use std::fmt;

use crate::errors::InternalError;

/// Standardized error response for authentication endpoints
#[derive(Object, Debug)]
pub struct AuthErrorResponse {
    /// Stable machine-readable error code
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code
    pub status_code: u16,
}

/// Authentication error types
///
/// One variant per caller-visible failure; codes and messages are stable.
/// Responses never include passwords, refresh secrets, or internals.
#[derive(ApiResponse, Debug)]
pub enum AuthError {
    /// Malformed input detected before touching the store
    #[oai(status = 400)]
    ValidationError(Json<AuthErrorResponse>),

    /// Email is already registered
    #[oai(status = 400)]
    EmailAlreadyRegistered(Json<AuthErrorResponse>),

    /// Unknown email or wrong password (one code for both)
    #[oai(status = 401)]
    InvalidCredentials(Json<AuthErrorResponse>),

    /// Account has been disabled
    #[oai(status = 403)]
    AccountDisabled(Json<AuthErrorResponse>),

    /// Account exists but holds a different role
    #[oai(status = 403)]
    WrongAccountType(Json<AuthErrorResponse>),

    /// Account has no profile for its role
    #[oai(status = 400)]
    ProfileMissing(Json<AuthErrorResponse>),

    /// Refresh token unknown or already revoked
    #[oai(status = 401)]
    InvalidRefreshToken(Json<AuthErrorResponse>),

    /// Refresh token past its expiry
    #[oai(status = 401)]
    RefreshTokenExpired(Json<AuthErrorResponse>),

    /// Invalid or malformed access token
    #[oai(status = 401)]
    InvalidToken(Json<AuthErrorResponse>),

    /// Access token has expired
    #[oai(status = 401)]
    ExpiredToken(Json<AuthErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<AuthErrorResponse>),
}

impl AuthError {
    fn body(error: &str, message: &str, status_code: u16) -> Json<AuthErrorResponse> {
        Json(AuthErrorResponse {
            error: error.to_string(),
            message: message.to_string(),
            status_code,
        })
    }

    /// Create a ValidationError with a field-specific message
    pub fn validation_error(message: impl AsRef<str>) -> Self {
        AuthError::ValidationError(Self::body("validation_error", message.as_ref(), 400))
    }

    /// Create an EmailAlreadyRegistered error
    pub fn email_already_registered() -> Self {
        AuthError::EmailAlreadyRegistered(Self::body(
            "email_already_registered",
            "Email already registered",
            400,
        ))
    }

    /// Create an InvalidCredentials error
    ///
    /// Used uniformly for "no such user" and "wrong password" so callers
    /// cannot enumerate accounts.
    pub fn invalid_credentials() -> Self {
        AuthError::InvalidCredentials(Self::body(
            "invalid_credentials",
            "Incorrect email or password",
            401,
        ))
    }

    /// Create an AccountDisabled error
    pub fn account_disabled() -> Self {
        AuthError::AccountDisabled(Self::body("account_disabled", "Account disabled", 403))
    }

    /// Create a WrongAccountType error
    pub fn wrong_account_type() -> Self {
        AuthError::WrongAccountType(Self::body(
            "wrong_account_type",
            "Account type does not match this login",
            403,
        ))
    }

    /// Create a ProfileMissing error
    pub fn profile_missing() -> Self {
        AuthError::ProfileMissing(Self::body(
            "profile_missing",
            "Account profile is missing",
            400,
        ))
    }

    /// Create an InvalidRefreshToken error
    pub fn invalid_refresh_token() -> Self {
        AuthError::InvalidRefreshToken(Self::body(
            "invalid_refresh_token",
            "Invalid refresh token",
            401,
        ))
    }

    /// Create a RefreshTokenExpired error
    pub fn refresh_token_expired() -> Self {
        AuthError::RefreshTokenExpired(Self::body(
            "refresh_token_expired",
            "Refresh token has expired",
            401,
        ))
    }

    /// Create an InvalidToken error
    pub fn invalid_token() -> Self {
        AuthError::InvalidToken(Self::body("invalid_token", "Invalid or malformed token", 401))
    }

    /// Create an ExpiredToken error
    pub fn expired_token() -> Self {
        AuthError::ExpiredToken(Self::body("expired_token", "Token has expired", 401))
    }

    /// Create an InternalError with a generic message
    pub fn internal_error() -> Self {
        AuthError::InternalError(Self::body("internal_error", "Internal server error", 500))
    }

    /// Stable machine-readable code for the error variant
    pub fn code(&self) -> &str {
        &self.response().error
    }

    /// Human-readable message for the error variant
    pub fn message(&self) -> &str {
        &self.response().message
    }

    fn response(&self) -> &AuthErrorResponse {
        match self {
            AuthError::ValidationError(json)
            | AuthError::EmailAlreadyRegistered(json)
            | AuthError::InvalidCredentials(json)
            | AuthError::AccountDisabled(json)
            | AuthError::WrongAccountType(json)
            | AuthError::ProfileMissing(json)
            | AuthError::InvalidRefreshToken(json)
            | AuthError::RefreshTokenExpired(json)
            | AuthError::InvalidToken(json)
            | AuthError::ExpiredToken(json)
            | AuthError::InternalError(json) => &json.0,
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl From<InternalError> for AuthError {
    fn from(err: InternalError) -> Self {
        match err {
            InternalError::UniqueViolation { field: "email" } => {
                AuthError::email_already_registered()
            }
            other => {
                tracing::error!(error = %other, "internal error in auth operation");
                AuthError::internal_error()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_credentials_is_generic_for_enumeration_safety() {
        let err = AuthError::invalid_credentials();
        assert_eq!(err.code(), "invalid_credentials");
        assert_eq!(err.message(), "Incorrect email or password");
    }

    #[test]
    fn unique_email_violation_maps_to_email_already_registered() {
        let err: AuthError = InternalError::UniqueViolation { field: "email" }.into();
        assert!(matches!(err, AuthError::EmailAlreadyRegistered(_)));
    }

    #[test]
    fn database_errors_map_to_generic_internal_error() {
        let err: AuthError = InternalError::crypto("hash_password", "boom").into();
        assert!(matches!(err, AuthError::InternalError(_)));
        assert_eq!(err.message(), "Internal server error");
    }
}
