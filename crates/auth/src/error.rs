//! Authentication/authorization failures and the status each is reported with.

use thiserror::Error;

/// Classification of an authentication/authorization failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthErrorKind {
    /// No usable `Authorization: Bearer <token>` header.
    MissingHeader,
    /// The token could not be matched to a trusted key or decoded.
    InvalidHeader,
    TokenExpired,
    /// Audience/issuer mismatch, or the permissions claim is absent.
    InvalidClaims,
    /// Valid token without the required permission.
    Unauthorized,
}

impl AuthErrorKind {
    pub fn code(self) -> &'static str {
        match self {
            AuthErrorKind::MissingHeader => "authorization_header_missing",
            AuthErrorKind::InvalidHeader => "invalid_header",
            AuthErrorKind::TokenExpired => "token_expired",
            AuthErrorKind::InvalidClaims => "invalid_claims",
            AuthErrorKind::Unauthorized => "unauthorized",
        }
    }
}

impl core::fmt::Display for AuthErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

/// Authentication/authorization failure.
///
/// Carries the HTTP status it should be reported with, but stays free of any
/// HTTP framework types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{kind} ({status}): {message}")]
pub struct AuthError {
    pub kind: AuthErrorKind,
    pub status: u16,
    pub message: String,
}

impl AuthError {
    pub fn new(kind: AuthErrorKind, status: u16, message: impl Into<String>) -> Self {
        Self {
            kind,
            status,
            message: message.into(),
        }
    }

    pub fn missing_header(message: impl Into<String>) -> Self {
        Self::new(AuthErrorKind::MissingHeader, 401, message)
    }

    pub fn invalid_header(message: impl Into<String>) -> Self {
        Self::new(AuthErrorKind::InvalidHeader, 401, message)
    }

    pub fn token_expired() -> Self {
        Self::new(AuthErrorKind::TokenExpired, 401, "Token expired.")
    }

    pub fn invalid_claims() -> Self {
        Self::new(
            AuthErrorKind::InvalidClaims,
            401,
            "Incorrect claims. Please, check the audience and issuer.",
        )
    }

    pub fn permissions_missing() -> Self {
        Self::new(
            AuthErrorKind::InvalidClaims,
            400,
            "Permissions not included in JWT.",
        )
    }

    pub fn unauthorized() -> Self {
        Self::new(AuthErrorKind::Unauthorized, 403, "Permission not found.")
    }
}
