//! `coffeeshop-auth`: bearer token authentication and permission checks.
//!
//! This crate has no HTTP or storage types. It takes a raw
//! header value and returns verified claims or an `AuthError` carrying the
//! status it should be reported with.

pub mod authorize;
pub mod claims;
pub mod error;
pub mod keys;
pub mod permissions;
pub mod verifier;

pub use authorize::{authorize, check_permission, extract_bearer};
pub use claims::Claims;
pub use error::{AuthError, AuthErrorKind};
pub use keys::{KeySetError, TrustedKeys};
pub use permissions::Permission;
pub use verifier::{AuthConfig, JwksVerifier, TokenVerifier};

pub use jsonwebtoken::Algorithm;
