//! Per-request authorization check.
//!
//! - No IO (key material is resolved up front)
//! - No HTTP framework types
//! - Fails closed: any doubt about the header or token is an `AuthError`

use crate::{AuthError, Claims, Permission, TokenVerifier};

/// Extract the token from a raw `Authorization` header value.
///
/// The header must be exactly `Bearer <token>` (scheme matched
/// case-insensitively).
pub fn extract_bearer(header: Option<&str>) -> Result<&str, AuthError> {
    let header =
        header.ok_or_else(|| AuthError::missing_header("Authorization header is expected."))?;

    let parts: Vec<&str> = header.split(' ').collect();

    if !parts[0].eq_ignore_ascii_case("bearer") {
        return Err(AuthError::missing_header(
            "Authorization header must start with \"Bearer\".",
        ));
    }
    if parts.len() == 1 || parts[1].is_empty() {
        return Err(AuthError::missing_header("Token not found."));
    }
    if parts.len() > 2 {
        return Err(AuthError::missing_header(
            "Authorization header must be bearer token.",
        ));
    }

    Ok(parts[1])
}

/// Assert that verified claims grant `required`.
pub fn check_permission(claims: &Claims, required: &Permission) -> Result<(), AuthError> {
    if claims.permissions.is_none() {
        return Err(AuthError::permissions_missing());
    }

    if claims.has_permission(required) {
        Ok(())
    } else {
        Err(AuthError::unauthorized())
    }
}

/// Full check for a protected route: header → verified claims → permission.
///
/// Returns the claims so the caller can pass them on as request context.
pub fn authorize(
    verifier: &dyn TokenVerifier,
    header: Option<&str>,
    required: &Permission,
) -> Result<Claims, AuthError> {
    let token = extract_bearer(header)?;
    let claims = verifier.verify(token)?;
    check_permission(&claims, required)?;
    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AuthErrorKind;
    use serde_json::Map;

    struct FixedVerifier(Result<Claims, AuthError>);

    impl TokenVerifier for FixedVerifier {
        fn verify(&self, _token: &str) -> Result<Claims, AuthError> {
            self.0.clone()
        }
    }

    fn claims(permissions: Option<&[&str]>) -> Claims {
        Claims {
            sub: Some("auth0|barista".to_string()),
            permissions: permissions.map(|p| p.iter().map(|s| s.to_string()).collect()),
            extra: Map::new(),
        }
    }

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(extract_bearer(Some("Bearer abc.def.ghi")).unwrap(), "abc.def.ghi");
        assert_eq!(extract_bearer(Some("bearer abc")).unwrap(), "abc");
    }

    #[test]
    fn missing_header_is_rejected() {
        let err = extract_bearer(None).unwrap_err();
        assert_eq!(err.kind, AuthErrorKind::MissingHeader);
        assert_eq!(err.status, 401);
    }

    #[test]
    fn malformed_headers_are_rejected() {
        for header in ["Basic abc", "Bearer", "Bearer ", "Bearer a b", "Token abc", ""] {
            let err = extract_bearer(Some(header)).unwrap_err();
            assert_eq!(err.kind, AuthErrorKind::MissingHeader, "header {header:?}");
            assert_eq!(err.status, 401);
        }
    }

    #[test]
    fn absent_permissions_claim_is_bad_request() {
        let err = check_permission(&claims(None), &Permission::POST_DRINKS).unwrap_err();
        assert_eq!(err.kind, AuthErrorKind::InvalidClaims);
        assert_eq!(err.status, 400);
    }

    #[test]
    fn missing_permission_is_forbidden() {
        let err =
            check_permission(&claims(Some(&["get:drinks-detail"])), &Permission::DELETE_DRINKS)
                .unwrap_err();
        assert_eq!(err.kind, AuthErrorKind::Unauthorized);
        assert_eq!(err.status, 403);
    }

    #[test]
    fn empty_permissions_claim_is_forbidden_not_bad_request() {
        let err = check_permission(&claims(Some(&[])), &Permission::POST_DRINKS).unwrap_err();
        assert_eq!(err.kind, AuthErrorKind::Unauthorized);
        assert_eq!(err.status, 403);
    }

    #[test]
    fn authorize_returns_claims_on_success() {
        let verifier = FixedVerifier(Ok(claims(Some(&["patch:drinks"]))));
        let claims = authorize(&verifier, Some("Bearer t"), &Permission::PATCH_DRINKS).unwrap();
        assert_eq!(claims.sub.as_deref(), Some("auth0|barista"));
    }

    #[test]
    fn authorize_short_circuits_before_verification() {
        let verifier = FixedVerifier(Ok(claims(Some(&["patch:drinks"]))));
        let err = authorize(&verifier, None, &Permission::PATCH_DRINKS).unwrap_err();
        assert_eq!(err.kind, AuthErrorKind::MissingHeader);
    }

    #[test]
    fn authorize_propagates_verifier_errors() {
        let verifier = FixedVerifier(Err(AuthError::token_expired()));
        let err = authorize(&verifier, Some("Bearer t"), &Permission::PATCH_DRINKS).unwrap_err();
        assert_eq!(err.kind, AuthErrorKind::TokenExpired);
    }
}
