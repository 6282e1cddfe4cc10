//! Verified token payload.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::Permission;

/// Decoded token payload.
///
/// Only the claims this service reads are typed; everything else the identity
/// provider issues is kept in `extra` and handed to handlers untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject / principal identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Permission scopes granted to the token. `None` when the claim is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Claims {
    pub fn has_permission(&self, permission: &Permission) -> bool {
        self.permissions
            .as_deref()
            .is_some_and(|granted| granted.iter().any(|p| p == permission.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_claims_are_preserved() {
        let claims: Claims = serde_json::from_value(json!({
            "sub": "auth0|barista",
            "permissions": ["post:drinks"],
            "aud": "drinks",
            "exp": 1_700_000_000
        }))
        .unwrap();

        assert_eq!(claims.sub.as_deref(), Some("auth0|barista"));
        assert_eq!(claims.extra["aud"], "drinks");
        assert_eq!(claims.extra["exp"], 1_700_000_000);
        assert!(claims.has_permission(&Permission::POST_DRINKS));
        assert!(!claims.has_permission(&Permission::DELETE_DRINKS));
    }

    #[test]
    fn absent_permissions_claim_grants_nothing() {
        let claims: Claims = serde_json::from_value(json!({"sub": "x"})).unwrap();
        assert!(claims.permissions.is_none());
        assert!(!claims.has_permission(&Permission::GET_DRINKS_DETAIL));
    }
}
