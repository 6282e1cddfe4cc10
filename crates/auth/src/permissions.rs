//! Permission scopes required by the protected routes.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Permission scope identifier.
///
/// Permissions are opaque strings granted by the identity provider
/// (e.g. "post:drinks") and carried in the token's `permissions` claim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    pub const GET_DRINKS_DETAIL: Permission = Permission(Cow::Borrowed("get:drinks-detail"));
    pub const POST_DRINKS: Permission = Permission(Cow::Borrowed("post:drinks"));
    pub const PATCH_DRINKS: Permission = Permission(Cow::Borrowed("patch:drinks"));
    pub const DELETE_DRINKS: Permission = Permission(Cow::Borrowed("delete:drinks"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
