use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use coffeeshop_auth::{AuthError, Permission, TokenVerifier, authorize};

use crate::app::errors::ApiError;

/// State for one guarded route: the verifier plus the permission it demands.
#[derive(Clone)]
pub struct PermissionGuard {
    pub verifier: Arc<dyn TokenVerifier>,
    pub required: Permission,
}

impl PermissionGuard {
    pub fn new(verifier: Arc<dyn TokenVerifier>, required: Permission) -> Self {
        Self { verifier, required }
    }
}

/// Reject the request unless it carries a valid bearer token granting
/// `guard.required`. On success the verified `Claims` are inserted into the
/// request extensions.
pub async fn require_permission(
    State(guard): State<PermissionGuard>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = match req.headers().get(AUTHORIZATION) {
        Some(value) => Some(
            value
                .to_str()
                .map_err(|_| AuthError::missing_header("Authorization header is expected."))?,
        ),
        None => None,
    };

    let claims = authorize(guard.verifier.as_ref(), header, &guard.required).map_err(|e| {
        tracing::warn!(
            kind = %e.kind,
            status = e.status,
            permission = %guard.required,
            method = %req.method(),
            path = %req.uri().path(),
            "request denied"
        );
        e
    })?;

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}
