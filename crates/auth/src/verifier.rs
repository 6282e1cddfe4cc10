//! Bearer token verification against the trusted key set.

use jsonwebtoken::errors::{Error as JwtError, ErrorKind};
use jsonwebtoken::{Algorithm, Validation, decode, decode_header};

use crate::{AuthError, Claims, TrustedKeys};

/// Expected token audience/issuer and the accepted signing algorithms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    pub audience: String,
    pub issuer: String,
    pub algorithms: Vec<Algorithm>,
}

impl AuthConfig {
    /// Defaults to RS256, which is what hosted identity providers sign with.
    pub fn new(audience: impl Into<String>, issuer: impl Into<String>) -> Self {
        Self {
            audience: audience.into(),
            issuer: issuer.into(),
            algorithms: vec![Algorithm::RS256],
        }
    }

    pub fn with_algorithms(mut self, algorithms: Vec<Algorithm>) -> Self {
        self.algorithms = algorithms;
        self
    }
}

/// Verifies a raw bearer token and returns its claims.
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<Claims, AuthError>;
}

/// Verifier backed by a JWKS key set.
///
/// Verification is two-pass: the header is decoded without verification only to
/// read `kid`, then the token is verified with the matching trusted key.
#[derive(Debug, Clone)]
pub struct JwksVerifier {
    keys: TrustedKeys,
    config: AuthConfig,
}

impl JwksVerifier {
    pub fn new(keys: TrustedKeys, config: AuthConfig) -> Self {
        Self { keys, config }
    }
}

impl TokenVerifier for JwksVerifier {
    fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let header =
            decode_header(token).map_err(|_| AuthError::invalid_header("Authorization malformed."))?;

        let kid = header
            .kid
            .as_deref()
            .ok_or_else(|| AuthError::invalid_header("Authorization malformed."))?;

        let key = self
            .keys
            .get(kid)
            .ok_or_else(|| AuthError::invalid_header("Unable to find the appropriate key."))?;

        if !self.config.algorithms.contains(&header.alg) {
            tracing::debug!(alg = ?header.alg, "token signed with disallowed algorithm");
            return Err(AuthError::invalid_header(
                "Unable to parse authentication token.",
            ));
        }

        let mut validation = Validation::new(header.alg);
        validation.set_audience(&[self.config.audience.as_str()]);
        validation.set_issuer(&[self.config.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "aud", "iss"]);

        let data = decode::<Claims>(token, key, &validation).map_err(map_decode_error)?;
        Ok(data.claims)
    }
}

fn map_decode_error(err: JwtError) -> AuthError {
    match err.kind() {
        ErrorKind::ExpiredSignature => AuthError::token_expired(),
        ErrorKind::InvalidAudience | ErrorKind::InvalidIssuer => AuthError::invalid_claims(),
        ErrorKind::MissingRequiredClaim(claim) if claim == "aud" || claim == "iss" => {
            AuthError::invalid_claims()
        }
        _ => {
            tracing::debug!(error = %err, "token decode failed");
            AuthError::invalid_header("Unable to parse authentication token.")
        }
    }
}
