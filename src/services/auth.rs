//! auth.rs
//!
//! Bearer-token verification for the coffee-shop API.
//!
//! 1.  **Header parsing**: pulls the token out of `Authorization: Bearer <token>`.
//! 2.  **KeyStore**: fetches the identity provider's JWKS over HTTP and keeps it
//!     in memory for a configurable TTL. A `kid` that is not in the cached set
//!     forces one refresh before the token is rejected.
//! 3.  **Verification**: RS256 signature, audience and issuer checks, then the
//!     `permissions` claim is searched for the scope a route requires.

use axum::http::{header, HeaderMap, StatusCode};
use jsonwebtoken::{
    decode, decode_header,
    errors::ErrorKind,
    jwk::{Jwk, JwkSet},
    Algorithm, DecodingKey, Validation,
};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::config::AuthConfig;

/// Authorization failure with the HTTP status it should be answered with.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{code}: {description}")]
pub struct AuthError {
    pub status: StatusCode,
    pub code: &'static str,
    pub description: String,
}

impl AuthError {
    pub fn new(status: StatusCode, code: &'static str, description: impl Into<String>) -> Self {
        Self {
            status,
            code,
            description: description.into(),
        }
    }

    fn invalid_header(status: StatusCode, description: &str) -> Self {
        Self::new(status, "invalid_header", description)
    }
}

/// Claims this API reads from an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub sub: String,
    pub exp: usize,
    #[serde(default)]
    pub permissions: Option<Vec<String>>,
}

impl Claims {
    pub fn check_permission(&self, permission: &str) -> Result<(), AuthError> {
        let permissions = self.permissions.as_ref().ok_or_else(|| {
            AuthError::new(
                StatusCode::BAD_REQUEST,
                "invalid_claims",
                "Permissions not included in JWT.",
            )
        })?;

        if !permissions.iter().any(|p| p == permission) {
            return Err(AuthError::new(
                StatusCode::FORBIDDEN,
                "unauthorized",
                "Permission not found.",
            ));
        }
        Ok(())
    }
}

/// Extracts the raw token from the `Authorization` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| {
            AuthError::new(
                StatusCode::UNAUTHORIZED,
                "authorization_header_missing",
                "Authorization header is expected.",
            )
        })?
        .to_str()
        .map_err(|_| {
            AuthError::invalid_header(StatusCode::UNAUTHORIZED, "Authorization header is not readable.")
        })?;

    let parts: Vec<&str> = auth.split_whitespace().collect();
    match parts.as_slice() {
        [scheme, token] if scheme.eq_ignore_ascii_case("bearer") => Ok(*token),
        [scheme, ..] if !scheme.eq_ignore_ascii_case("bearer") => Err(AuthError::invalid_header(
            StatusCode::UNAUTHORIZED,
            "Authorization header must start with \"Bearer\".",
        )),
        [_] => Err(AuthError::invalid_header(StatusCode::UNAUTHORIZED, "Token not found.")),
        _ => Err(AuthError::invalid_header(
            StatusCode::UNAUTHORIZED,
            "Authorization header must be bearer token.",
        )),
    }
}

/// Shortest gap between two key-set fetches caused by unknown `kid`s.
const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

fn key_not_found() -> AuthError {
    AuthError::invalid_header(StatusCode::BAD_REQUEST, "Unable to find the appropriate key.")
}

struct CachedKeys {
    keys: JwkSet,
    fetched_at: Instant,
}

/// JWKS cache plus the token expectations of one API.
pub struct KeyStore {
    http: reqwest::Client,
    jwks_url: String,
    audience: String,
    issuer: String,
    ttl: Duration,
    cached: RwLock<Option<CachedKeys>>,
}

impl KeyStore {
    pub fn from_config(config: &AuthConfig) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_default(),
            jwks_url: config.jwks_url.clone(),
            audience: config.audience.clone(),
            issuer: config.issuer.clone(),
            ttl: Duration::from_secs(config.jwks_cache_seconds),
            cached: RwLock::new(None),
        }
    }

    /// Verifies signature, expiry, audience and issuer, returning the claims.
    pub async fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let unverified = decode_header(token).map_err(|_| {
            AuthError::invalid_header(StatusCode::UNAUTHORIZED, "Unable to parse authentication token.")
        })?;
        let kid = unverified.kid.ok_or_else(|| {
            AuthError::invalid_header(StatusCode::UNAUTHORIZED, "Authorization malformed.")
        })?;

        let jwk = self.find_key(&kid).await?;
        let key = DecodingKey::from_jwk(&jwk).map_err(|_| key_not_found())?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.audience]);
        validation.set_issuer(&[&self.issuer]);

        decode::<Claims>(token, &key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => {
                    AuthError::new(StatusCode::UNAUTHORIZED, "token_expired", "Token expired.")
                }
                ErrorKind::InvalidAudience | ErrorKind::InvalidIssuer => AuthError::new(
                    StatusCode::UNAUTHORIZED,
                    "invalid_claims",
                    "Incorrect claims. Please, check the audience and issuer.",
                ),
                _ => AuthError::invalid_header(
                    StatusCode::BAD_REQUEST,
                    "Unable to parse authentication token.",
                ),
            })
    }

    async fn find_key(&self, kid: &str) -> Result<Jwk, AuthError> {
        if let Some(entry) = self.cached.read().await.as_ref() {
            if let Some(answer) = self.from_cache(entry, kid) {
                return answer;
            }
        }

        // One refresh at a time; waiters re-check what it stored
        let mut cached = self.cached.write().await;
        if let Some(entry) = cached.as_ref() {
            if let Some(answer) = self.from_cache(entry, kid) {
                return answer;
            }
        }

        match self.fetch_keys().await {
            Ok(keys) => {
                let found = keys.find(kid).cloned();
                *cached = Some(CachedKeys {
                    keys,
                    fetched_at: Instant::now(),
                });
                found.ok_or_else(key_not_found)
            }
            Err(e) => {
                // Provider unreachable: fall back to the stale set
                match cached.as_ref().and_then(|entry| entry.keys.find(kid)) {
                    Some(jwk) => {
                        warn!("Serving stale signing key {} after a failed refresh", kid);
                        Ok(jwk.clone())
                    }
                    None => Err(e),
                }
            }
        }
    }

    /// Answer from the cached set, or `None` when a refresh is due.
    fn from_cache(&self, entry: &CachedKeys, kid: &str) -> Option<Result<Jwk, AuthError>> {
        let age = entry.fetched_at.elapsed();
        match entry.keys.find(kid) {
            Some(jwk) if age < self.ttl => Some(Ok(jwk.clone())),
            // Unknown kids do not get to trigger fetches back to back
            None if age < MIN_REFRESH_INTERVAL => Some(Err(key_not_found())),
            _ => None,
        }
    }

    async fn fetch_keys(&self) -> Result<JwkSet, AuthError> {
        let unavailable = |e: reqwest::Error| {
            warn!("Failed to fetch JWKS from {}: {:?}", self.jwks_url, e);
            AuthError::invalid_header(StatusCode::UNAUTHORIZED, "Unable to fetch signing keys.")
        };

        let keys: JwkSet = self
            .http
            .get(&self.jwks_url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(unavailable)?
            .json()
            .await
            .map_err(unavailable)?;

        info!("Fetched {} signing keys from {}", keys.keys.len(), self.jwks_url);
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        map
    }

    #[test]
    fn bearer_token_is_extracted() {
        let map = headers("Bearer abc.def.ghi");
        assert_eq!(bearer_token(&map).unwrap(), "abc.def.ghi");
        let map = headers("bearer abc");
        assert_eq!(bearer_token(&map).unwrap(), "abc");
    }

    #[test]
    fn malformed_headers_are_rejected() {
        let err = bearer_token(&HeaderMap::new()).unwrap_err();
        assert_eq!(err.code, "authorization_header_missing");
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);

        let map = headers("Basic dXNlcjpwYXNz");
        assert_eq!(bearer_token(&map).unwrap_err().code, "invalid_header");

        let map = headers("Bearer");
        assert_eq!(bearer_token(&map).unwrap_err().description, "Token not found.");

        let map = headers("Bearer a b");
        assert_eq!(
            bearer_token(&map).unwrap_err().description,
            "Authorization header must be bearer token."
        );
    }

    #[test]
    fn unreadable_header_is_not_reported_as_missing() {
        let mut map = HeaderMap::new();
        map.insert(
            header::AUTHORIZATION,
            HeaderValue::from_bytes(b"Bearer caf\xe9").unwrap(),
        );
        let err = bearer_token(&map).unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(err.code, "invalid_header");
    }

    #[test]
    fn permission_check_distinguishes_missing_claim_from_missing_scope() {
        let mut claims = Claims {
            sub: "barista".into(),
            exp: 0,
            permissions: None,
        };
        let err = claims.check_permission("post:drinks").unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.code, "invalid_claims");

        claims.permissions = Some(vec!["get:drinks-detail".into()]);
        let err = claims.check_permission("post:drinks").unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
        assert!(claims.check_permission("get:drinks-detail").is_ok());
    }
}
