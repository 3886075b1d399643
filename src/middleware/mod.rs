use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::ApiError;
use crate::services::auth::{bearer_token, Claims};

/// A permission string a route requires in the token's `permissions` claim.
pub trait Scope {
    const PERMISSION: &'static str;
}

pub struct GetDrinksDetail;
pub struct PostDrinks;
pub struct PatchDrinks;
pub struct DeleteDrinks;

impl Scope for GetDrinksDetail {
    const PERMISSION: &'static str = "get:drinks-detail";
}

impl Scope for PostDrinks {
    const PERMISSION: &'static str = "post:drinks";
}

impl Scope for PatchDrinks {
    const PERMISSION: &'static str = "patch:drinks";
}

impl Scope for DeleteDrinks {
    const PERMISSION: &'static str = "delete:drinks";
}

/// Caller whose bearer token carries the permission `S`.
///
/// `claims` is `None` when auth is switched off in the feature flags.
pub struct Authorized<S> {
    pub claims: Option<Claims>,
    _scope: PhantomData<S>,
}

impl<S> Authorized<S> {
    fn new(claims: Option<Claims>) -> Self {
        Self {
            claims,
            _scope: PhantomData,
        }
    }
}

// Bearer token extractor
impl<S> FromRequestParts<Arc<crate::AppState>> for Authorized<S>
where
    S: Scope + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<crate::AppState>,
    ) -> Result<Self, Self::Rejection> {
        if !state.config.features.enable_auth {
            return Ok(Authorized::new(None));
        }

        // Auth is on but the provider was never configured
        let keys = state.keys.as_ref().ok_or(ApiError::Unauthorized)?;

        let token = bearer_token(&parts.headers)?;
        let claims = keys.verify(token).await.map_err(|e| {
            tracing::debug!("token rejected for {}: {}", S::PERMISSION, e);
            e
        })?;
        claims.check_permission(S::PERMISSION)?;

        tracing::debug!("{} granted to {}", S::PERMISSION, claims.sub);
        Ok(Authorized::new(Some(claims)))
    }
}
