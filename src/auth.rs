/// Authentication extractors
use crate::{context::AppContext, db::account::Account, error::ApiError};
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};

/// Pull the bearer token out of the Authorization header
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.to_string())
}

/// Authenticated context - extracts and validates the session token
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub account: Account,
}

#[async_trait]
impl FromRequestParts<AppContext> for AuthContext {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppContext,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers).ok_or_else(|| {
            ApiError::InvalidCredential("Missing authorization header".to_string())
        })?;

        let account = state.account_manager.validate_token(&token).await?;

        Ok(AuthContext { account })
    }
}

/// Admin context - requires an authenticated admin account
#[derive(Debug, Clone)]
pub struct AdminContext {
    pub account: Account,
}

#[async_trait]
impl FromRequestParts<AppContext> for AdminContext {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppContext,
    ) -> Result<Self, Self::Rejection> {
        let auth = AuthContext::from_request_parts(parts, state).await?;

        if !auth.account.is_admin() {
            return Err(ApiError::Forbidden(
                "Admin access required".to_string(),
            ));
        }

        Ok(AdminContext {
            account: auth.account,
        })
    }
}
