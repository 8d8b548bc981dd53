//! Shared handler state
//!
//! Service calls touch SQLite, so handlers run them on the blocking pool.

use std::sync::Arc;

use axum::http::HeaderMap;
use tracing::debug;

use super::response::{ApiError, ApiResult};
use crate::auth::{Actor, TokenIssuer, User};
use crate::service::{CmsService, ServiceError, ServiceResult};
use crate::store::SqliteStore;

pub type SharedService = Arc<CmsService<SqliteStore>>;

pub struct AppState {
    pub service: SharedService,
    pub tokens: TokenIssuer,
}

impl AppState {
    pub fn new(service: SharedService, tokens: TokenIssuer) -> Self {
        Self { service, tokens }
    }

    /// Runs a service operation off the async executor.
    pub async fn run<T, F>(&self, op: F) -> ApiResult<T>
    where
        F: FnOnce(&CmsService<SqliteStore>) -> ServiceResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let service = Arc::clone(&self.service);
        tokio::task::spawn_blocking(move || op(&service))
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))?
            .map_err(ApiError::from)
    }

    /// The user behind the request's bearer token, if any.
    ///
    /// No token means an anonymous request. A token that fails validation
    /// is rejected outright rather than downgraded to anonymous.
    pub async fn current_user(&self, headers: &HeaderMap) -> ApiResult<Option<User>> {
        let Some(token) = extract_bearer_token(headers) else {
            return Ok(None);
        };

        let claims = self.tokens.verify(token).map_err(ServiceError::from)?;
        let user_id = claims.user_id().map_err(ServiceError::from)?;
        debug!(user = user_id, jti = %claims.jti, "bearer token accepted");
        self.run(move |service| service.resolve_user(user_id))
            .await
            .map(Some)
    }

    pub async fn current_actor(&self, headers: &HeaderMap) -> ApiResult<Option<Actor>> {
        Ok(self.current_user(headers).await?.map(|user| user.actor()))
    }
}

/// Extract Bearer token from Authorization header
fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
}
