//! Auth HTTP Routes
//!
//! Login issues a bearer token; `/auth/me` reports who the token belongs
//! to. Tokens are stateless, so there is no logout endpoint.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Json, State},
    http::HeaderMap,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use serde_json::Value;

use super::response::{ApiResponse, ApiResult};
use super::state::AppState;
use crate::auth::{TokenResponse, UserError};
use crate::service::ServiceError;

pub fn auth_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/login", post(login_handler))
        .route("/me", get(me_handler))
        .with_state(state)
}

#[derive(Debug, Serialize)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
}

/// Pulls `username` and `password` out of a login body.
fn credentials(body: &Value) -> Result<(String, String), ServiceError> {
    let field = |key: &str| {
        body.get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };
    match (field("username"), field("password")) {
        (Some(username), Some(password)) => Ok((username, password)),
        _ => Err(UserError::FieldsMissing.into()),
    }
}

async fn login_handler(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<ApiResponse<TokenResponse>>> {
    let Json(body) = body?;
    let (username, password) = credentials(&body)?;
    let user = state
        .run(move |service| service.authenticate(&username, &password))
        .await?;

    let issued = state.tokens.issue(&user).map_err(ServiceError::from)?;
    let response = TokenResponse::new(issued, user.username);
    Ok(ApiResponse::ok("Log in successful", response))
}

async fn me_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<Json<ApiResponse<Option<CurrentUser>>>> {
    match state.current_user(&headers).await? {
        Some(user) => Ok(ApiResponse::ok(
            "A user is logged in",
            Some(CurrentUser {
                id: user.id,
                username: user.username,
            }),
        )),
        None => Ok(ApiResponse::ok("No user is logged in", None)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_credentials() {
        let body = json!({ "username": "bilbo", "password": "baggins" });
        assert_eq!(
            credentials(&body).unwrap(),
            ("bilbo".to_string(), "baggins".to_string())
        );

        for body in [json!({ "username": "bilbo" }), json!({ "username": "", "password": "x" })] {
            assert_eq!(
                credentials(&body),
                Err(ServiceError::UserInvalid(UserError::FieldsMissing))
            );
        }
    }
}
