//! User HTTP Routes
//!
//! Admin-only user management under `/api/users`.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Json, Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Router,
};
use serde_json::Value;

use super::response::{ApiResponse, ApiResult};
use super::state::AppState;
use crate::auth::User;

pub fn user_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/users", post(create_user_handler))
        .route("/users/:id", get(get_user_handler))
        .with_state(state)
}

async fn create_user_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ApiResponse<User>>)> {
    let Json(body) = body?;
    let actor = state.current_actor(&headers).await?;
    let user = state
        .run(move |service| service.create_user(actor.as_ref(), &body))
        .await?;
    Ok((StatusCode::CREATED, ApiResponse::ok("User successfully created", user)))
}

async fn get_user_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<User>>> {
    let actor = state.current_actor(&headers).await?;
    let user = state
        .run(move |service| service.get_user(actor.as_ref(), &id))
        .await?;
    Ok(ApiResponse::ok("User successfully fetched", user))
}
