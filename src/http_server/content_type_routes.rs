//! Content Type HTTP Routes
//!
//! Schema management under `/api`. Creating and dropping are admin-only.

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
use crate::schema::ContentTypeDefinition;

pub fn content_type_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/content-type", post(create_content_type_handler))
        .route(
            "/content-type/:name",
            get(get_content_type_handler).delete(drop_content_type_handler),
        )
        .route("/content-types", get(list_content_types_handler))
        .with_state(state)
}

async fn create_content_type_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ApiResponse<ContentTypeDefinition>>)> {
    let Json(body) = body?;
    let actor = state.current_actor(&headers).await?;
    let definition = state
        .run(move |service| service.create_content_type(actor.as_ref(), &body))
        .await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::ok("Content type successfully created", definition),
    ))
}

async fn get_content_type_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(name): Path<String>,
) -> ApiResult<Json<ApiResponse<ContentTypeDefinition>>> {
    let actor = state.current_actor(&headers).await?;
    let definition = state
        .run(move |service| service.get_content_type(actor.as_ref(), &name))
        .await?;
    Ok(ApiResponse::ok("Content type successfully fetched", definition))
}

async fn list_content_types_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<Json<ApiResponse<Vec<ContentTypeDefinition>>>> {
    let actor = state.current_actor(&headers).await?;
    let definitions = state
        .run(move |service| service.list_content_types(actor.as_ref()))
        .await?;
    Ok(ApiResponse::ok("Content types successfully fetched", definitions))
}

async fn drop_content_type_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(name): Path<String>,
) -> ApiResult<Json<ApiResponse<()>>> {
    let actor = state.current_actor(&headers).await?;
    state
        .run(move |service| service.drop_content_type(actor.as_ref(), &name))
        .await?;
    Ok(ApiResponse::done("Content type successfully deleted"))
}
