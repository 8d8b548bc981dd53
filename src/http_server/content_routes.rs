//! Content HTTP Routes
//!
//! Record CRUD under `/api/content/:name`.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Json, Path, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Router,
};
use serde_json::Value;

use super::response::{ApiResponse, ApiResult};
use super::state::AppState;
use crate::service::StoredRecord;

pub fn content_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/content/:name",
            get(list_records_handler).post(create_record_handler),
        )
        .route(
            "/content/:name/:id",
            get(read_record_handler)
                .put(update_record_handler)
                .delete(delete_record_handler),
        )
        .with_state(state)
}

async fn create_record_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(name): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ApiResponse<StoredRecord>>)> {
    let Json(body) = body?;
    let actor = state.current_actor(&headers).await?;
    let record = state
        .run(move |service| service.create_record(actor.as_ref(), &name, &body))
        .await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::ok("Content successfully created", record),
    ))
}

async fn list_records_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(name): Path<String>,
) -> ApiResult<Json<ApiResponse<Vec<StoredRecord>>>> {
    let actor = state.current_actor(&headers).await?;
    let records = state
        .run(move |service| service.list_records(actor.as_ref(), &name))
        .await?;
    Ok(ApiResponse::ok("Content successfully fetched", records))
}

async fn read_record_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path((name, id)): Path<(String, String)>,
) -> ApiResult<Json<ApiResponse<StoredRecord>>> {
    let actor = state.current_actor(&headers).await?;
    let record = state
        .run(move |service| service.read_record(actor.as_ref(), &name, &id))
        .await?;
    Ok(ApiResponse::ok("Content successfully fetched", record))
}

async fn update_record_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path((name, id)): Path<(String, String)>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<ApiResponse<StoredRecord>>> {
    let Json(body) = body?;
    let actor = state.current_actor(&headers).await?;
    let record = state
        .run(move |service| service.update_record(actor.as_ref(), &name, &id, &body))
        .await?;
    Ok(ApiResponse::ok("Content successfully updated", record))
}

async fn delete_record_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path((name, id)): Path<(String, String)>,
) -> ApiResult<Json<ApiResponse<()>>> {
    let actor = state.current_actor(&headers).await?;
    state
        .run(move |service| service.delete_record(actor.as_ref(), &name, &id))
        .await?;
    Ok(ApiResponse::done("Content successfully deleted"))
}
