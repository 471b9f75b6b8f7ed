//! Riddle operations: list, create, random, read, patch, delete.

use crate::error::AppError;
use crate::extractors::{PeerAddr, RequestOrigin};
use crate::representation::{LinkBuilder, Operation};
use crate::routes::dispatch::{resolve, Route};
use crate::service::{RequestValidator, RiddlePatch};
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};

/// Single entry point for everything under the collection path.
pub async fn dispatch(
    State(state): State<AppState>,
    peer: PeerAddr,
    origin: RequestOrigin,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Result<Response, AppError> {
    let route = resolve(&method, uri.path())?;
    let links = LinkBuilder::new(state.base_url.as_deref(), &origin);
    if route.is_mutating() {
        return state
            .allow_list
            .guard(peer, run(&state, &links, route, &body))
            .await;
    }
    run(&state, &links, route, &body).await
}

async fn run(state: &AppState, links: &LinkBuilder, route: Route, body: &[u8]) -> Result<Response, AppError> {
    match route {
        Route::List => list(state, links).await,
        Route::Create => create(state, links, body).await,
        Route::Random => random(state, links).await,
        Route::Read(id) => read(state, links, id).await,
        Route::Patch(id) => patch(state, links, id, body).await,
        Route::Delete(id) => delete(state, links, id).await,
    }
}

pub async fn list(state: &AppState, links: &LinkBuilder) -> Result<Response, AppError> {
    let rows = state.store.list_published().await.map_err(|e| {
        tracing::error!(error = %e, handler = "list", "error listing published riddles");
        e
    })?;
    tracing::info!(count = rows.len(), handler = "list", "listed published riddles");
    let data: Vec<_> = rows
        .into_iter()
        .map(|r| links.riddle(r, Operation::List))
        .collect();
    Ok((StatusCode::OK, Json(data)).into_response())
}

pub async fn create(state: &AppState, links: &LinkBuilder, body: &[u8]) -> Result<Response, AppError> {
    let new = RequestValidator::new_riddle(body)?;
    let id = state.store.insert(&new).await.map_err(|e| {
        tracing::error!(error = %e, handler = "create", "error inserting new riddle");
        e
    })?;
    tracing::info!(id, handler = "create", "riddle created");
    let data = links.riddle(new.into_record(id), Operation::Create);
    Ok((StatusCode::CREATED, Json(data)).into_response())
}

pub async fn random(state: &AppState, links: &LinkBuilder) -> Result<Response, AppError> {
    let row = state.store.fetch_random_published().await.map_err(|e| {
        tracing::error!(error = %e, handler = "random", "error fetching random riddle");
        e
    })?;
    tracing::info!(id = row.id, handler = "random", "fetched random riddle");
    Ok((StatusCode::OK, Json(links.riddle(row, Operation::Fetch))).into_response())
}

pub async fn read(state: &AppState, links: &LinkBuilder, id: i32) -> Result<Response, AppError> {
    let row = state.store.fetch_by_id(id).await?.ok_or_else(|| {
        tracing::warn!(id, handler = "read", "riddle not found");
        AppError::NotFound("riddle not found".into())
    })?;
    tracing::info!(id, handler = "read", "fetched riddle");
    Ok((StatusCode::OK, Json(links.riddle(row, Operation::Fetch))).into_response())
}

/// Zero rows affected (unknown id) still answers 200; existence is not checked here.
pub async fn patch(
    state: &AppState,
    links: &LinkBuilder,
    id: i32,
    body: &[u8],
) -> Result<Response, AppError> {
    let patch = RiddlePatch::from_body(body)?;
    if patch.is_empty() {
        return Err(AppError::BadRequest("no fields to update".into()));
    }
    let affected = state.store.update(id, &patch).await.map_err(|e| {
        tracing::error!(id, error = %e, handler = "patch", "error updating riddle");
        e
    })?;
    if affected == 0 {
        tracing::warn!(id, handler = "patch", "patch matched no riddle");
    }
    tracing::info!(id, fields = ?patch.columns(), handler = "patch", "riddle updated");
    Ok((StatusCode::OK, Json(links.patched(id))).into_response())
}

pub async fn delete(state: &AppState, links: &LinkBuilder, id: i32) -> Result<Response, AppError> {
    let affected = state.store.delete(id).await.map_err(|e| {
        tracing::error!(id, error = %e, handler = "delete", "error deleting riddle");
        e
    })?;
    if affected == 0 {
        tracing::warn!(id, handler = "delete", "id not matching any riddle for deletion");
        return Err(AppError::NotFound("invalid id".into()));
    }
    tracing::info!(id, handler = "delete", "riddle deleted");
    Ok((StatusCode::OK, Json(links.deleted())).into_response())
}
