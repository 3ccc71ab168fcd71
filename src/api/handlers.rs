//! Request handlers

use axum::{
    body::Bytes,
    extract::{MatchedPath, State},
    http::{
        header::{self, HeaderName},
        StatusCode,
    },
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::backend::CallResult;
use crate::error::Result;
use crate::gateway::LATENCY_HEADER;
use crate::workload;
use crate::AppState;

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// Relay a backend's body verbatim with the latency indicator attached.
///
/// Always `200 OK`; transport failures show up only in the body.
pub fn latency_response(result: CallResult) -> Response {
    let latency = result.latency_ms().to_string();
    (
        [
            (header::CONTENT_TYPE, TEXT_PLAIN.to_string()),
            (HeaderName::from_static(LATENCY_HEADER), latency),
        ],
        result.into_body(),
    )
        .into_response()
}

fn text(body: Bytes) -> Response {
    ([(header::CONTENT_TYPE, TEXT_PLAIN)], body).into_response()
}

/// Gateway route: forward to the backend mapped to the matched path
pub async fn forward(State(state): State<Arc<AppState>>, matched: MatchedPath) -> Response {
    match state.gateway.dispatch(matched.as_str()).await {
        Some(result) => latency_response(result),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

pub async fn chain(State(state): State<Arc<AppState>>) -> Response {
    text(state.chain.handle().await)
}

pub async fn fanout(State(state): State<Arc<AppState>>) -> Result<String> {
    state.fanout.handle().await
}

pub async fn cpu(State(state): State<Arc<AppState>>) -> Result<String> {
    workload::cpu::run(&state.settings.workload.cpu).await
}

pub async fn io(State(state): State<Arc<AppState>>) -> Result<String> {
    workload::io::run(&state.settings.workload.io).await
}

pub async fn mem(State(state): State<Arc<AppState>>) -> String {
    workload::mem::run(&state.settings.workload.mem).await
}

pub async fn net(State(state): State<Arc<AppState>>) -> String {
    state.net.run().await
}
