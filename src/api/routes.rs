//! Router assembly per service role

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::api::handlers;
use crate::config::ServiceRole;
use crate::AppState;

/// Build the router for the configured role.
///
/// Paths outside the role's table fall through to axum's default 404.
pub fn create_router(state: Arc<AppState>) -> Router {
    let router = match state.settings.service.role {
        ServiceRole::Gateway => gateway_routes(&state),
        ServiceRole::Chain => Router::new().route("/", get(handlers::chain)),
        ServiceRole::Fanout => Router::new().route("/", get(handlers::fanout)),
        ServiceRole::Cpu => Router::new().route("/", get(handlers::cpu)),
        ServiceRole::Io => Router::new().route("/", get(handlers::io)),
        ServiceRole::Mem => Router::new().route("/", get(handlers::mem)),
        ServiceRole::Net => Router::new().route("/", get(handlers::net)),
    };

    router
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

fn gateway_routes(state: &AppState) -> Router<Arc<AppState>> {
    state
        .gateway
        .table()
        .routes()
        .iter()
        .fold(Router::new(), |router, route| {
            router.route(&route.path, get(handlers::forward))
        })
}
