//! Static path-to-backend routing with latency instrumentation

use std::sync::Arc;
use tracing::{info, warn};

use crate::backend::{spawn_call, BackendCaller, BackendTarget, CallResult};
use crate::config::settings::validate_routes;
use crate::config::RouteConfig;
use crate::error::Result;

/// Response header carrying the latency indicator, in milliseconds
pub const LATENCY_HEADER: &str = "x-backend-latency";

/// A gateway route
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub path: String,
    pub target: BackendTarget,
}

/// Immutable routing table, built once at startup
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// Build a validated table from configuration
    pub fn from_config(routes: &[RouteConfig]) -> Result<Self> {
        validate_routes(routes)?;

        Ok(Self {
            routes: routes
                .iter()
                .map(|r| Route {
                    path: r.path.clone(),
                    target: r.target.clone(),
                })
                .collect(),
        })
    }

    pub fn lookup(&self, path: &str) -> Option<&BackendTarget> {
        self.routes
            .iter()
            .find(|route| route.path == path)
            .map(|route| &route.target)
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Front-door router
///
/// Holds no per-request state; every dispatch issues exactly one call.
#[derive(Clone)]
pub struct Gateway {
    table: Arc<RouteTable>,
    caller: Arc<dyn BackendCaller>,
}

impl Gateway {
    pub fn new(table: RouteTable, caller: Arc<dyn BackendCaller>) -> Self {
        Self {
            table: Arc::new(table),
            caller,
        }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Forward a request for `path` to its backend.
    ///
    /// Returns `None` when the path is not in the table. The outbound call
    /// keeps running even if the inbound request goes away.
    pub async fn dispatch(&self, path: &str) -> Option<CallResult> {
        let target = self.table.lookup(path)?;
        let result = spawn_call(self.caller.clone(), target.clone()).await;

        match result.error_description() {
            None => info!(
                path = %path,
                backend = %target,
                latency_ms = result.latency_ms(),
                "Request forwarded"
            ),
            Some(error) => warn!(
                path = %path,
                backend = %target,
                latency_ms = result.latency_ms(),
                error = %error,
                "Backend unreachable, relaying error text"
            ),
        }

        Some(result)
    }
}
