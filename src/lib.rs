//! Latency-instrumented request gateway for clustered demo workloads
//!
//! One binary, several roles: a front-door gateway that forwards named
//! routes to backend services and reports per-call latency, two composite
//! backends (a sequential chain and a concurrent fan-out), and the leaf
//! workload simulators they call.

pub mod api;
pub mod backend;
pub mod config;
pub mod error;
pub mod gateway;
pub mod services;
pub mod workload;

pub use error::{AppError, Result};

use std::sync::Arc;

use crate::backend::BackendCaller;
use crate::config::Settings;
use crate::gateway::{Gateway, RouteTable};
use crate::services::{ChainDelegator, FanoutCoordinator};
use crate::workload::net::NetFetcher;

/// Application state shared across all handlers
///
/// Built once from static configuration and never mutated afterwards.
pub struct AppState {
    pub settings: Arc<Settings>,
    pub gateway: Gateway,
    pub chain: ChainDelegator,
    pub fanout: FanoutCoordinator,
    pub net: NetFetcher,
}

impl AppState {
    /// Wire every role's handler state around one backend caller
    pub fn new(settings: Settings, caller: Arc<dyn BackendCaller>) -> Result<Self> {
        let table = RouteTable::from_config(&settings.routes)?;

        Ok(Self {
            gateway: Gateway::new(table, caller.clone()),
            chain: ChainDelegator::new(caller.clone(), &settings.chain),
            fanout: FanoutCoordinator::new(caller, &settings.fanout),
            net: NetFetcher::new(&settings.workload.net, settings.client.timeout())?,
            settings: Arc::new(settings),
        })
    }
}
