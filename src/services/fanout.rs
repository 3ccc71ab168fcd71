//! Fan-out coordinator: concurrent nested calls joined by a barrier

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use crate::backend::{spawn_call, BackendCaller, BackendTarget, CallResult};
use crate::config::FanoutConfig;
use crate::error::{AppError, Result};

/// What the coordinator does with failed nested calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Nested outcomes are ignored; the acknowledgement is always sent
    #[default]
    Discard,
    /// Any nested transport error fails the whole request
    Propagate,
}

/// One request's worth of concurrent calls
///
/// Lives only for the duration of [`FanoutJob::run`].
#[derive(Debug, Clone)]
pub struct FanoutJob {
    targets: Vec<BackendTarget>,
}

impl FanoutJob {
    pub fn new(targets: Vec<BackendTarget>) -> Self {
        Self { targets }
    }

    pub fn targets(&self) -> &[BackendTarget] {
        &self.targets
    }

    /// Spawn one task per target and wait for every one of them.
    ///
    /// Results come back in target order. A task that dies without producing
    /// a result is reported as a transport error so the join never comes up
    /// short.
    pub async fn run(&self, caller: Arc<dyn BackendCaller>) -> Vec<CallResult> {
        let calls: Vec<_> = self
            .targets
            .iter()
            .cloned()
            .map(|target| spawn_call(caller.clone(), target))
            .collect();

        futures::future::join_all(calls).await
    }
}

/// Backend that broadcasts to a fixed set of services before answering
pub struct FanoutCoordinator {
    caller: Arc<dyn BackendCaller>,
    targets: Vec<BackendTarget>,
    policy: FailurePolicy,
    acknowledgement: String,
}

impl FanoutCoordinator {
    pub fn new(caller: Arc<dyn BackendCaller>, config: &FanoutConfig) -> Self {
        Self {
            caller,
            targets: config.targets.clone(),
            policy: config.failure_policy,
            acknowledgement: config.acknowledgement.clone(),
        }
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Run a fresh job and answer according to the failure policy
    pub async fn handle(&self) -> Result<String> {
        let job = FanoutJob::new(self.targets.clone());
        info!(targets = job.targets().len(), "Fan-out broadcasting");

        let results = job.run(self.caller.clone()).await;

        let failures: Vec<String> = job
            .targets()
            .iter()
            .zip(&results)
            .filter_map(|(target, result)| {
                debug!(
                    backend = %target,
                    success = result.is_success(),
                    latency_ms = result.latency_ms(),
                    "Fan-out member finished"
                );
                result
                    .error_description()
                    .map(|error| format!("{}: {}", target, error))
            })
            .collect();

        match self.policy {
            FailurePolicy::Propagate if !failures.is_empty() => {
                Err(AppError::Downstream(failures.join("; ")))
            }
            _ => Ok(self.acknowledgement.clone()),
        }
    }
}
