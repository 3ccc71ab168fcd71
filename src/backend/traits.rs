//! Common traits and types for outbound backend calls

use async_trait::async_trait;
use axum::body::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::warn;

/// Logical identity of a backend service
///
/// Turned into a network address only at call time; nothing keeps a
/// resolved address around between calls.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BackendTarget {
    /// Service name, resolved by ordinary name resolution
    pub name: String,

    /// Service port
    pub port: u16,
}

impl BackendTarget {
    pub fn new(name: impl Into<String>, port: u16) -> Self {
        Self {
            name: name.into(),
            port,
        }
    }
}

impl fmt::Display for BackendTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.port)
    }
}

/// How an outbound call ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// Resolution, connect, timeout or mid-transfer failure
    TransportError(String),
}

/// Result of exactly one outbound call
#[derive(Debug, Clone)]
pub struct CallResult {
    body: Bytes,
    duration: Duration,
    outcome: Outcome,
}

impl CallResult {
    /// A call that returned a fully read body
    pub fn success(body: impl Into<Bytes>, duration: Duration) -> Self {
        Self {
            body: body.into(),
            duration,
            outcome: Outcome::Success,
        }
    }

    /// A call that failed at the transport level.
    ///
    /// The body carries `Error: <description>` so it can be relayed verbatim.
    pub fn transport_error(description: impl Into<String>, duration: Duration) -> Self {
        let description = description.into();
        Self {
            body: Bytes::from(format!("Error: {}", description)),
            duration,
            outcome: Outcome::TransportError(description),
        }
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn into_body(self) -> Bytes {
        self.body
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Success)
    }

    /// Failure description for transport errors
    pub fn error_description(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Success => None,
            Outcome::TransportError(description) => Some(description),
        }
    }

    /// Latency indicator in whole milliseconds
    pub fn latency_ms(&self) -> u64 {
        u64::try_from(self.duration.as_millis()).unwrap_or(u64::MAX)
    }
}

/// Issues one outbound call to a backend
///
/// Implementations never fail: transport problems come back as a
/// [`CallResult`] with [`Outcome::TransportError`].
#[async_trait]
pub trait BackendCaller: Send + Sync {
    async fn call(&self, target: &BackendTarget) -> CallResult;
}

/// Start one call on its own task.
///
/// The call begins immediately. The returned future only waits for its
/// result; dropping it leaves the call running to completion or to its own
/// transport failure.
pub fn spawn_call(
    caller: Arc<dyn BackendCaller>,
    target: BackendTarget,
) -> impl Future<Output = CallResult> + Send {
    let started = Instant::now();
    let label = target.to_string();
    let handle = tokio::spawn(async move { caller.call(&target).await });

    async move {
        match handle.await {
            Ok(result) => result,
            Err(e) => {
                warn!(backend = %label, error = %e, "Backend call task aborted");
                CallResult::transport_error(format!("task failed: {}", e), started.elapsed())
            }
        }
    }
}
