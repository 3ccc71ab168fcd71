//! HTTP backend caller implementation

use async_trait::async_trait;
use reqwest::Client;
use std::error::Error as StdError;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::backend::resolver::{StaticResolver, TargetResolver};
use crate::backend::traits::{BackendCaller, BackendTarget, CallResult};
use crate::config::Settings;
use crate::error::{AppError, Result};

/// Plain HTTP `GET /` caller
pub struct HttpCaller {
    client: Client,
    resolver: Arc<dyn TargetResolver>,
}

impl HttpCaller {
    /// Create a caller with an optional per-call timeout.
    ///
    /// Idle connections are never pooled, so every call resolves its target
    /// again and its connection is closed before `call` returns.
    pub fn new(resolver: Arc<dyn TargetResolver>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder().pool_max_idle_per_host(0);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, resolver })
    }

    /// Create a caller from the `client` and `resolver` settings
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let resolver = StaticResolver::new(settings.resolver.overrides.clone());
        Self::new(Arc::new(resolver), settings.client.timeout())
    }
}

#[async_trait]
impl BackendCaller for HttpCaller {
    async fn call(&self, target: &BackendTarget) -> CallResult {
        let start = Instant::now();

        let url = match self.resolver.resolve(target) {
            Ok(url) => url,
            Err(e) => {
                warn!(backend = %target, error = %e, "Target resolution failed");
                return CallResult::transport_error(e.to_string(), start.elapsed());
            }
        };

        debug!(backend = %target, url = %url, "Calling backend");

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                let description = describe(&e);
                warn!(backend = %target, error = %description, "Backend call failed");
                return CallResult::transport_error(description, start.elapsed());
            }
        };

        let status = response.status();
        match response.bytes().await {
            Ok(body) => {
                let duration = start.elapsed();
                debug!(
                    backend = %target,
                    status = %status,
                    bytes = body.len(),
                    elapsed_ms = duration.as_millis() as u64,
                    "Backend call completed"
                );
                CallResult::success(body, duration)
            }
            Err(e) => {
                let description = describe(&e);
                warn!(backend = %target, error = %description, "Backend body read failed");
                CallResult::transport_error(description, start.elapsed())
            }
        }
    }
}

/// Flatten an error and its sources into one line
fn describe(err: &(dyn StdError + 'static)) -> String {
    let mut description = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !description.contains(&text) {
            description.push_str(": ");
            description.push_str(&text);
        }
        source = cause.source();
    }
    description
}
