//! Target resolution: logical backend name to callable base URL

use reqwest::Url;
use std::collections::HashMap;

use crate::backend::traits::BackendTarget;
use crate::error::{AppError, Result};

/// Maps a [`BackendTarget`] to the URL an outbound call is sent to.
///
/// Called once per outbound call. Implementations must not cache socket
/// addresses; host names are handed to the connector as-is.
pub trait TargetResolver: Send + Sync {
    fn resolve(&self, target: &BackendTarget) -> Result<Url>;
}

/// Plain `http://name:port/` addressing, left to the OS resolver
#[derive(Debug, Clone, Default)]
pub struct DnsResolver;

impl TargetResolver for DnsResolver {
    fn resolve(&self, target: &BackendTarget) -> Result<Url> {
        let raw = format!("http://{}:{}/", target.name, target.port);
        Url::parse(&raw).map_err(|e| AppError::Resolve(format!("{}: {}", target, e)))
    }
}

/// Fixed name to base URL overrides, falling back to [`DnsResolver`]
///
/// Used to run the topology on one host, or to point targets at fake
/// backends in tests.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    overrides: HashMap<String, String>,
    fallback: DnsResolver,
}

impl StaticResolver {
    pub fn new(overrides: HashMap<String, String>) -> Self {
        Self {
            overrides,
            fallback: DnsResolver,
        }
    }

    /// Add or replace one override
    pub fn with_override(mut self, name: impl Into<String>, base_url: impl Into<String>) -> Self {
        self.overrides.insert(name.into(), base_url.into());
        self
    }
}

impl TargetResolver for StaticResolver {
    fn resolve(&self, target: &BackendTarget) -> Result<Url> {
        match self.overrides.get(&target.name) {
            Some(base_url) => Url::parse(base_url)
                .map_err(|e| AppError::Resolve(format!("{} -> {}: {}", target, base_url, e))),
            None => self.fallback.resolve(target),
        }
    }
}
