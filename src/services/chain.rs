//! Chain delegator: one nested call, relayed with a prefix

use axum::body::Bytes;
use std::sync::Arc;
use tracing::{info, warn};

use crate::backend::{spawn_call, BackendCaller, BackendTarget};
use crate::config::ChainConfig;

/// Backend that calls exactly one other backend and relays its answer
pub struct ChainDelegator {
    caller: Arc<dyn BackendCaller>,
    target: BackendTarget,
    prefix: String,
    error_prefix: String,
}

impl ChainDelegator {
    pub fn new(caller: Arc<dyn BackendCaller>, config: &ChainConfig) -> Self {
        Self {
            caller,
            target: config.target.clone(),
            prefix: config.prefix.clone(),
            error_prefix: config.error_prefix.clone(),
        }
    }

    pub fn target(&self) -> &BackendTarget {
        &self.target
    }

    /// Perform the nested call and compose the response body
    pub async fn handle(&self) -> Bytes {
        info!(backend = %self.target, "Chain calling downstream");
        let result = spawn_call(self.caller.clone(), self.target.clone()).await;

        let (lead, tail): (&str, &[u8]) = match result.error_description() {
            None => (self.prefix.as_str(), &result.body()[..]),
            Some(error) => {
                warn!(backend = %self.target, error = %error, "Chain downstream failed");
                (self.error_prefix.as_str(), error.as_bytes())
            }
        };

        let mut body = Vec::with_capacity(lead.len() + tail.len());
        body.extend_from_slice(lead.as_bytes());
        body.extend_from_slice(tail);
        Bytes::from(body)
    }
}
