//! Network-bound workload: one request to an external URL

use reqwest::Client;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::NetWorkload;
use crate::error::Result;

/// Outbound fetch of a fixed URL
pub struct NetFetcher {
    client: Client,
    url: String,
}

impl NetFetcher {
    pub fn new(config: &NetWorkload, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            url: config.url.clone(),
        })
    }

    /// Fetch the URL and report its status line
    pub async fn run(&self) -> String {
        info!(url = %self.url, "Calling external service");

        match self.client.get(&self.url).send().await {
            Ok(response) => format!("Network Task Done. Status: {}\n", response.status()),
            Err(e) => {
                warn!(url = %self.url, error = %e, "External call failed");
                format!("Error: {}\n", e)
            }
        }
    }
}
