//! Memory-growth workload

use std::time::Duration;
use tracing::info;

use crate::config::MemWorkload;
use crate::workload::MIB;

/// Allocations made while serving one request
#[derive(Debug, Default)]
pub struct AllocationContext {
    chunks: Vec<Vec<u8>>,
}

impl AllocationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate and touch `bytes` of memory
    pub fn allocate(&mut self, bytes: usize) {
        self.chunks.push(vec![1u8; bytes]);
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn total_bytes(&self) -> usize {
        self.chunks.iter().map(Vec::len).sum()
    }
}

/// Grow memory in steps, holding it until the response is built
pub async fn run(config: &MemWorkload) -> String {
    info!(chunks = config.chunks, chunk_mb = config.chunk_mb, "Growing memory");

    let mut context = AllocationContext::new();
    for _ in 0..config.chunks {
        context.allocate(config.chunk_mb * MIB);
        if config.pause_ms > 0 {
            tokio::time::sleep(Duration::from_millis(config.pause_ms)).await;
        }
    }

    format!(
        "Allocated {}MB. Total chunks: {}\n",
        context.total_bytes() / MIB,
        context.chunk_count()
    )
}
