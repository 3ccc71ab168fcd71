//! Disk-bound workload: write a scratch file, then remove it

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::IoWorkload;
use crate::error::{AppError, Result};
use crate::workload::MIB;

fn write_scratch(path: &Path, size_mb: u64, sync: bool) -> io::Result<()> {
    let file = File::create(path)?;
    fill_scratch(path, file, size_mb, |f: &mut File| {
        if sync {
            f.sync_data()
        } else {
            Ok(())
        }
    })
}

/// Write `size_mb` MiB through `out`, then remove `path` whether or not the
/// write succeeded. The write error wins over the removal error.
fn fill_scratch<W: Write>(
    path: &Path,
    out: W,
    size_mb: u64,
    after_chunk: impl FnMut(&mut W) -> io::Result<()>,
) -> io::Result<()> {
    let written = write_chunks(out, size_mb, after_chunk);
    let removed = fs::remove_file(path);
    written.and(removed)
}

fn write_chunks<W: Write>(
    mut out: W,
    size_mb: u64,
    mut after_chunk: impl FnMut(&mut W) -> io::Result<()>,
) -> io::Result<()> {
    let chunk = vec![0u8; MIB];
    for _ in 0..size_mb {
        out.write_all(&chunk)?;
        after_chunk(&mut out)?;
    }
    out.flush()
}

/// Write `size_mb` MiB to the configured path on the blocking pool
pub async fn run(config: &IoWorkload) -> Result<String> {
    let path = PathBuf::from(&config.path);
    let size_mb = config.size_mb;
    let sync = config.sync;
    info!(path = %path.display(), size_mb, sync, "Writing to disk");

    let written = tokio::task::spawn_blocking(move || write_scratch(&path, size_mb, sync))
        .await
        .map_err(|e| AppError::Workload(format!("disk writer crashed: {}", e)))?;

    if let Err(e) = written {
        warn!(error = %e, "Disk write failed");
        return Err(AppError::Io(e));
    }

    Ok("I/O Stress Test Done\n".to_string())
}
