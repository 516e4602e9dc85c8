//! Crash-safe file writes
//!
//! Writes go to a sibling temp file which is fsynced before it becomes
//! visible under the destination name, so readers see either no content,
//! the old content, or the complete new content.
//!
//! - [`write_atomic`] renames over the destination (replace)
//! - [`write_new_atomic`] hard-links onto the destination (create only)

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Temp file path used while writing `path`
pub fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Temp path private to one create-only write
fn unique_temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(format!(
        ".{}-{}.tmp",
        process::id(),
        TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
    ));
    PathBuf::from(name)
}

/// Create parent directories and drop a stale temp file for `path`
fn prepare(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let stale = temp_path_for(path);
    if stale.exists() {
        warn!(path = %stale.display(), "Removing stale temp file");
        let _ = fs::remove_file(&stale);
    }
    Ok(())
}

/// Write and fsync `bytes` at `temp_path`, removing it on failure
fn write_temp(temp_path: &Path, bytes: &[u8]) -> io::Result<()> {
    let written = File::create(temp_path).and_then(|mut file| {
        file.write_all(bytes)?;
        file.sync_all()
    });
    if written.is_err() {
        let _ = fs::remove_file(temp_path);
    }
    written
}

/// Atomically replace `path` with `bytes`
///
/// Parent directories are created on demand. A stale temp file left by an
/// earlier failed write is removed first.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let temp_path = temp_path_for(path);

    debug!(
        final_path = %path.display(),
        temp_path = %temp_path.display(),
        bytes = bytes.len(),
        "Starting atomic write"
    );

    prepare(path)?;
    write_temp(&temp_path, bytes)?;

    match fs::rename(&temp_path, path) {
        Ok(()) => {
            debug!(path = %path.display(), "Atomic rename completed");
            Ok(())
        }
        Err(e) => {
            warn!(
                temp_path = %temp_path.display(),
                error = %e,
                "Rename failed, cleaning up temp file"
            );
            let _ = fs::remove_file(&temp_path);
            Err(e)
        }
    }
}

/// Atomically create `path` with `bytes` unless it already exists
///
/// Returns `Ok(false)` and leaves the existing file untouched if another
/// writer got there first. Concurrent writers each use their own temp
/// file; exactly one of them claims the name.
pub fn write_new_atomic(path: &Path, bytes: &[u8]) -> io::Result<bool> {
    let temp_path = unique_temp_path_for(path);

    debug!(
        final_path = %path.display(),
        temp_path = %temp_path.display(),
        bytes = bytes.len(),
        "Starting create-only write"
    );

    prepare(path)?;
    write_temp(&temp_path, bytes)?;

    let linked = fs::hard_link(&temp_path, path);
    if let Err(e) = fs::remove_file(&temp_path) {
        warn!(temp_path = %temp_path.display(), error = %e, "Failed to remove temp file");
    }
    match linked {
        Ok(()) => {
            debug!(path = %path.display(), "Create-only write completed");
            Ok(true)
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            debug!(path = %path.display(), "Destination already exists");
            Ok(false)
        }
        Err(e) => Err(e),
    }
}
