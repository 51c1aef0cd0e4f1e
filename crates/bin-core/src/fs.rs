//! Filesystem utilities for atomic writes.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Write `data` to `destination` through a sibling temp file and a rename.
///
/// The destination either keeps its previous contents or holds the complete
/// new contents; a failed write never leaves a truncated file behind under
/// the destination name.
///
/// # Errors
///
/// Returns an error if the temp file cannot be created, written, synced, or
/// renamed into place.
pub fn write_atomic(destination: &Path, data: &[u8]) -> io::Result<()> {
    let temp_path = temp_sibling(destination);

    let write_result = (|| {
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(data)?;
        file.sync_all()
    })();

    if let Err(err) = write_result {
        let _ = fs::remove_file(&temp_path);
        return Err(err);
    }

    rename_with_fallback(&temp_path, destination)
}

/// Atomically rename a file, with fallback for platforms where rename fails if target exists.
///
/// On some platforms (notably Windows), `fs::rename` fails if the destination already exists.
/// This function handles that case by removing the destination first and retrying.
///
/// If the rename ultimately fails, the temp file is cleaned up.
///
/// # Errors
///
/// Returns an error if the rename fails even after the fallback attempt.
pub fn rename_with_fallback(temp_path: &Path, destination: &Path) -> io::Result<()> {
    if let Err(initial_err) = fs::rename(temp_path, destination) {
        // Best-effort replace on platforms where rename fails if target exists.
        let _ = fs::remove_file(destination);
        fs::rename(temp_path, destination).map_err(|retry_err| {
            // Clean up the temp file on failure
            let _ = fs::remove_file(temp_path);
            io::Error::new(
                retry_err.kind(),
                format!(
                    "Atomic rename failed (initial: {}, retry: {})",
                    initial_err, retry_err
                ),
            )
        })?;
    }
    Ok(())
}

fn temp_sibling(destination: &Path) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    let file_name = destination
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "artifact".to_string());
    let temp_name = format!(".{}.{}.{}.tmp", file_name, std::process::id(), nanos);
    match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(temp_name),
        _ => PathBuf::from(temp_name),
    }
}
