//! Atomic file writes
//!
//! Content is written to `<target>.tmp` and renamed over the target, so a
//! crash mid-write leaves the previous file intact.

use crate::Result;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Serialize `value` as JSON and atomically replace `target`
///
/// Missing parent directories are created.
pub fn write_json_atomic<T: Serialize + ?Sized>(value: &T, target: &Path) -> Result<()> {
    let bytes = serde_json::to_vec(value)?;
    write_bytes_atomic(&bytes, target)
}

/// Atomically replace `target` with `bytes`
pub fn write_bytes_atomic(bytes: &[u8], target: &Path) -> Result<()> {
    if let Some(parent) = target.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let temp_path = temp_path_for(target);
    {
        let mut file = std::fs::File::create(&temp_path)?;
        file.write_all(bytes)?;
        file.sync_all()?;
    }

    if let Err(e) = std::fs::rename(&temp_path, target) {
        let _ = std::fs::remove_file(&temp_path);
        return Err(e.into());
    }

    Ok(())
}

fn temp_path_for(target: &Path) -> PathBuf {
    let mut name = target
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    target.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_path_sits_next_to_target() {
        let temp = temp_path_for(Path::new("/var/cache/geocode-cache.json"));
        assert_eq!(temp, PathBuf::from("/var/cache/geocode-cache.json.tmp"));
    }
}
