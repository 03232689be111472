//! Whole-file JSON snapshots of the task map.
//!
//! Writes go to `<file>.tmp` in the same directory and are renamed over the
//! target, so a crash mid-write leaves the previous snapshot intact.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::Utc;

use cast_core::entities::Task;

use crate::error::StoreError;
use crate::helpers::task_from_value;

/// Read a snapshot file.
///
/// A missing file is an empty map. A file that cannot be interpreted is moved
/// aside to `<file>.corrupt-<unix ts>` and also yields an empty map, so the
/// next write does not destroy it.
///
/// # Errors
///
/// Returns `StoreError::Io` if the file exists but cannot be read, or cannot
/// be moved aside.
pub async fn load(path: &Path) -> Result<BTreeMap<String, Task>, StoreError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "no task snapshot yet; starting empty");
            return Ok(BTreeMap::new());
        }
        Err(e) => return Err(StoreError::io(path, e)),
    };

    match decode(&bytes) {
        Ok(tasks) => {
            tracing::info!(path = %path.display(), tasks = tasks.len(), "loaded task snapshot");
            Ok(tasks)
        }
        Err(error) => {
            let aside = quarantine_path(path);
            tokio::fs::rename(path, &aside)
                .await
                .map_err(|e| StoreError::io(path, e))?;
            tracing::error!(
                path = %path.display(),
                moved_to = %aside.display(),
                %error,
                "task snapshot is unreadable; starting empty"
            );
            Ok(BTreeMap::new())
        }
    }
}

/// Parse snapshot bytes into the task map.
///
/// # Errors
///
/// Returns `StoreError::Json` for malformed JSON or a non-object top level,
/// and `StoreError::InvalidRecord` for records that are not tasks.
pub fn decode(bytes: &[u8]) -> Result<BTreeMap<String, Task>, StoreError> {
    let raw: BTreeMap<String, serde_json::Value> = serde_json::from_slice(bytes)?;
    raw.into_iter()
        .map(|(id, value)| task_from_value(&id, value).map(|task| (id, task)))
        .collect()
}

/// Serialize the task map.
///
/// # Errors
///
/// Returns `StoreError::Json` if serialization fails.
pub fn encode(tasks: &BTreeMap<String, Task>) -> Result<Vec<u8>, StoreError> {
    Ok(serde_json::to_vec_pretty(tasks)?)
}

/// Atomically replace the snapshot at `path` with `bytes`.
///
/// # Errors
///
/// Returns `StoreError::Io` if the directory, temp file or rename fails.
pub async fn write(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| StoreError::io(parent, e))?;
    }
    let tmp = temp_path(path);
    tokio::fs::write(&tmp, bytes)
        .await
        .map_err(|e| StoreError::io(&tmp, e))?;
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|e| StoreError::io(path, e))
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

fn quarantine_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(format!(".corrupt-{}", Utc::now().timestamp()));
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_path_sits_next_to_target() {
        let tmp = temp_path(Path::new("/data/tasks.json"));
        assert_eq!(tmp, PathBuf::from("/data/tasks.json.tmp"));
    }

    #[test]
    fn quarantine_path_keeps_original_name() {
        let aside = quarantine_path(Path::new("tasks.json"));
        let name = aside.to_string_lossy();
        assert!(name.starts_with("tasks.json.corrupt-"), "{name}");
    }

    #[test]
    fn decode_rejects_non_object() {
        assert!(matches!(decode(b"[]"), Err(StoreError::Json(_))));
        assert!(matches!(decode(b"{not json"), Err(StoreError::Json(_))));
    }

    #[test]
    fn decode_empty_object() {
        assert!(decode(b"{}").expect("decodes").is_empty());
    }
}
