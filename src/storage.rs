//! JSON file helpers shared by the catalog and prompt caches.
//!
//! Writes go to a sibling temp file first and are renamed into place, so a
//! reader sees either the old file or the new one.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::error::{Result, ToolchatError};

/// Read and parse a JSON file. A missing file is `Ok(None)`.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read(path)
        .map_err(|e| ToolchatError::CacheIo(format!("Failed to read {}: {}", path.display(), e)))?;
    let value = serde_json::from_slice(&content)
        .map_err(|e| ToolchatError::CacheIo(format!("Failed to parse {}: {}", path.display(), e)))?;
    Ok(Some(value))
}

/// Replace `path` with `bytes`, creating parent directories as needed.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            ToolchatError::CacheIo(format!("Failed to create {}: {}", parent.display(), e))
        })?;
    }

    let tmp = temp_path(path);
    fs::write(&tmp, bytes)
        .map_err(|e| ToolchatError::CacheIo(format!("Failed to write {}: {}", tmp.display(), e)))?;
    fs::rename(&tmp, path).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        ToolchatError::CacheIo(format!("Failed to replace {}: {}", path.display(), e))
    })
}

/// Serialize `value` as pretty JSON and write it atomically.
pub fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(value)?;
    write_atomic(path, &bytes)
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "cache".to_string());
    path.with_file_name(format!(".{}.tmp", name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    #[test]
    fn test_read_missing_file() {
        let dir = TempDir::new().unwrap();
        let result: Option<BTreeMap<String, String>> = read_json(&dir.path().join("none.json")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_read_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{not json").unwrap();

        let result: Result<Option<BTreeMap<String, String>>> = read_json(&path);
        assert!(matches!(result, Err(ToolchatError::CacheIo(_))));
    }

    #[test]
    fn test_write_creates_parent_and_leaves_no_temp() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("data.json");

        let mut map = BTreeMap::new();
        map.insert("ChatGPT".to_string(), "prompt".to_string());
        write_json(&path, &map).unwrap();

        let loaded: BTreeMap<String, String> = read_json(&path).unwrap().unwrap();
        assert_eq!(loaded, map);
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn test_write_atomic_replaces_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tools.json");
        write_atomic(&path, b"[1]").unwrap();
        write_atomic(&path, b"[2]").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "[2]");
    }
}
