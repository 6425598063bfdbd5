// SPDX-FileCopyrightText: 2026 Ombud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON-document implementation of the StorageAdapter trait.
//!
//! One JSON file holds the whole runtime document (`staff`, `groups`,
//! `tickets`, `counters`). Reads load the file fresh every time; writes
//! read-modify-write the addressed sub-key under a process-wide mutex and
//! replace the file atomically via a tempfile rename.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use ombud_core::types::{AdapterType, HealthStatus};
use ombud_core::{OmbudError, PluginAdapter, StorageAdapter};

/// JSON-file-backed storage adapter.
///
/// A missing or unreadable file never fails a read: it degrades to an empty
/// document with a logged warning, matching the "fall back, never crash"
/// storage error policy. Write failures do propagate.
pub struct JsonStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl JsonStore {
    /// Create a new store over the given file path.
    ///
    /// The file is not touched until [`StorageAdapter::initialize`] or the
    /// first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the whole document, degrading to an empty object on any failure.
    async fn load_doc(&self) -> Value {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Value::Object(Map::new());
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "data file unreadable, using empty document");
                return Value::Object(Map::new());
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(Value::Object(map)) => Value::Object(map),
            Ok(_) => {
                warn!(path = %self.path.display(), "data file root is not an object, using empty document");
                Value::Object(Map::new())
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "data file malformed, using empty document");
                Value::Object(Map::new())
            }
        }
    }

    /// Atomically replace the document file.
    async fn write_doc(&self, doc: &Value) -> Result<(), OmbudError> {
        let rendered = serde_json::to_vec_pretty(doc).map_err(|e| OmbudError::Storage {
            source: Box::new(e),
        })?;

        let path = self.path.clone();
        let parent = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        // tempfile + persist is blocking I/O; hand it to the blocking pool.
        tokio::task::spawn_blocking(move || -> Result<(), std::io::Error> {
            let mut tmp = tempfile::NamedTempFile::new_in(&parent)?;
            std::io::Write::write_all(&mut tmp, &rendered)?;
            tmp.persist(&path).map_err(|e| e.error)?;
            Ok(())
        })
        .await
        .map_err(|e| OmbudError::Storage {
            source: Box::new(e),
        })?
        .map_err(|e| OmbudError::Storage {
            source: Box::new(e),
        })
    }
}

/// Walk a slash-separated key path into a document.
fn lookup<'a>(doc: &'a Value, key: &str) -> Option<&'a Value> {
    let mut current = doc;
    for segment in key.split('/').filter(|s| !s.is_empty()) {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Set a value at a slash-separated key path, creating intermediate objects.
///
/// Fails when a path segment is already occupied by a non-object value.
fn insert_at(doc: &mut Value, key: &str, value: Value) -> Result<(), OmbudError> {
    let segments: Vec<&str> = key.split('/').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        return Err(OmbudError::Storage {
            source: "empty storage key".into(),
        });
    }

    let mut current = doc;
    for segment in &segments[..segments.len() - 1] {
        let map = current.as_object_mut().ok_or_else(|| OmbudError::Storage {
            source: format!("key segment `{segment}` is not an object").into(),
        })?;
        current = map
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }

    let map = current.as_object_mut().ok_or_else(|| OmbudError::Storage {
        source: format!("key `{key}` points into a non-object value").into(),
    })?;
    map.insert(segments[segments.len() - 1].to_string(), value);
    Ok(())
}

#[async_trait]
impl PluginAdapter for JsonStore {
    fn name(&self) -> &str {
        "json-file"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, OmbudError> {
        match tokio::fs::metadata(&self.path).await {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HealthStatus::Degraded(
                "data file not yet created".to_string(),
            )),
            Err(e) => Ok(HealthStatus::Unhealthy(format!("data file unreadable: {e}"))),
        }
    }

    async fn shutdown(&self) -> Result<(), OmbudError> {
        // Every write already lands on disk before put() returns.
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for JsonStore {
    async fn initialize(&self) -> Result<(), OmbudError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| OmbudError::Storage {
                    source: Box::new(e),
                })?;
        }

        if tokio::fs::metadata(&self.path).await.is_err() {
            self.write_doc(&Value::Object(Map::new())).await?;
            debug!(path = %self.path.display(), "created empty data document");
        }
        Ok(())
    }

    async fn close(&self) -> Result<(), OmbudError> {
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Value>, OmbudError> {
        let doc = self.load_doc().await;
        Ok(lookup(&doc, key).cloned())
    }

    async fn put(&self, key: &str, value: Value) -> Result<(), OmbudError> {
        let _guard = self.write_lock.lock().await;
        let mut doc = self.load_doc().await;
        insert_at(&mut doc, key, value)?;
        self.write_doc(&doc).await
    }

    async fn list(&self, key: &str) -> Result<Vec<(String, Value)>, OmbudError> {
        let doc = self.load_doc().await;
        let entries = match lookup(&doc, key) {
            Some(Value::Object(map)) => map
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            _ => Vec::new(),
        };
        Ok(entries)
    }
}
