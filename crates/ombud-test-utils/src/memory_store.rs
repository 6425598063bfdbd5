// SPDX-FileCopyrightText: 2026 Ombud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory implementation of the StorageAdapter trait for tests.

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::Mutex;

use ombud_core::traits::adapter::PluginAdapter;
use ombud_core::traits::storage::StorageAdapter;
use ombud_core::types::{AdapterType, HealthStatus};
use ombud_core::OmbudError;

/// In-memory key-value document with the same path semantics as the
/// production JSON store, minus the file.
pub struct MemoryStore {
    doc: Mutex<Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            doc: Mutex::new(Value::Object(Map::new())),
        }
    }

    /// Seed the store with a full document, replacing existing content.
    pub async fn seed(&self, doc: Value) {
        *self.doc.lock().await = doc;
    }

    /// Snapshot the full document for assertions.
    pub async fn snapshot(&self) -> Value {
        self.doc.lock().await.clone()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, OmbudError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), OmbudError> {
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for MemoryStore {
    async fn initialize(&self) -> Result<(), OmbudError> {
        Ok(())
    }

    async fn close(&self) -> Result<(), OmbudError> {
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Value>, OmbudError> {
        let doc = self.doc.lock().await;
        let mut current = &*doc;
        for segment in key.split('/').filter(|s| !s.is_empty()) {
            match current.as_object().and_then(|m| m.get(segment)) {
                Some(v) => current = v,
                None => return Ok(None),
            }
        }
        Ok(Some(current.clone()))
    }

    async fn put(&self, key: &str, value: Value) -> Result<(), OmbudError> {
        let segments: Vec<&str> = key.split('/').filter(|s| !s.is_empty()).collect();
        if segments.is_empty() {
            return Err(OmbudError::Storage {
                source: "empty storage key".into(),
            });
        }

        let mut doc = self.doc.lock().await;
        let mut current = &mut *doc;
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

    async fn list(&self, key: &str) -> Result<Vec<(String, Value)>, OmbudError> {
        match self.get(key).await? {
            Some(Value::Object(map)) => {
                Ok(map.into_iter().collect())
            }
            _ => Ok(Vec::new()),
        }
    }
}
