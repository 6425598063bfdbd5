// SPDX-FileCopyrightText: 2026 Ombud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapter trait for the runtime key-value document.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::OmbudError;
use crate::traits::adapter::PluginAdapter;

/// Adapter for the runtime key-value store.
///
/// Keys are slash-separated paths into one JSON document (`staff`, `groups`,
/// `tickets/<id>`, `counters`). Reads always load fresh state; writes
/// read-modify-write only the addressed sub-key, so concurrent updates to
/// unrelated keys cannot clobber each other.
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Initializes the storage backend (directories, empty document).
    async fn initialize(&self) -> Result<(), OmbudError>;

    /// Closes the storage backend, flushing pending writes.
    async fn close(&self) -> Result<(), OmbudError>;

    /// Reads the value at `key`, or `None` when absent.
    async fn get(&self, key: &str) -> Result<Option<Value>, OmbudError>;

    /// Writes `value` at `key`, creating intermediate objects as needed.
    async fn put(&self, key: &str, value: Value) -> Result<(), OmbudError>;

    /// Lists the child entries of the object at `key`. An absent or
    /// non-object value yields an empty list.
    async fn list(&self, key: &str) -> Result<Vec<(String, Value)>, OmbudError>;
}
