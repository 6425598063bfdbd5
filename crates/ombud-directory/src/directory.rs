// SPDX-FileCopyrightText: 2026 Ombud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The directory store: categories and info texts loaded once at startup,
//! staff and groups read fresh from the key-value store on every access.
//!
//! Mutations perform narrow read-modify-write on their own sub-key only, so
//! concurrent updates to unrelated keys cannot clobber each other.

use std::sync::Arc;

use serde_json::{Map, Value, json};
use tracing::{debug, warn};

use ombud_core::{OmbudError, StorageAdapter};

use crate::model::{
    Category, GroupTarget, InfoTexts, StaffMember, parse_categories, parse_groups, parse_staff,
    parse_texts,
};

const STAFF_KEY: &str = "staff";
const GROUPS_KEY: &str = "groups";
const CATEGORIES_KEY: &str = "categories";
const TEXTS_KEY: &str = "texts";

/// Reference data access for the rest of the system.
pub struct Directory {
    store: Arc<dyn StorageAdapter>,
    categories: Vec<Category>,
    texts: InfoTexts,
}

impl Directory {
    /// Load the static portion (categories, texts) from the store.
    ///
    /// Storage read failures degrade to compiled defaults; they never fail
    /// the load.
    pub async fn load(store: Arc<dyn StorageAdapter>) -> Self {
        let categories = match store.get(CATEGORIES_KEY).await {
            Ok(doc) => parse_categories(doc.as_ref()),
            Err(e) => {
                warn!(error = %e, "failed to read categories, using defaults");
                parse_categories(None)
            }
        };
        let texts = match store.get(TEXTS_KEY).await {
            Ok(doc) => parse_texts(doc.as_ref()),
            Err(e) => {
                warn!(error = %e, "failed to read info texts, using defaults");
                parse_texts(None)
            }
        };

        debug!(categories = categories.len(), "directory loaded");
        Self {
            store,
            categories,
            texts,
        }
    }

    /// The ordered category list.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Label for a category key, if the key is known.
    pub fn category_label(&self, key: &str) -> Option<&str> {
        self.categories
            .iter()
            .find(|c| c.key == key)
            .map(|c| c.label.as_str())
    }

    /// The wizard texts.
    pub fn texts(&self) -> &InfoTexts {
        &self.texts
    }

    /// All staff entries, active and inactive, sorted by user id.
    pub async fn staff(&self) -> Vec<StaffMember> {
        match self.store.get(STAFF_KEY).await {
            Ok(Some(doc)) => parse_staff(&doc),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "failed to read staff, treating as empty");
                Vec::new()
            }
        }
    }

    /// Staff entries with the active flag set.
    pub async fn active_staff(&self) -> Vec<StaffMember> {
        self.staff().await.into_iter().filter(|m| m.active).collect()
    }

    /// Whether `user_id` is currently an active staff member.
    pub async fn is_active_staff(&self, user_id: i64) -> bool {
        self.active_staff()
            .await
            .iter()
            .any(|m| m.user_id == user_id)
    }

    /// All group targets, sorted by chat id.
    pub async fn groups(&self) -> Vec<GroupTarget> {
        match self.store.get(GROUPS_KEY).await {
            Ok(Some(doc)) => parse_groups(&doc),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "failed to read groups, treating as empty");
                Vec::new()
            }
        }
    }

    /// Group targets with the active flag set.
    pub async fn active_groups(&self) -> Vec<GroupTarget> {
        self.groups().await.into_iter().filter(|g| g.active).collect()
    }

    /// Insert or replace a staff entry.
    pub async fn upsert_staff(&self, member: StaffMember) -> Result<(), OmbudError> {
        let record = json!({
            "username": member.username,
            "name": member.name,
            "active": member.active,
        });
        self.store
            .put(&format!("{STAFF_KEY}/{}", member.user_id), record)
            .await
    }

    /// Clear the active flag on a staff entry. Returns `false` when the id
    /// is unknown; the store is left untouched in that case.
    pub async fn deactivate_staff(&self, user_id: i64) -> Result<bool, OmbudError> {
        let key = format!("{STAFF_KEY}/{user_id}");
        let Some(mut record) = self.store.get(&key).await? else {
            return Ok(false);
        };
        if let Some(map) = record.as_object_mut() {
            map.insert("active".to_string(), Value::Bool(false));
        } else {
            record = json!({"active": false});
        }
        self.store.put(&key, record).await?;
        Ok(true)
    }

    /// Insert or replace a group target.
    pub async fn upsert_group(&self, group: GroupTarget) -> Result<(), OmbudError> {
        let record = json!({
            "name": group.name,
            "active": group.active,
        });
        self.store
            .put(&format!("{GROUPS_KEY}/{}", group.chat_id), record)
            .await
    }

    /// Replace the whole group map with a single active destination.
    ///
    /// This is what `/setgroup` does: one routing group at a time, like the
    /// earliest deployments. Existing groups are deactivated, not deleted.
    pub async fn set_primary_group(&self, chat_id: i64) -> Result<(), OmbudError> {
        let mut map = Map::new();
        for group in self.groups().await {
            if group.chat_id != chat_id {
                map.insert(
                    group.chat_id.to_string(),
                    json!({"name": group.name, "active": false}),
                );
            }
        }
        map.insert(chat_id.to_string(), json!({"name": null, "active": true}));
        self.store.put(GROUPS_KEY, Value::Object(map)).await
    }
}
