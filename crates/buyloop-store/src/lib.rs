//! Catalog provider backed by a single JSON document.
//!
//! Holds the business catalog, per-business visit counters and message
//! threads. Every mutation is written through to disk (temp file, then
//! rename) unless the store was opened in memory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use buyloop_core::{validate_new_business, Business, Message, MessageSender, NewBusiness};
use chrono::Utc;
use serde::{Deserialize, Serialize};

mod error;

pub use error::StoreError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageData {
    #[serde(default)]
    pub businesses: Vec<Business>,
    #[serde(default)]
    pub visits: BTreeMap<String, u64>,
    #[serde(default)]
    pub messages: BTreeMap<String, Vec<Message>>,
}

#[derive(Debug)]
pub struct Store {
    path: Option<PathBuf>,
    data: StorageData,
}

impl Store {
    /// A store that never touches disk.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            path: None,
            data: StorageData::default(),
        }
    }

    /// Open the document at `path`, starting empty if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file exists but cannot be read, or
    /// [`StoreError::Json`] if it is not a valid store document.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let data = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "store file not found; starting empty");
                StorageData::default()
            }
            Err(e) => return Err(StoreError::io(&path, e)),
        };

        tracing::info!(
            path = %path.display(),
            businesses = data.businesses.len(),
            "store opened"
        );

        Ok(Self {
            path: Some(path),
            data,
        })
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Replace an empty catalog with `seed`. Returns whether seeding happened.
    ///
    /// # Errors
    ///
    /// Returns an error if the seeded document cannot be persisted.
    pub fn seed_if_empty(&mut self, seed: Vec<Business>) -> Result<bool, StoreError> {
        if !self.data.businesses.is_empty() {
            tracing::debug!(
                existing = self.data.businesses.len(),
                "catalog already populated; skipping seed"
            );
            return Ok(false);
        }

        let count = seed.len();
        self.update(|data| {
            data.businesses = seed;
            Ok(())
        })?;
        tracing::info!(count, "seeded catalog");
        Ok(true)
    }

    #[must_use]
    pub fn businesses(&self) -> &[Business] {
        &self.data.businesses
    }

    #[must_use]
    pub fn business(&self, id: &str) -> Option<&Business> {
        self.data.businesses.iter().find(|b| b.id == id)
    }

    /// Validate and append a new listing with the next numeric id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] for bad input,
    /// [`StoreError::IdsExhausted`] when no larger numeric id exists, or an
    /// I/O error if the catalog cannot be persisted.
    pub fn add_business(&mut self, new: NewBusiness) -> Result<Business, StoreError> {
        validate_new_business(&new)?;

        let id = next_id(&self.data.businesses).ok_or(StoreError::IdsExhausted)?;
        let business = new.into_business(id);
        let stored = business.clone();
        self.update(|data| {
            data.businesses.push(business);
            Ok(())
        })?;

        tracing::info!(id = %stored.id, name = %stored.name, "business added");
        Ok(stored)
    }

    /// Increment the visit counter for `id`, returning the new count.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for unknown businesses.
    pub fn record_visit(&mut self, id: &str) -> Result<u64, StoreError> {
        self.require(id)?;
        self.update(|data| {
            let count = data.visits.entry(id.to_string()).or_insert(0);
            *count += 1;
            Ok(*count)
        })
    }

    #[must_use]
    pub fn visits(&self, id: &str) -> u64 {
        self.data.visits.get(id).copied().unwrap_or(0)
    }

    /// Append a user message to a business's thread.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for unknown businesses and
    /// [`StoreError::EmptyMessage`] when `text` is blank.
    pub fn send_message(&mut self, id: &str, text: &str) -> Result<Message, StoreError> {
        self.require(id)?;
        let text = text.trim();
        if text.is_empty() {
            return Err(StoreError::EmptyMessage);
        }

        let message = Message {
            from: MessageSender::User,
            text: text.to_string(),
            timestamp: Utc::now(),
        };
        let sent = message.clone();
        self.update(|data| {
            data.messages.entry(id.to_string()).or_default().push(message);
            Ok(())
        })?;
        Ok(sent)
    }

    #[must_use]
    pub fn messages(&self, id: &str) -> &[Message] {
        self.data
            .messages
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Drop every business, counter and message.
    ///
    /// # Errors
    ///
    /// Returns an error if the emptied document cannot be persisted.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.update(|data| {
            *data = StorageData::default();
            Ok(())
        })?;
        tracing::info!("store cleared");
        Ok(())
    }

    fn require(&self, id: &str) -> Result<(), StoreError> {
        if self.business(id).is_some() {
            Ok(())
        } else {
            Err(StoreError::NotFound(id.to_string()))
        }
    }

    /// Apply `change` to a copy of the document, persist it, then commit.
    ///
    /// The in-memory state is left untouched when persistence fails.
    fn update<T>(
        &mut self,
        change: impl FnOnce(&mut StorageData) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut next = self.data.clone();
        let out = change(&mut next)?;
        if let Some(path) = &self.path {
            persist(path, &next)?;
        }
        self.data = next;
        Ok(out)
    }
}

/// One past the largest numeric id; non-numeric ids count as zero.
/// `None` once the largest id is `u64::MAX`.
fn next_id(businesses: &[Business]) -> Option<String> {
    let max = businesses
        .iter()
        .map(|b| b.id.trim().parse::<u64>().unwrap_or(0))
        .max()
        .unwrap_or(0);
    max.checked_add(1).map(|id| id.to_string())
}

fn persist(path: &Path, data: &StorageData) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
    }

    let body = serde_json::to_vec_pretty(data)?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, body).map_err(|e| StoreError::io(&tmp, e))?;
    std::fs::rename(&tmp, path).map_err(|e| StoreError::io(path, e))?;

    tracing::debug!(path = %path.display(), "store persisted");
    Ok(())
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
