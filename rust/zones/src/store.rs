// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Calibration persistence.
//!
//! A [`CalibrationBackend`] is the raw key-value collaborator. A
//! [`CalibrationStore`] scopes one backend to a session key and holds the
//! working copy that the user edits; nothing reaches the backend until
//! [`CalibrationStore::save`] is called.

use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use rustc_hash::FxHashMap;

use crate::calibration::CalibrationConfig;
use crate::error::Result;

/// Key-value persistence for calibration, keyed by home or session id
pub trait CalibrationBackend {
    /// `Ok(None)` when nothing has been saved for `key`
    fn load(&self, key: &str) -> Result<Option<CalibrationConfig>>;

    fn save(&self, key: &str, config: &CalibrationConfig) -> Result<()>;

    /// Remove the stored value; clearing a missing key is not an error
    fn clear(&self, key: &str) -> Result<()>;

    /// Stored calibration, or the defaults when nothing usable is stored.
    ///
    /// Read failures and invalid stored values are logged and treated as a
    /// miss.
    fn load_or_default(&self, key: &str) -> CalibrationConfig {
        match self.load(key) {
            Ok(Some(config)) if config.is_valid() => config,
            Ok(Some(config)) => {
                tracing::warn!(key = %key, ?config, "Ignoring invalid stored calibration");
                CalibrationConfig::default()
            }
            Ok(None) => CalibrationConfig::default(),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Failed to read stored calibration");
                CalibrationConfig::default()
            }
        }
    }
}

impl<B: CalibrationBackend + ?Sized> CalibrationBackend for Arc<B> {
    fn load(&self, key: &str) -> Result<Option<CalibrationConfig>> {
        (**self).load(key)
    }

    fn save(&self, key: &str, config: &CalibrationConfig) -> Result<()> {
        (**self).save(key, config)
    }

    fn clear(&self, key: &str) -> Result<()> {
        (**self).clear(key)
    }
}

/// In-process backend, mainly for tests and ephemeral sessions
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: RwLock<FxHashMap<String, CalibrationConfig>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CalibrationBackend for MemoryBackend {
    fn load(&self, key: &str) -> Result<Option<CalibrationConfig>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).copied())
    }

    fn save(&self, key: &str, config: &CalibrationConfig) -> Result<()> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), *config);
        Ok(())
    }

    fn clear(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}

/// Content-addressable disk backend using cacache, values stored as JSON.
#[derive(Debug, Clone)]
pub struct DiskBackend {
    cache_dir: PathBuf,
}

impl DiskBackend {
    /// Create a backend in the specified directory.
    pub fn new(cache_dir: impl AsRef<Path>) -> Self {
        let path = cache_dir.as_ref().to_path_buf();

        // Create cache directory if it doesn't exist
        if let Err(e) = std::fs::create_dir_all(&path) {
            tracing::warn!(
                error = %e,
                path = %path.display(),
                "Failed to create calibration cache directory"
            );
        }

        Self { cache_dir: path }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    fn entry_key(key: &str) -> String {
        format!("calibration:{}", key)
    }
}

impl CalibrationBackend for DiskBackend {
    fn load(&self, key: &str) -> Result<Option<CalibrationConfig>> {
        match cacache::read_sync(&self.cache_dir, Self::entry_key(key)) {
            Ok(data) => Ok(Some(serde_json::from_slice(&data)?)),
            Err(cacache::Error::EntryNotFound(_, _)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, key: &str, config: &CalibrationConfig) -> Result<()> {
        let data = serde_json::to_vec(config)?;
        cacache::write_sync(&self.cache_dir, Self::entry_key(key), &data)?;
        tracing::debug!(key = %key, size = data.len(), "Stored calibration");
        Ok(())
    }

    fn clear(&self, key: &str) -> Result<()> {
        cacache::remove_sync(&self.cache_dir, Self::entry_key(key))?;
        Ok(())
    }
}

/// Working calibration for one session key
#[derive(Debug)]
pub struct CalibrationStore<B> {
    backend: B,
    key: String,
    config: CalibrationConfig,
    dirty: bool,
}

impl<B: CalibrationBackend> CalibrationStore<B> {
    /// Load the stored calibration for `key`, falling back to the defaults.
    pub fn open(backend: B, key: impl Into<String>) -> Self {
        let key = key.into();
        let config = backend.load_or_default(&key);
        tracing::info!(key = %key, ?config, "Opened calibration");
        Self {
            backend,
            key,
            config,
            dirty: false,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn config(&self) -> &CalibrationConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Unsaved edits are pending
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Replace the working calibration (not persisted).
    ///
    /// Rejects invalid values and keeps the previous calibration.
    pub fn set(&mut self, config: CalibrationConfig) -> Result<()> {
        config.validate()?;
        if config != self.config {
            self.config = config;
            self.dirty = true;
        }
        Ok(())
    }

    /// Edit a copy of the working calibration and apply it if still valid.
    pub fn update(&mut self, edit: impl FnOnce(&mut CalibrationConfig)) -> Result<()> {
        let mut next = self.config;
        edit(&mut next);
        self.set(next)
    }

    /// Persist the working calibration under this store's key.
    pub fn save(&mut self) -> Result<()> {
        self.backend.save(&self.key, &self.config)?;
        self.dirty = false;
        tracing::info!(key = %self.key, config = ?self.config, "Saved calibration");
        Ok(())
    }

    /// Drop the stored value and return to the defaults.
    pub fn reset(&mut self) -> Result<()> {
        self.backend.clear(&self.key)?;
        self.config = CalibrationConfig::default();
        self.dirty = false;
        tracing::info!(key = %self.key, "Reset calibration to defaults");
        Ok(())
    }
}
