//! Keyed object storage with pluggable persistence.
//!
//! [`Storage`] owns the in-memory map from `"<ClassName>.<id>"` to
//! [`Instance`]. A [`Backend`] only knows how to load every object and how to
//! write the whole map back; the map is rewritten wholesale on each
//! [`Storage::save`], and the last write wins.
//!
//! Two backends ship with the crate:
//!
//! - [`JsonFileBackend`]: a single JSON object in a flat file (the default).
//! - [`SqliteBackend`]: one row per object in a SQLite database.

mod file;
mod schema;
mod sqlite;

use std::collections::BTreeMap;
use std::path::PathBuf;

use thiserror::Error;

use crate::models::{ClassName, Instance};

pub use file::JsonFileBackend;
pub use sqlite::SqliteBackend;

/// Every stored object, by storage key.
pub type Objects = BTreeMap<String, Instance>;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("cannot access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed storage data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("schema migration failed: {0:#}")]
    Migration(anyhow::Error),
}

/// Persistence for the whole object map.
pub trait Backend {
    /// Read every stored object. An empty or missing store yields no objects.
    fn load(&self) -> Result<Vec<Instance>, StorageError>;

    /// Replace the stored contents with `objects`.
    fn store(&self, objects: &Objects) -> Result<(), StorageError>;

    /// Human-readable location, for logs.
    fn describe(&self) -> String;
}

pub struct Storage {
    objects: Objects,
    backend: Box<dyn Backend>,
}

impl Storage {
    /// Wrap a backend and load whatever it already holds.
    pub fn open(backend: impl Backend + 'static) -> Result<Self, StorageError> {
        let mut storage = Self {
            objects: Objects::new(),
            backend: Box::new(backend),
        };
        storage.reload()?;
        Ok(storage)
    }

    /// Discard in-memory state and re-read the backend.
    ///
    /// Keys are rebuilt from each instance's class and id, so a store with
    /// mismatched keys still ends up with one entry per object.
    pub fn reload(&mut self) -> Result<(), StorageError> {
        let instances = self.backend.load()?;
        self.objects = instances.into_iter().map(|i| (i.key(), i)).collect();
        tracing::debug!(
            "Loaded {} objects from {}",
            self.objects.len(),
            self.backend.describe()
        );
        Ok(())
    }

    pub fn save(&self) -> Result<(), StorageError> {
        self.backend.store(&self.objects)?;
        tracing::info!(
            "Saved {} objects to {}",
            self.objects.len(),
            self.backend.describe()
        );
        Ok(())
    }

    pub fn all(&self) -> &Objects {
        &self.objects
    }

    pub fn all_of(&self, class: ClassName) -> impl Iterator<Item = &Instance> + '_ {
        self.objects.values().filter(move |i| i.class == class)
    }

    pub fn count(&self, class: ClassName) -> usize {
        self.all_of(class).count()
    }

    pub fn get(&self, class: ClassName, id: &str) -> Option<&Instance> {
        self.objects.get(&Instance::key_for(class, id))
    }

    pub fn get_mut(&mut self, class: ClassName, id: &str) -> Option<&mut Instance> {
        self.objects.get_mut(&Instance::key_for(class, id))
    }

    /// Register an instance under its key, replacing any object already there.
    /// Not persisted until [`Storage::save`].
    pub fn insert(&mut self, instance: Instance) {
        self.objects.insert(instance.key(), instance);
    }

    /// Remove an instance. Not persisted until [`Storage::save`].
    pub fn remove(&mut self, class: ClassName, id: &str) -> Option<Instance> {
        self.objects.remove(&Instance::key_for(class, id))
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn describe(&self) -> String {
        self.backend.describe()
    }
}
