//! Storage configuration loaded from environment variables.
//!
//! - `HBNB_TYPE_STORAGE` - `file` (default) or `db`
//! - `HBNB_FILE_PATH` - JSON file for the file backend (default: `file.json`)
//! - `HBNB_DB_PATH` - SQLite database for the db backend (default: `hbnb.db`
//!   in the platform data directory)
//!
//! Command-line flags override these after loading.

use std::path::PathBuf;

use anyhow::{bail, Result};
use hbnb_core::storage::{JsonFileBackend, SqliteBackend, Storage};

pub const DEFAULT_FILE_PATH: &str = "file.json";
pub const DEFAULT_DB_NAME: &str = "hbnb.db";

/// Which backend persists the object map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum StorageKind {
    File,
    Db,
}

impl StorageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Db => "db",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "file" => Some(Self::File),
            "db" => Some(Self::Db),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub storage: StorageKind,
    pub file_path: PathBuf,
    /// `None` means the platform default, resolved when the storage opens.
    pub db_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage: StorageKind::File,
            file_path: PathBuf::from(DEFAULT_FILE_PATH),
            db_path: None,
        }
    }
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(kind) = lookup("HBNB_TYPE_STORAGE") {
            config.storage = match StorageKind::from_str(kind.trim()) {
                Some(kind) => kind,
                None => bail!("Invalid HBNB_TYPE_STORAGE `{}` (expected `file` or `db`)", kind),
            };
        }
        if let Some(path) = lookup("HBNB_FILE_PATH").filter(|p| !p.is_empty()) {
            config.file_path = PathBuf::from(path);
        }
        if let Some(path) = lookup("HBNB_DB_PATH").filter(|p| !p.is_empty()) {
            config.db_path = Some(PathBuf::from(path));
        }

        Ok(config)
    }

    /// Apply command-line values on top of the environment. `None` keeps
    /// the current setting.
    pub fn apply_overrides(
        &mut self,
        storage: Option<StorageKind>,
        file_path: Option<PathBuf>,
        db_path: Option<PathBuf>,
    ) {
        if let Some(storage) = storage {
            self.storage = storage;
        }
        if let Some(path) = file_path {
            self.file_path = path;
        }
        if let Some(path) = db_path {
            self.db_path = Some(path);
        }
    }

    pub fn default_db_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "", "hbnb")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        Ok(dirs.data_dir().join(DEFAULT_DB_NAME))
    }

    /// Open the configured backend and load its objects.
    pub fn open_storage(&self) -> Result<Storage> {
        let storage = match self.storage {
            StorageKind::File => Storage::open(JsonFileBackend::new(self.file_path.clone()))?,
            StorageKind::Db => {
                let path = match &self.db_path {
                    Some(path) => path.clone(),
                    None => Self::default_db_path()?,
                };
                Storage::open(SqliteBackend::open(path)?)?
            }
        };

        tracing::info!(
            "Opened {} storage at {} ({} objects)",
            self.storage.as_str(),
            storage.describe(),
            storage.len()
        );
        Ok(storage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults_to_file_storage() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.storage, StorageKind::File);
        assert_eq!(config.file_path, PathBuf::from(DEFAULT_FILE_PATH));
        assert!(config.db_path.is_none());
    }

    #[test]
    fn test_reads_environment_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("HBNB_TYPE_STORAGE", "db"),
            ("HBNB_FILE_PATH", "/tmp/objects.json"),
            ("HBNB_DB_PATH", "/tmp/hbnb.db"),
        ]))
        .unwrap();
        assert_eq!(config.storage, StorageKind::Db);
        assert_eq!(config.file_path, PathBuf::from("/tmp/objects.json"));
        assert_eq!(config.db_path, Some(PathBuf::from("/tmp/hbnb.db")));
    }

    #[test]
    fn test_rejects_unknown_storage_kind() {
        let err = Config::from_lookup(lookup(&[("HBNB_TYPE_STORAGE", "redis")])).unwrap_err();
        assert!(err.to_string().contains("redis"));
    }

    #[test]
    fn test_flags_override_environment() {
        let mut config = Config::from_lookup(lookup(&[
            ("HBNB_TYPE_STORAGE", "file"),
            ("HBNB_FILE_PATH", "/tmp/env.json"),
            ("HBNB_DB_PATH", "/tmp/env.db"),
        ]))
        .unwrap();

        config.apply_overrides(Some(StorageKind::Db), None, Some(PathBuf::from("/tmp/flag.db")));

        assert_eq!(config.storage, StorageKind::Db);
        assert_eq!(config.file_path, PathBuf::from("/tmp/env.json"));
        assert_eq!(config.db_path, Some(PathBuf::from("/tmp/flag.db")));
    }

    #[test]
    fn test_absent_flags_keep_environment() {
        let mut config = Config::from_lookup(lookup(&[("HBNB_FILE_PATH", "/tmp/env.json")])).unwrap();
        config.apply_overrides(None, None, None);

        assert_eq!(config.storage, StorageKind::File);
        assert_eq!(config.file_path, PathBuf::from("/tmp/env.json"));
        assert!(config.db_path.is_none());
    }

    #[test]
    fn test_opens_configured_file_storage() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            file_path: dir.path().join("file.json"),
            ..Config::default()
        };
        let storage = config.open_storage().unwrap();
        assert!(storage.is_empty());
    }

    #[test]
    fn test_opens_configured_db_storage() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            storage: StorageKind::Db,
            db_path: Some(dir.path().join("hbnb.db")),
            ..Config::default()
        };
        let storage = config.open_storage().unwrap();
        assert!(storage.describe().starts_with("sqlite:"));
    }
}
