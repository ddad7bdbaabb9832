//! Ledger file storage.
//!
//! The ledger is stored as pretty-printed JSON, by default at the XDG data
//! path `~/.local/share/fleetbooks/ledger.json`. Synchronous methods use
//! `std::fs`; the `_async` twins use `tokio::fs`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use thiserror::Error;
use tracing::{debug, warn};

use crate::error::LedgerError;
use crate::Ledger;

/// Default ledger filename.
const LEDGER_FILENAME: &str = "ledger.json";

const QUALIFIER: &str = "";
const ORGANIZATION: &str = "";
const APPLICATION: &str = "fleetbooks";

/// Errors that can occur while reading or writing the ledger file.
#[derive(Debug, Error)]
pub enum LedgerStoreError {
    /// No home directory to derive the data directory from.
    #[error("failed to determine data directory: no valid home directory found")]
    NoDataDir,

    #[error("failed to read ledger file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write ledger file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to create data directory '{path}': {source}")]
    CreateDirError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to delete ledger file '{path}': {source}")]
    DeleteError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file is not a valid ledger document.
    #[error("invalid ledger file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The file parses but its records cannot be used.
    #[error("invalid ledger file '{path}': {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: LedgerError,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LedgerStoreError {
    /// Returns true if the error is a read of a file that does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, LedgerStoreError::ReadError { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}

pub type Result<T> = std::result::Result<T, LedgerStoreError>;

/// Persistent storage for the [`Ledger`].
///
/// Writes go to a sibling temp file that is then renamed over the target,
/// so a crash mid-write leaves the previous ledger intact. Concurrent
/// writers are not coordinated: the last rename wins.
///
/// ```no_run
/// use fleetbooks_ledger::LedgerStore;
///
/// let store = LedgerStore::new()?;
/// let ledger = store.load_or_default()?;
/// store.save(&ledger)?;
/// # Ok::<(), fleetbooks_ledger::LedgerStoreError>(())
/// ```
#[derive(Debug, Clone)]
pub struct LedgerStore {
    path: PathBuf,
}

impl LedgerStore {
    /// Creates a store at the default XDG data path.
    ///
    /// # Errors
    ///
    /// Returns `LedgerStoreError::NoDataDir` if the home directory cannot be determined.
    pub fn new() -> Result<Self> {
        Ok(Self {
            path: Self::default_path()?,
        })
    }

    /// Creates a store at a custom path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the default ledger path.
    ///
    /// On Linux: `~/.local/share/fleetbooks/ledger.json`
    /// On macOS: `~/Library/Application Support/fleetbooks/ledger.json`
    ///
    /// # Errors
    ///
    /// Returns `LedgerStoreError::NoDataDir` if the home directory cannot be determined.
    pub fn default_path() -> Result<PathBuf> {
        let project_dirs = ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
            .ok_or(LedgerStoreError::NoDataDir)?;
        Ok(project_dirs.data_dir().join(LEDGER_FILENAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the ledger from disk.
    ///
    /// # Errors
    ///
    /// - `LedgerStoreError::ReadError` if the file cannot be read, including
    ///   when it does not exist (see [`load_or_default`](Self::load_or_default)).
    /// - `LedgerStoreError::Parse` if the file is not a valid ledger.
    /// - `LedgerStoreError::Invalid` if a stored id leaves no room for new ids.
    pub fn load(&self) -> Result<Ledger> {
        let contents = fs::read_to_string(&self.path).map_err(|e| LedgerStoreError::ReadError {
            path: self.path.clone(),
            source: e,
        })?;
        self.decode(&contents)
    }

    /// Loads the ledger, returning an empty one if the file does not exist.
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load), except for a missing file.
    pub fn load_or_default(&self) -> Result<Ledger> {
        match self.load() {
            Err(e) if e.is_not_found() => {
                warn!(path = %self.path.display(), "ledger file not found, starting empty");
                Ok(Ledger::default())
            }
            other => other,
        }
    }

    /// Saves the ledger atomically, creating the parent directory if needed.
    ///
    /// # Errors
    ///
    /// - `LedgerStoreError::CreateDirError` if the directory cannot be created.
    /// - `LedgerStoreError::WriteError` if the file cannot be written.
    /// - `LedgerStoreError::Json` if serialization fails.
    pub fn save(&self, ledger: &Ledger) -> Result<()> {
        if let Some(parent) = self.parent_dir() {
            fs::create_dir_all(parent).map_err(|e| LedgerStoreError::CreateDirError {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let json = serde_json::to_string_pretty(ledger)?;
        let temp_path = self.temp_path();
        fs::write(&temp_path, &json).map_err(|e| LedgerStoreError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;
        fs::rename(&temp_path, &self.path).map_err(|e| LedgerStoreError::WriteError {
            path: self.path.clone(),
            source: e,
        })?;

        debug!(path = %self.path.display(), records = ledger.record_count(), "saved ledger");
        Ok(())
    }

    /// Returns true if the ledger file exists.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Deletes the ledger file. A missing file is not an error.
    ///
    /// # Errors
    ///
    /// Returns `LedgerStoreError::DeleteError` if the file cannot be deleted.
    pub fn delete(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(LedgerStoreError::DeleteError {
                path: self.path.clone(),
                source: e,
            }),
        }
    }

    // =========================================================================
    // Async I/O Methods
    // =========================================================================

    /// Async twin of [`load`](Self::load).
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load).
    pub async fn load_async(&self) -> Result<Ledger> {
        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| LedgerStoreError::ReadError {
                path: self.path.clone(),
                source: e,
            })?;
        self.decode(&contents)
    }

    /// Async twin of [`load_or_default`](Self::load_or_default).
    ///
    /// # Errors
    ///
    /// Same as [`load_or_default`](Self::load_or_default).
    pub async fn load_or_default_async(&self) -> Result<Ledger> {
        match self.load_async().await {
            Err(e) if e.is_not_found() => {
                warn!(path = %self.path.display(), "ledger file not found, starting empty");
                Ok(Ledger::default())
            }
            other => other,
        }
    }

    /// Async twin of [`save`](Self::save).
    ///
    /// # Errors
    ///
    /// Same as [`save`](Self::save).
    pub async fn save_async(&self, ledger: &Ledger) -> Result<()> {
        if let Some(parent) = self.parent_dir() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| LedgerStoreError::CreateDirError {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }

        let json = serde_json::to_string_pretty(ledger)?;
        let temp_path = self.temp_path();
        tokio::fs::write(&temp_path, &json)
            .await
            .map_err(|e| LedgerStoreError::WriteError {
                path: temp_path.clone(),
                source: e,
            })?;
        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| LedgerStoreError::WriteError {
                path: self.path.clone(),
                source: e,
            })?;

        debug!(path = %self.path.display(), records = ledger.record_count(), "saved ledger");
        Ok(())
    }

    /// Async twin of [`delete`](Self::delete).
    ///
    /// # Errors
    ///
    /// Returns `LedgerStoreError::DeleteError` if the file cannot be deleted.
    pub async fn delete_async(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(LedgerStoreError::DeleteError {
                path: self.path.clone(),
                source: e,
            }),
        }
    }

    fn decode(&self, contents: &str) -> Result<Ledger> {
        let mut ledger: Ledger =
            serde_json::from_str(contents).map_err(|e| LedgerStoreError::Parse {
                path: self.path.clone(),
                source: e,
            })?;
        ledger
            .reconcile_next_id()
            .map_err(|e| LedgerStoreError::Invalid {
                path: self.path.clone(),
                source: e,
            })?;
        debug!(path = %self.path.display(), records = ledger.record_count(), "loaded ledger");
        Ok(ledger)
    }

    /// Parent directory, skipping the empty parent of a bare filename.
    fn parent_dir(&self) -> Option<&Path> {
        self.path.parent().filter(|p| !p.as_os_str().is_empty())
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }
}
