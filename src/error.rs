// Error types for the account store. The UI layer works with `anyhow`, the
// library keeps typed errors so callers can tell the failure modes apart.

use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong while reading, mutating or writing the
/// account store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// `add` was called with a name that is already stored.
    #[error("account '{0}' already exists")]
    AlreadyExists(String),

    /// `remove`/`select` was called with an unknown name.
    #[error("account '{0}' not found")]
    NotFound(String),

    #[error("account name must not be empty")]
    EmptyName,

    #[error("cookie must not be empty")]
    EmptyCredential,

    /// The backend file exists but does not hold a name -> record object.
    #[error("account file {} is corrupt: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize accounts: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias used across the store.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
