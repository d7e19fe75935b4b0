use std::fmt;
use std::path::PathBuf;

use crate::config::Platform;

/// Physical storage behind the [`SessionStore`](super::SessionStore).
pub trait SessionBackend: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;
    /// Deleting a missing key succeeds.
    fn delete(&self, key: &str) -> Result<(), StorageError>;
    fn kind(&self) -> StorageBackendKind;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageBackendKind {
    Secure,
    Fallback,
    Memory,
}

impl StorageBackendKind {
    /// Backend used when configuration does not force one.
    pub fn for_platform(platform: Platform) -> Self {
        match platform {
            Platform::Native => Self::Secure,
            Platform::Web => Self::Fallback,
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "secure" => Some(Self::Secure),
            "fallback" | "file" => Some(Self::Fallback),
            "memory" => Some(Self::Memory),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StorageBackendKind::Secure => "secure",
            StorageBackendKind::Fallback => "fallback",
            StorageBackendKind::Memory => "memory",
        }
    }
}

impl fmt::Display for StorageBackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage io failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session document at {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
