use tracing::{debug, warn};

use super::backend::{SessionBackend, StorageBackendKind};
use super::fallback::FileBackend;
use super::memory::MemoryBackend;
use super::secure::SecureFileBackend;
use crate::config::SessionConfig;

pub const DEFAULT_SESSION_KEY: &str = "session";

const FALLBACK_FILE_NAME: &str = "storage.json";
const SECURE_DIR_NAME: &str = "secure";

/// Key-value store for the session token. Storage failures are logged and
/// absorbed here; callers only ever see a value or its absence.
pub struct SessionStore {
    backend: Box<dyn SessionBackend>,
    session_key: String,
}

impl SessionStore {
    /// Builds the backend the configuration selects.
    pub fn open(config: &SessionConfig) -> Self {
        let backend: Box<dyn SessionBackend> = match config.backend {
            StorageBackendKind::Secure => Box::new(SecureFileBackend::new(
                config.directory.join(SECURE_DIR_NAME),
            )),
            StorageBackendKind::Fallback => Box::new(FileBackend::new(
                config.directory.join(FALLBACK_FILE_NAME),
            )),
            StorageBackendKind::Memory => Box::new(MemoryBackend::default()),
        };
        debug!(
            backend = %config.backend,
            directory = %config.directory.display(),
            "session store opened"
        );

        Self {
            backend,
            session_key: config.key.clone(),
        }
    }

    pub fn with_backend(backend: impl SessionBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
            session_key: DEFAULT_SESSION_KEY.to_string(),
        }
    }

    pub fn in_memory() -> Self {
        Self::with_backend(MemoryBackend::default())
    }

    pub fn backend_kind(&self) -> StorageBackendKind {
        self.backend.kind()
    }

    pub fn session_key(&self) -> &str {
        &self.session_key
    }

    /// Stores `value` under `key`. An empty value is refused (and logged) so a
    /// falsy write can never erase a session; use [`remove`](Self::remove).
    pub fn save(&self, key: &str, value: &str) {
        if value.is_empty() {
            warn!(key, "refusing to store empty value; use remove to clear");
            return;
        }

        if let Err(err) = self.backend.write(key, value) {
            warn!(key, backend = %self.backend.kind(), error = %err, "session write failed");
        }
    }

    /// Returns the stored value; read failures count as a miss.
    pub fn load(&self, key: &str) -> Option<String> {
        match self.backend.read(key) {
            Ok(value) => value,
            Err(err) => {
                warn!(key, backend = %self.backend.kind(), error = %err, "session read failed");
                None
            }
        }
    }

    pub fn remove(&self, key: &str) {
        if let Err(err) = self.backend.delete(key) {
            warn!(key, backend = %self.backend.kind(), error = %err, "session delete failed");
        }
    }

    pub fn save_token(&self, token: &str) {
        self.save(&self.session_key, token);
    }

    pub fn load_token(&self) -> Option<String> {
        self.load(&self.session_key)
    }

    pub fn clear_token(&self) {
        self.remove(&self.session_key);
    }
}
