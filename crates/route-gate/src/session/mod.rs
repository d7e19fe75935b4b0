//! Durable storage for the opaque session token.

pub mod backend;
pub mod fallback;
pub mod memory;
pub mod secure;
mod store;

pub use backend::{SessionBackend, StorageBackendKind, StorageError};
pub use fallback::FileBackend;
pub use memory::MemoryBackend;
pub use secure::SecureFileBackend;
pub use store::{SessionStore, DEFAULT_SESSION_KEY};
