pub mod json_backend;

use crate::errors::LedgerError;

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Abstraction over key-value persistence backends.
///
/// Values are serialized strings; the store re-writes the full value for a
/// key on every mutation (last write wins).
pub trait StorageBackend: Send + Sync {
    /// Reads the value stored under `key`, `None` when absent.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Writes the full value for `key`, replacing any previous one.
    fn write(&self, key: &str, value: &str) -> Result<()>;
}

pub use json_backend::JsonStorage;
