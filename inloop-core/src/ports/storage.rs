//! Storage port - durable key-value records

use crate::domain::result::Result;

/// Durable string-keyed storage.
///
/// Each key holds one serialized record and every write replaces the whole
/// record. Implementations must be safe to share across threads; the session
/// store never holds a borrow across an await point, so they stay
/// synchronous.
pub trait KeyValueStore: Send + Sync {
    /// Read a record, `None` if the key was never written or was removed
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite a record
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a record; removing a missing key is not an error
    fn remove(&self, key: &str) -> Result<()>;

    /// All keys currently holding a record, sorted
    fn keys(&self) -> Result<Vec<String>>;

    /// Short backend name for status output
    fn backend(&self) -> &'static str;
}
