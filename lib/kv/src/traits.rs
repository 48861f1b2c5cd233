use crate::error::KVError;

/// Key-value storage interface.
///
/// Keys follow a namespaced convention, e.g. `settings:{owner_id}`.
pub trait KVStore: Send + Sync {
    /// Get the value for a key. None if the key does not exist.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KVError>;

    /// Set a key-value pair, overwriting any previous value.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), KVError>;

    /// Delete a key. Deleting a missing key is not an error.
    fn delete(&self, key: &str) -> Result<(), KVError>;

    /// List all key-value pairs whose key starts with the prefix, sorted by key.
    fn scan(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, KVError>;
}
