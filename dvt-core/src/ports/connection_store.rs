// dvt-core/src/ports/connection_store.rs

use std::collections::BTreeMap;

use crate::domain::connection::ConnectionDescriptor;
use crate::error::DvtError;

/// Persistent registry of named connection descriptors.
pub trait ConnectionStore: Send + Sync {
    /// All stored connections, ordered by name.
    fn list(&self) -> Result<BTreeMap<String, ConnectionDescriptor>, DvtError>;

    fn get(&self, name: &str) -> Result<Option<ConnectionDescriptor>, DvtError>;

    /// Inserts or replaces `name` and persists the registry.
    fn store(&mut self, name: &str, descriptor: ConnectionDescriptor) -> Result<(), DvtError>;
}
