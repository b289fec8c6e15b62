// dvt-core/src/ports/client.rs

// What the core needs from a data system, without knowing which one it is.
// DuckDB, Postgres or an in-memory double all plug in here.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::connection::ConnectionDescriptor;
use crate::error::DvtError;

// Struct simple pour décrire une colonne (indépendant de la DB)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSchema {
    pub name: String,
    pub data_type: String,
}

impl ColumnSchema {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
        }
    }
}

#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Databases (schemas / datasets) visible to this client.
    async fn list_databases(&self) -> Result<Vec<String>, DvtError>;

    async fn list_tables(&self, database: &str) -> Result<Vec<String>, DvtError>;

    /// Column names and declared types, in table order.
    async fn describe_table(
        &self,
        database: &str,
        table: &str,
    ) -> Result<Vec<ColumnSchema>, DvtError>;

    fn engine_name(&self) -> &str;
}

/// Turns a descriptor into a live client. Fails fast on bad credentials or shape.
#[async_trait]
pub trait ClientFactory: Send + Sync {
    async fn get_client(
        &self,
        descriptor: &ConnectionDescriptor,
    ) -> Result<Arc<dyn CatalogClient>, DvtError>;
}
