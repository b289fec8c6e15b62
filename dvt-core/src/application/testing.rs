// dvt-core/src/application/testing.rs
//
// In-memory doubles for the ports, shared by the unit tests of this crate.

#![allow(clippy::unwrap_used)]

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::domain::connection::ConnectionDescriptor;
use crate::domain::validation::ValidationConfig;
use crate::error::DvtError;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::client::{CatalogClient, ClientFactory, ColumnSchema};
use crate::ports::connection_store::ConnectionStore;
use crate::ports::engine::{ValidationEngine, ValidationOutcome};

/// database -> table -> columns
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    pub databases: BTreeMap<String, BTreeMap<String, Vec<ColumnSchema>>>,
}

impl InMemoryCatalog {
    pub fn with_table(mut self, database: &str, table: &str, columns: &[(&str, &str)]) -> Self {
        self.databases
            .entry(database.to_string())
            .or_default()
            .insert(
                table.to_string(),
                columns
                    .iter()
                    .map(|(n, t)| ColumnSchema::new(*n, *t))
                    .collect(),
            );
        self
    }
}

#[async_trait]
impl CatalogClient for InMemoryCatalog {
    async fn list_databases(&self) -> Result<Vec<String>, DvtError> {
        Ok(self.databases.keys().cloned().collect())
    }

    async fn list_tables(&self, database: &str) -> Result<Vec<String>, DvtError> {
        Ok(self
            .databases
            .get(database)
            .map(|tables| tables.keys().cloned().collect())
            .unwrap_or_default())
    }

    async fn describe_table(
        &self,
        database: &str,
        table: &str,
    ) -> Result<Vec<ColumnSchema>, DvtError> {
        Ok(self
            .databases
            .get(database)
            .and_then(|tables| tables.get(table))
            .cloned()
            .unwrap_or_default())
    }

    fn engine_name(&self) -> &str {
        "memory"
    }
}

/// Hands out the catalog registered for a DuckDB path; unknown paths fail.
#[derive(Default)]
pub struct InMemoryClientFactory {
    catalogs: BTreeMap<String, InMemoryCatalog>,
    acquired: AtomicUsize,
}

impl InMemoryClientFactory {
    pub fn with_catalog(mut self, path: &str, catalog: InMemoryCatalog) -> Self {
        self.catalogs.insert(path.to_string(), catalog);
        self
    }

    pub fn acquisitions(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClientFactory for InMemoryClientFactory {
    async fn get_client(
        &self,
        descriptor: &ConnectionDescriptor,
    ) -> Result<Arc<dyn CatalogClient>, DvtError> {
        self.acquired.fetch_add(1, Ordering::SeqCst);
        match descriptor {
            ConnectionDescriptor::DuckDB { path } if path.starts_with("unreachable") => {
                Err(InfrastructureError::ClientAcquisition {
                    connection: path.clone(),
                    reason: "refused".into(),
                }
                .into())
            }
            ConnectionDescriptor::DuckDB { path } => Ok(Arc::new(
                self.catalogs.get(path).cloned().unwrap_or_default(),
            )),
            other => Err(InfrastructureError::ClientAcquisition {
                connection: other.source_type().into(),
                reason: "not available in tests".into(),
            }
            .into()),
        }
    }
}

/// Registry double: every name maps to a DuckDB descriptor whose path is the name.
#[derive(Default)]
pub struct InMemoryConnectionStore {
    pub connections: BTreeMap<String, ConnectionDescriptor>,
    lookups: AtomicUsize,
}

impl InMemoryConnectionStore {
    pub fn with(names: &[&str]) -> Self {
        Self {
            connections: names
                .iter()
                .map(|n| {
                    (
                        n.to_string(),
                        ConnectionDescriptor::DuckDB {
                            path: n.to_string(),
                        },
                    )
                })
                .collect(),
            lookups: AtomicUsize::new(0),
        }
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl ConnectionStore for InMemoryConnectionStore {
    fn list(&self) -> Result<BTreeMap<String, ConnectionDescriptor>, DvtError> {
        Ok(self.connections.clone())
    }

    fn get(&self, name: &str) -> Result<Option<ConnectionDescriptor>, DvtError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.connections.get(name).cloned())
    }

    fn store(&mut self, name: &str, descriptor: ConnectionDescriptor) -> Result<(), DvtError> {
        self.connections.insert(name.to_string(), descriptor);
        Ok(())
    }
}

/// Records the tables it executed; fails on the table named `fail_on`.
#[derive(Default)]
pub struct RecordingEngine {
    pub executed: Mutex<Vec<String>>,
    pub fail_on: Option<String>,
}

#[async_trait]
impl ValidationEngine for RecordingEngine {
    async fn execute(
        &self,
        config: &ValidationConfig,
        _verbose: bool,
    ) -> Result<ValidationOutcome, DvtError> {
        let name = config.table().to_string();
        if self.fail_on.as_deref() == Some(name.as_str()) {
            return Err(DvtError::InternalError(format!("engine rejected {}", name)));
        }
        self.executed.lock().unwrap().push(name.clone());
        Ok(ValidationOutcome {
            validation_name: name,
            validation_type: config.validation_type().to_string(),
            queries: vec![],
        })
    }
}
