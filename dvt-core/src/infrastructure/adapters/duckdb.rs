// dvt-core/src/infrastructure/adapters/duckdb.rs

use async_trait::async_trait;
use duckdb::{Config, Connection, params};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

// Imports Hexagonaux
use crate::error::DvtError;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::client::{CatalogClient, ColumnSchema};

const LIST_SCHEMAS: &str = "SELECT schema_name FROM information_schema.schemata \
     WHERE catalog_name = current_database() \
     AND schema_name NOT IN ('information_schema', 'pg_catalog') \
     ORDER BY schema_name";

const LIST_TABLES: &str = "SELECT table_name FROM information_schema.tables \
     WHERE table_catalog = current_database() AND table_schema = ? \
     ORDER BY table_name";

const DESCRIBE_TABLE: &str = "SELECT column_name, data_type FROM information_schema.columns \
     WHERE table_catalog = current_database() AND table_schema = ? AND table_name = ? \
     ORDER BY ordinal_position";

pub struct DuckDBClient {
    conn: Arc<Mutex<Connection>>,
}

impl DuckDBClient {
    /// Opens an existing database file. `:memory:` gives an empty in-process database.
    pub fn open(db_path: &str) -> Result<Self, InfrastructureError> {
        let config = Config::default();

        let conn = if db_path == ":memory:" {
            Connection::open_in_memory_with_flags(config)?
        } else {
            // DuckDB crée le fichier s'il n'existe pas : on refuse, une connexion
            // de validation doit pointer vers une base existante.
            if !Path::new(db_path).is_file() {
                return Err(InfrastructureError::ClientAcquisition {
                    connection: db_path.to_string(),
                    reason: "database file does not exist".into(),
                });
            }
            Connection::open_with_flags(db_path, config)?
        };

        debug!(path = db_path, "DuckDB client opened");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, InfrastructureError> {
        self.conn.lock().map_err(|_| {
            InfrastructureError::Io(std::io::Error::other("DuckDB Mutex Poisoned"))
        })
    }

    /// Runs a statement on the underlying connection. Used to seed fixtures.
    pub fn execute_batch(&self, sql: &str) -> Result<(), InfrastructureError> {
        self.lock()?.execute_batch(sql)?;
        Ok(())
    }
}

#[async_trait]
impl CatalogClient for DuckDBClient {
    async fn list_databases(&self) -> Result<Vec<String>, DvtError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(LIST_SCHEMAS).map_err(InfrastructureError::from)?;
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(InfrastructureError::from)?;

        let mut schemas = Vec::new();
        for row in rows {
            schemas.push(row.map_err(InfrastructureError::from)?);
        }
        Ok(schemas)
    }

    async fn list_tables(&self, database: &str) -> Result<Vec<String>, DvtError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(LIST_TABLES).map_err(InfrastructureError::from)?;
        let rows = stmt
            .query_map(params![database], |row| row.get::<_, String>(0))
            .map_err(InfrastructureError::from)?;

        let mut tables = Vec::new();
        for row in rows {
            tables.push(row.map_err(InfrastructureError::from)?);
        }
        Ok(tables)
    }

    async fn describe_table(
        &self,
        database: &str,
        table: &str,
    ) -> Result<Vec<ColumnSchema>, DvtError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(DESCRIBE_TABLE)
            .map_err(InfrastructureError::from)?;
        let rows = stmt
            .query_map(params![database, table], |row| {
                Ok(ColumnSchema {
                    name: row.get(0)?,
                    data_type: row.get(1)?,
                })
            })
            .map_err(InfrastructureError::from)?;

        let mut columns = Vec::new();
        for row in rows {
            columns.push(row.map_err(InfrastructureError::from)?);
        }
        Ok(columns)
    }

    fn engine_name(&self) -> &str {
        "duckdb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use anyhow::Result;

    fn seeded() -> Result<DuckDBClient> {
        let client = DuckDBClient::open(":memory:")?;
        client.execute_batch(
            "CREATE SCHEMA sales;
             CREATE TABLE sales.orders (id INTEGER, amount DECIMAL(10,2), placed_at TIMESTAMP);
             CREATE TABLE sales.customers (id BIGINT, name VARCHAR);
             CREATE TABLE main.audit (note VARCHAR);",
        )?;
        Ok(client)
    }

    #[tokio::test]
    async fn test_lists_user_schemas_only() -> Result<()> {
        let client = seeded()?;
        let schemas = client.list_databases().await?;
        assert!(schemas.contains(&"sales".to_string()));
        assert!(schemas.contains(&"main".to_string()));
        assert!(!schemas.iter().any(|s| s == "information_schema" || s == "pg_catalog"));
        Ok(())
    }

    #[tokio::test]
    async fn test_list_tables_by_schema() -> Result<()> {
        let client = seeded()?;
        assert_eq!(
            client.list_tables("sales").await?,
            vec!["customers".to_string(), "orders".to_string()]
        );
        assert!(client.list_tables("nowhere").await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_describe_keeps_column_order() -> Result<()> {
        let client = seeded()?;
        let columns = client.describe_table("sales", "orders").await?;
        let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["id", "amount", "placed_at"]);
        assert_eq!(columns[0].data_type, "INTEGER");
        assert_eq!(columns[2].data_type, "TIMESTAMP");
        Ok(())
    }

    #[test]
    fn test_missing_file_is_refused() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("absent.duckdb");
        let err = DuckDBClient::open(&path.to_string_lossy()).err();
        assert_eq!(err.map(|e| e.kind()), Some(ErrorKind::Connection));
        assert!(!path.exists());
        Ok(())
    }
}
