// dvt-core/src/application/catalog.rs

use tracing::{debug, info, instrument, warn};

use crate::domain::catalog::TableCatalog;
use crate::domain::table::TableDescriptor;
use crate::error::DvtError;
use crate::ports::client::CatalogClient;

/// Enumerates every `(database, table)` pair the client can see.
#[instrument(skip_all, fields(engine = client.engine_name()))]
pub async fn enumerate_tables(client: &dyn CatalogClient) -> Result<TableCatalog, DvtError> {
    let mut catalog = TableCatalog::new();

    for database in client.list_databases().await? {
        let tables = client.list_tables(&database).await?;
        debug!(database = %database, tables = tables.len(), "database enumerated");

        for table in tables {
            let descriptor = TableDescriptor::new(&database, &table);
            if !catalog.insert(descriptor) {
                warn!(database = %database, table = %table, "duplicate table key ignored");
            }
        }
    }

    info!(tables = catalog.len(), "catalog enumerated");
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::InMemoryCatalog;
    use anyhow::Result;
    use std::collections::HashSet;

    #[tokio::test]
    async fn test_enumerates_d_times_t_entries() -> Result<()> {
        for (d, t) in [(1, 1), (2, 3), (4, 5)] {
            let mut client = InMemoryCatalog::default();
            for db in 0..d {
                for table in 0..t {
                    client = client.with_table(&format!("db{}", db), &format!("t{}", table), &[]);
                }
            }

            let catalog = enumerate_tables(&client).await?;
            assert_eq!(catalog.len(), d * t);
            let keys: HashSet<&str> = catalog.keys().collect();
            assert_eq!(keys.len(), d * t);
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_key_format() -> Result<()> {
        let client = InMemoryCatalog::default().with_table("sales", "orders", &[]);
        let catalog = enumerate_tables(&client).await?;
        let (key, table) = catalog.iter().next().ok_or_else(|| anyhow::anyhow!("empty"))?;
        assert_eq!(key, "sales__orders");
        assert_eq!(table, &TableDescriptor::new("sales", "orders"));
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_client() -> Result<()> {
        let catalog = enumerate_tables(&InMemoryCatalog::default()).await?;
        assert!(catalog.is_empty());
        Ok(())
    }
}
