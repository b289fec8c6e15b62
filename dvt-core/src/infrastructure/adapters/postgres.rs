// dvt-core/src/infrastructure/adapters/postgres.rs

use async_trait::async_trait;
use tokio_postgres::{Client, Config as PgConfig, NoTls};
use tracing::{debug, error};

use crate::error::DvtError;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::client::{CatalogClient, ColumnSchema};

const LIST_SCHEMAS: &str = "SELECT schema_name::text FROM information_schema.schemata \
     WHERE schema_name NOT IN ('information_schema', 'pg_catalog') \
     AND schema_name NOT LIKE 'pg\\_toast%' \
     AND schema_name NOT LIKE 'pg\\_temp\\_%' \
     ORDER BY schema_name";

const LIST_TABLES: &str = "SELECT table_name::text FROM information_schema.tables \
     WHERE table_schema = $1 ORDER BY table_name";

const DESCRIBE_TABLE: &str = "SELECT column_name::text, data_type::text FROM information_schema.columns \
     WHERE table_schema = $1 AND table_name = $2 ORDER BY ordinal_position";

/// Parameters of a Postgres connection, password already read from the environment.
#[derive(Debug, Clone)]
pub struct PostgresParams {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: Option<String>,
}

pub struct PostgresClient {
    client: Client,
}

impl PostgresClient {
    pub async fn connect(params: &PostgresParams) -> Result<Self, InfrastructureError> {
        let mut config = PgConfig::new();
        config
            .host(&params.host)
            .port(params.port)
            .dbname(&params.database)
            .user(&params.user);
        if let Some(password) = &params.password {
            config.password(password);
        }

        let (client, connection) = config.connect(NoTls).await?;

        // La connexion vit dans sa propre tâche
        let label = format!("{}:{}/{}", params.host, params.port, params.database);
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!(server = %label, "PostgreSQL connection error: {}", e);
            }
        });

        debug!(host = %params.host, port = params.port, database = %params.database, "Postgres client connected");
        Ok(Self { client })
    }

    async fn strings(&self, sql: &str, args: &[&str]) -> Result<Vec<String>, InfrastructureError> {
        let params: Vec<&(dyn tokio_postgres::types::ToSql + Sync)> = args
            .iter()
            .map(|a| a as &(dyn tokio_postgres::types::ToSql + Sync))
            .collect();
        let rows = self.client.query(sql, &params).await?;
        Ok(rows.iter().map(|row| row.get::<_, String>(0)).collect())
    }
}

#[async_trait]
impl CatalogClient for PostgresClient {
    async fn list_databases(&self) -> Result<Vec<String>, DvtError> {
        Ok(self.strings(LIST_SCHEMAS, &[]).await?)
    }

    async fn list_tables(&self, database: &str) -> Result<Vec<String>, DvtError> {
        Ok(self.strings(LIST_TABLES, &[database]).await?)
    }

    async fn describe_table(
        &self,
        database: &str,
        table: &str,
    ) -> Result<Vec<ColumnSchema>, DvtError> {
        let rows = self
            .client
            .query(DESCRIBE_TABLE, &[&database, &table])
            .await
            .map_err(InfrastructureError::from)?;

        Ok(rows
            .iter()
            .map(|row| ColumnSchema::new(row.get::<_, String>(0), row.get::<_, String>(1)))
            .collect())
    }

    fn engine_name(&self) -> &str {
        "postgres"
    }
}
