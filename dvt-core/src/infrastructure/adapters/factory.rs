// dvt-core/src/infrastructure/adapters/factory.rs

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::domain::connection::ConnectionDescriptor;
use crate::error::DvtError;
use crate::infrastructure::adapters::duckdb::DuckDBClient;
use crate::infrastructure::adapters::postgres::{PostgresClient, PostgresParams};
use crate::infrastructure::error::InfrastructureError;
use crate::ports::client::{CatalogClient, ClientFactory};

/// Builds the real clients: DuckDB files and Postgres servers.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultClientFactory;

impl DefaultClientFactory {
    fn acquisition_error(descriptor: &ConnectionDescriptor, reason: impl ToString) -> DvtError {
        let connection = match descriptor {
            ConnectionDescriptor::DuckDB { path } => path.clone(),
            ConnectionDescriptor::Postgres {
                host,
                port,
                database,
                ..
            } => format!("{}:{}/{}", host, port, database),
        };
        InfrastructureError::ClientAcquisition {
            connection,
            reason: reason.to_string(),
        }
        .into()
    }
}

#[async_trait]
impl ClientFactory for DefaultClientFactory {
    #[instrument(skip_all, fields(source_type = descriptor.source_type()))]
    async fn get_client(
        &self,
        descriptor: &ConnectionDescriptor,
    ) -> Result<Arc<dyn CatalogClient>, DvtError> {
        descriptor.validate()?;

        let client: Arc<dyn CatalogClient> = match descriptor {
            ConnectionDescriptor::DuckDB { path } => match DuckDBClient::open(path) {
                Ok(client) => Arc::new(client),
                Err(e @ InfrastructureError::ClientAcquisition { .. }) => return Err(e.into()),
                Err(e) => return Err(Self::acquisition_error(descriptor, e)),
            },
            ConnectionDescriptor::Postgres {
                host,
                port,
                database,
                user,
                password_env,
            } => {
                let password = match password_env {
                    Some(var) => Some(std::env::var(var).map_err(|_| {
                        Self::acquisition_error(
                            descriptor,
                            format!("environment variable '{}' is not set", var),
                        )
                    })?),
                    None => None,
                };
                let params = PostgresParams {
                    host: host.clone(),
                    port: *port,
                    database: database.clone(),
                    user: user.clone(),
                    password,
                };
                let client = PostgresClient::connect(&params)
                    .await
                    .map_err(|e| Self::acquisition_error(descriptor, e))?;
                Arc::new(client)
            }
        };

        info!(engine = client.engine_name(), "client acquired");
        Ok(client)
    }
}
