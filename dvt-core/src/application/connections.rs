// dvt-core/src/application/connections.rs

use std::collections::BTreeMap;
use tracing::{info, instrument};

use crate::domain::connection::ConnectionDescriptor;
use crate::domain::error::DomainError;
use crate::error::DvtError;
use crate::ports::client::ClientFactory;
use crate::ports::connection_store::ConnectionStore;

pub fn list_connections(
    store: &dyn ConnectionStore,
) -> Result<BTreeMap<String, ConnectionDescriptor>, DvtError> {
    store.list()
}

/// Registers `descriptor` under `name` once a live client could be acquired
/// from it. Nothing is written when validation or acquisition fails.
#[instrument(skip(store, factory, descriptor), fields(source_type = descriptor.source_type()))]
pub async fn add_connection(
    store: &mut dyn ConnectionStore,
    factory: &dyn ClientFactory,
    name: &str,
    descriptor: ConnectionDescriptor,
) -> Result<(), DvtError> {
    let name = name.trim();
    if name.is_empty() || name.starts_with('{') {
        return Err(DomainError::InvalidConnection(format!(
            "'{}' is not a valid connection name",
            name
        ))
        .into());
    }
    descriptor.validate()?;

    // Fail-fast credential / shape check.
    let client = factory.get_client(&descriptor).await?;
    info!(engine = client.engine_name(), "connection verified");

    store.store(name, descriptor)?;
    info!("connection stored");
    Ok(())
}
