// dvt/src/commands/connections.rs
//
// USE CASE: List and register named connections.

use dvt_core::application::{add_connection, list_connections};
use dvt_core::domain::connection::ConnectionDescriptor;
use dvt_core::infrastructure::{DefaultClientFactory, FileConnectionStore};

pub fn list() -> anyhow::Result<()> {
    let store = FileConnectionStore::from_env();
    let connections = list_connections(&store)?;

    if connections.is_empty() {
        eprintln!("No connection stored in {}", store.path().display());
    }
    for (name, descriptor) in &connections {
        println!("{}: {}", name, descriptor.source_type());
    }
    Ok(())
}

pub async fn add(name: &str, descriptor: ConnectionDescriptor) -> anyhow::Result<()> {
    let mut store = FileConnectionStore::from_env();
    add_connection(&mut store, &DefaultClientFactory, name, descriptor).await?;

    println!("✅ Connection '{}' stored in {}", name.trim(), store.path().display());
    Ok(())
}
