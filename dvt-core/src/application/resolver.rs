// dvt-core/src/application/resolver.rs

use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::domain::connection::{ConnectionDescriptor, ConnectionRef, ResolvedConnection};
use crate::error::DvtError;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::client::{CatalogClient, ClientFactory};
use crate::ports::connection_store::ConnectionStore;

/// Turns connection references into shared descriptors.
///
/// The same reference always yields the same `Arc` for the lifetime of the
/// resolver. Never opens a network connection.
pub struct ConnectionResolver<'a> {
    store: &'a dyn ConnectionStore,
    resolved: HashMap<ConnectionRef, Arc<ResolvedConnection>>,
}

impl<'a> ConnectionResolver<'a> {
    pub fn new(store: &'a dyn ConnectionStore) -> Self {
        Self {
            store,
            resolved: HashMap::new(),
        }
    }

    #[instrument(skip_all, fields(reference = %reference))]
    pub fn resolve(&mut self, reference: &ConnectionRef) -> Result<Arc<ResolvedConnection>, DvtError> {
        if let Some(conn) = self.resolved.get(reference) {
            return Ok(Arc::clone(conn));
        }

        let descriptor = match reference {
            ConnectionRef::Named(name) => self
                .store
                .get(name)?
                .ok_or_else(|| InfrastructureError::UnknownConnection(name.clone()))?,
            ConnectionRef::Inline(descriptor) => descriptor.clone(),
        };
        descriptor.validate()?;

        debug!(source_type = descriptor.source_type(), "connection resolved");
        let conn = Arc::new(ResolvedConnection {
            reference: reference.clone(),
            descriptor,
        });
        self.resolved.insert(reference.clone(), Arc::clone(&conn));
        Ok(conn)
    }
}

/// One client per connection per run.
///
/// Keyed by descriptor: two names (or a name and an inline reference) for the
/// same database share a client.
pub struct ClientCache<'a> {
    factory: &'a dyn ClientFactory,
    clients: HashMap<ConnectionDescriptor, Arc<dyn CatalogClient>>,
}

impl<'a> ClientCache<'a> {
    pub fn new(factory: &'a dyn ClientFactory) -> Self {
        Self {
            factory,
            clients: HashMap::new(),
        }
    }

    pub async fn acquire(
        &mut self,
        conn: &Arc<ResolvedConnection>,
    ) -> Result<Arc<dyn CatalogClient>, DvtError> {
        if let Some(client) = self.clients.get(&conn.descriptor) {
            debug!(connection = %conn.label(), "client reused");
            return Ok(Arc::clone(client));
        }

        let client = self.factory.get_client(&conn.descriptor).await?;
        info!(connection = %conn.label(), engine = client.engine_name(), "client acquired");
        self.clients.insert(conn.descriptor.clone(), Arc::clone(&client));
        Ok(client)
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

/// Resolver and client cache for a single run.
pub struct RunContext<'a> {
    pub resolver: ConnectionResolver<'a>,
    pub clients: ClientCache<'a>,
}

impl<'a> RunContext<'a> {
    pub fn new(store: &'a dyn ConnectionStore, factory: &'a dyn ClientFactory) -> Self {
        Self {
            resolver: ConnectionResolver::new(store),
            clients: ClientCache::new(factory),
        }
    }

    /// Resolves `reference` and acquires (or reuses) its client.
    pub async fn connect(
        &mut self,
        reference: &ConnectionRef,
    ) -> Result<(Arc<ResolvedConnection>, Arc<dyn CatalogClient>), DvtError> {
        let conn = self.resolver.resolve(reference)?;
        let client = self.clients.acquire(&conn).await?;
        Ok((conn, client))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{InMemoryClientFactory, InMemoryConnectionStore};
    use crate::error::ErrorKind;
    use anyhow::Result;

    #[test]
    fn test_resolve_named_is_shared() -> Result<()> {
        let store = InMemoryConnectionStore::with(&["warehouse"]);
        let mut resolver = ConnectionResolver::new(&store);

        let a = resolver.resolve(&ConnectionRef::Named("warehouse".into()))?;
        let b = resolver.resolve(&ConnectionRef::Named("warehouse".into()))?;
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(store.lookups(), 1);
        Ok(())
    }

    #[test]
    fn test_resolve_unknown_name() {
        let store = InMemoryConnectionStore::default();
        let mut resolver = ConnectionResolver::new(&store);
        let err = resolver
            .resolve(&ConnectionRef::Named("ghost".into()))
            .err();
        assert_eq!(err.map(|e| e.kind()), Some(ErrorKind::Connection));
    }

    #[test]
    fn test_resolve_invalid_inline() {
        let store = InMemoryConnectionStore::default();
        let mut resolver = ConnectionResolver::new(&store);
        let reference = ConnectionRef::Inline(ConnectionDescriptor::DuckDB { path: " ".into() });
        let err = resolver.resolve(&reference).err();
        assert_eq!(err.map(|e| e.kind()), Some(ErrorKind::Connection));
    }

    #[tokio::test]
    async fn test_client_acquired_once_per_connection() -> Result<()> {
        let store = InMemoryConnectionStore::with(&["src", "tgt"]);
        let factory = InMemoryClientFactory::default();
        let mut ctx = RunContext::new(&store, &factory);

        let src = ConnectionRef::Named("src".into());
        let tgt = ConnectionRef::Named("tgt".into());
        for _ in 0..3 {
            ctx.connect(&src).await?;
            ctx.connect(&tgt).await?;
        }
        assert_eq!(ctx.clients.len(), 2);
        assert_eq!(factory.acquisitions(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_same_descriptor_shares_client() -> Result<()> {
        let mut store = InMemoryConnectionStore::with(&["warehouse"]);
        store.connections.insert(
            "warehouse_alias".into(),
            ConnectionDescriptor::DuckDB {
                path: "warehouse".into(),
            },
        );
        let factory = InMemoryClientFactory::default();
        let mut ctx = RunContext::new(&store, &factory);

        let (named, a) = ctx.connect(&ConnectionRef::Named("warehouse".into())).await?;
        let (alias, b) = ctx.connect(&ConnectionRef::Named("warehouse_alias".into())).await?;
        let (_, c) = ctx
            .connect(&ConnectionRef::Inline(ConnectionDescriptor::DuckDB {
                path: "warehouse".into(),
            }))
            .await?;

        // Références distinctes, un seul client
        assert!(!Arc::ptr_eq(&named, &alias));
        assert!(Arc::ptr_eq(&a, &b));
        assert!(Arc::ptr_eq(&a, &c));
        assert_eq!(ctx.clients.len(), 1);
        assert_eq!(factory.acquisitions(), 1);
        Ok(())
    }
}
