// dvt-core/src/infrastructure/config/connection.rs

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, info, instrument};

use crate::domain::connection::ConnectionDescriptor;
use crate::error::DvtError;
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::write_yaml;
use crate::ports::connection_store::ConnectionStore;

pub const HOME_ENV: &str = "DVT_HOME";
pub const REGISTRY_FILE: &str = "connections.yaml";

type Registry = BTreeMap<String, ConnectionDescriptor>;

/// Registry directory: `$DVT_HOME`, else `$HOME/.dvt`, else `./.dvt`.
pub fn default_home() -> PathBuf {
    if let Ok(home) = std::env::var(HOME_ENV) {
        if !home.trim().is_empty() {
            return PathBuf::from(home);
        }
    }
    match std::env::var("HOME") {
        Ok(home) if !home.trim().is_empty() => Path::new(&home).join(".dvt"),
        _ => PathBuf::from(".dvt"),
    }
}

/// Named connections persisted as a YAML mapping in `connections.yaml`.
///
/// Loaded on first use, flushed on every `store`.
pub struct FileConnectionStore {
    path: PathBuf,
    cache: OnceLock<Registry>,
}

impl FileConnectionStore {
    pub fn new(home: impl AsRef<Path>) -> Self {
        Self {
            path: home.as_ref().join(REGISTRY_FILE),
            cache: OnceLock::new(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(default_home())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn loaded(&self) -> Result<&Registry, InfrastructureError> {
        if let Some(registry) = self.cache.get() {
            return Ok(registry);
        }
        let registry = load_registry(&self.path)?;
        Ok(self.cache.get_or_init(|| registry))
    }
}

#[instrument]
fn load_registry(path: &Path) -> Result<Registry, InfrastructureError> {
    if !path.exists() {
        // Pas d'erreur : un registre vide au premier lancement.
        debug!("no connection registry yet");
        return Ok(Registry::new());
    }

    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(Registry::new());
    }
    let registry: Registry = serde_yaml::from_str(&content)?;
    debug!(connections = registry.len(), "connection registry loaded");
    Ok(registry)
}

impl ConnectionStore for FileConnectionStore {
    fn list(&self) -> Result<Registry, DvtError> {
        Ok(self.loaded()?.clone())
    }

    fn get(&self, name: &str) -> Result<Option<ConnectionDescriptor>, DvtError> {
        Ok(self.loaded()?.get(name).cloned())
    }

    fn store(&mut self, name: &str, descriptor: ConnectionDescriptor) -> Result<(), DvtError> {
        let mut next = self.loaded()?.clone();
        next.insert(name.to_string(), descriptor);

        // Persist first: the in-memory view only changes once the file is written.
        write_yaml(&self.path, &next)?;
        self.cache = OnceLock::from(next);

        info!(path = ?self.path, name, "connection registry flushed");
        Ok(())
    }
}
