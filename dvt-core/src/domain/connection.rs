// dvt-core/src/domain/connection.rs

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::error::DomainError;

fn default_pg_port() -> u16 {
    5432
}

/// How to reach a source or target data system.
///
/// Credentials are referenced (`password_env`), never stored inline, so a
/// descriptor can be persisted in the registry or a validation document as is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "source_type")]
pub enum ConnectionDescriptor {
    DuckDB {
        path: String,
    },
    Postgres {
        host: String,
        #[serde(default = "default_pg_port")]
        port: u16,
        database: String,
        user: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        password_env: Option<String>,
    },
}

impl ConnectionDescriptor {
    pub fn source_type(&self) -> &'static str {
        match self {
            ConnectionDescriptor::DuckDB { .. } => "DuckDB",
            ConnectionDescriptor::Postgres { .. } => "Postgres",
        }
    }

    /// Structural check only. Reachability is the client factory's concern.
    pub fn validate(&self) -> Result<(), DomainError> {
        let blank = |field: &str, value: &str| {
            if value.trim().is_empty() {
                Err(DomainError::InvalidConnection(format!(
                    "{} connection requires a non-empty '{}'",
                    self.source_type(),
                    field
                )))
            } else {
                Ok(())
            }
        };

        match self {
            ConnectionDescriptor::DuckDB { path } => blank("path", path),
            ConnectionDescriptor::Postgres {
                host,
                port,
                database,
                user,
                ..
            } => {
                blank("host", host)?;
                blank("database", database)?;
                blank("user", user)?;
                if *port == 0 {
                    return Err(DomainError::InvalidConnection(
                        "Postgres connection requires a non-zero 'port'".into(),
                    ));
                }
                Ok(())
            }
        }
    }
}

/// A connection as written by the user: a registry name or an inline descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConnectionRef {
    Named(String),
    Inline(ConnectionDescriptor),
}

impl ConnectionRef {
    /// CLI form: a JSON object is an inline descriptor, anything else a name.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();
        if trimmed.starts_with('{') {
            let descriptor: ConnectionDescriptor = serde_json::from_str(trimmed).map_err(|e| {
                DomainError::InvalidConnection(format!("inline descriptor is malformed: {}", e))
            })?;
            descriptor.validate()?;
            Ok(ConnectionRef::Inline(descriptor))
        } else if trimmed.is_empty() {
            Err(DomainError::InvalidConnection(
                "connection name is empty".into(),
            ))
        } else {
            Ok(ConnectionRef::Named(trimmed.to_string()))
        }
    }
}

impl fmt::Display for ConnectionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionRef::Named(name) => write!(f, "{}", name),
            ConnectionRef::Inline(descriptor) => write!(f, "<inline {}>", descriptor.source_type()),
        }
    }
}

/// A reference together with the descriptor it resolved to.
///
/// Created once per run and shared behind `Arc` by every config that uses it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConnection {
    pub reference: ConnectionRef,
    pub descriptor: ConnectionDescriptor,
}

impl ResolvedConnection {
    pub fn label(&self) -> String {
        self.reference.to_string()
    }
}
