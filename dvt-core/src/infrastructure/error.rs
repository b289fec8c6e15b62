// dvt-core/src/infrastructure/error.rs

use miette::Diagnostic;
use thiserror::Error;

use crate::error::ErrorKind;

#[derive(Error, Debug, Diagnostic)]
pub enum DatabaseError {
    #[error("DuckDB Engine Error: {0}")]
    #[diagnostic(
        code(dvt::infra::database::duckdb),
        help("An error occurred inside the DuckDB client.")
    )]
    DuckDB(#[from] duckdb::Error),

    #[error("PostgreSQL Error: {0}")]
    #[diagnostic(
        code(dvt::infra::database::postgres),
        help("Check host, port and credentials of the connection.")
    )]
    Postgres(#[from] tokio_postgres::Error),
}

#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    // --- DATABASE (Abstracted) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Database(#[from] DatabaseError),

    // --- FILESYSTEM (IO) ---
    #[error("File System Error: {0}")]
    #[diagnostic(
        code(dvt::infra::io),
        help("Check file permissions or path validity.")
    )]
    Io(#[from] std::io::Error),

    // --- CONFIG / YAML / JSON ---
    #[error("YAML Parsing Error: {0}")]
    #[diagnostic(
        code(dvt::infra::yaml),
        help("Check your YAML syntax (indentation, types).")
    )]
    YamlError(#[from] serde_yaml::Error),

    #[error("JSON Parsing Error in {context}: {source}")]
    #[diagnostic(
        code(dvt::infra::json),
        help("List arguments are JSON, e.g. '[\"col_a\"]' or '[{{\"schema_name\": \"s\", \"table_name\": \"t\"}}]'.")
    )]
    JsonError {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Configuration Error: {0}")]
    #[diagnostic(code(dvt::infra::config))]
    ConfigError(String),

    #[error("Validation document is missing required key '{0}'")]
    #[diagnostic(
        code(dvt::infra::document),
        help("A validation document needs 'source', 'target' and 'validations'.")
    )]
    MissingKey(&'static str),

    #[error("Validation block #{index} cannot be decoded: {reason}")]
    #[diagnostic(code(dvt::infra::document::block))]
    InvalidBlock { index: usize, reason: String },

    // --- CONNECTIONS ---
    #[error("Connection '{0}' is not registered")]
    #[diagnostic(
        code(dvt::infra::connection::unknown),
        help("Run 'dvt connections list' or register it with 'dvt connections add'.")
    )]
    UnknownConnection(String),

    #[error("Could not acquire a client for '{connection}': {reason}")]
    #[diagnostic(code(dvt::infra::connection::client))]
    ClientAcquisition { connection: String, reason: String },
}

impl InfrastructureError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            InfrastructureError::Database(_)
            | InfrastructureError::UnknownConnection(_)
            | InfrastructureError::ClientAcquisition { .. } => ErrorKind::Connection,
            InfrastructureError::MissingKey(_) | InfrastructureError::InvalidBlock { .. } => {
                ErrorKind::Serialization
            }
            InfrastructureError::YamlError(_)
            | InfrastructureError::Io(_)
            | InfrastructureError::JsonError { .. }
            | InfrastructureError::ConfigError(_) => ErrorKind::Configuration,
        }
    }

    pub fn json(context: impl Into<String>, source: serde_json::Error) -> Self {
        InfrastructureError::JsonError {
            context: context.into(),
            source,
        }
    }
}

// Manual implementation for shortcuts (e.g. `?` operator on duckdb calls)
impl From<duckdb::Error> for InfrastructureError {
    fn from(err: duckdb::Error) -> Self {
        InfrastructureError::Database(DatabaseError::DuckDB(err))
    }
}

impl From<tokio_postgres::Error> for InfrastructureError {
    fn from(err: tokio_postgres::Error) -> Self {
        InfrastructureError::Database(DatabaseError::Postgres(err))
    }
}
