// dvt-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

use crate::error::ErrorKind;

#[derive(Error, Debug, Diagnostic)]
pub enum DomainError {
    #[error("Invalid validation configuration: {0}")]
    #[diagnostic(code(dvt::domain::config))]
    InvalidConfig(String),

    #[error("Unsupported validation type '{0}'")]
    #[diagnostic(
        code(dvt::domain::validation_type),
        help("Supported types are 'Column' and 'GroupedColumn'.")
    )]
    UnsupportedValidationType(String),

    #[error("Grouped validation of '{0}' requires at least one grouping column")]
    #[diagnostic(
        code(dvt::domain::grouping),
        help("Pass --grouped-columns '[\"col_a\", \"col_b\"]'.")
    )]
    MissingGroupColumns(String),

    #[error("Invalid connection descriptor: {0}")]
    #[diagnostic(code(dvt::domain::connection))]
    InvalidConnection(String),

    #[error("No target table scored >= {cutoff} for source table '{source_key}'")]
    #[diagnostic(
        code(dvt::domain::matching),
        help("Lower --score-cutoff or pass an explicit --tables-list.")
    )]
    Unmatched { source_key: String, cutoff: f64 },

    #[error("Score cutoff must lie in [0, 1], got {0}")]
    #[diagnostic(code(dvt::domain::cutoff))]
    InvalidCutoff(f64),
}

impl DomainError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::InvalidConfig(_)
            | DomainError::UnsupportedValidationType(_)
            | DomainError::MissingGroupColumns(_)
            | DomainError::InvalidCutoff(_) => ErrorKind::Configuration,
            DomainError::InvalidConnection(_) => ErrorKind::Connection,
            DomainError::Unmatched { .. } => ErrorKind::Matching,
        }
    }
}
