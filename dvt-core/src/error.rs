// dvt-core/src/error.rs

use crate::domain::error::DomainError;
use crate::infrastructure::error::InfrastructureError;
use thiserror::Error;

/// Coarse error taxonomy surfaced to the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Connection,
    Matching,
    Serialization,
    Execution,
}

#[derive(Error, Debug)]
pub enum DvtError {
    // --- ERREURS DU DOMAINE (Assembly rules, matching) ---
    #[error(transparent)]
    Domain(#[from] DomainError),

    // --- ERREURS D'INFRASTRUCTURE (IO, Parsing, Clients) ---
    #[error(transparent)]
    Infrastructure(#[from] InfrastructureError),

    // --- ERREURS D'EXÉCUTION ---
    #[error("Validation of '{table}' failed after {completed} completed validation(s): {reason}")]
    Execution {
        table: String,
        completed: usize,
        reason: String,
    },

    #[error("Internal Error: {0}")]
    InternalError(String),
}

impl DvtError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DvtError::Domain(e) => e.kind(),
            DvtError::Infrastructure(e) => e.kind(),
            DvtError::Execution { .. } | DvtError::InternalError(_) => ErrorKind::Execution,
        }
    }
}

// Manual implementation to avoid duplicate enum variant but keep ergonomics
impl From<std::io::Error> for DvtError {
    fn from(err: std::io::Error) -> Self {
        DvtError::Infrastructure(InfrastructureError::Io(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_follows_layer() {
        let err: DvtError = DomainError::InvalidConfig("no tables".into()).into();
        assert_eq!(err.kind(), ErrorKind::Configuration);

        let err: DvtError = InfrastructureError::UnknownConnection("warehouse".into()).into();
        assert_eq!(err.kind(), ErrorKind::Connection);

        let err: DvtError = std::io::Error::other("disk full").into();
        assert_eq!(err.kind(), ErrorKind::Configuration);

        let err = DvtError::Execution {
            table: "s.t".into(),
            completed: 2,
            reason: "boom".into(),
        };
        assert_eq!(err.kind(), ErrorKind::Execution);
        assert!(err.to_string().contains("after 2 completed"));
    }
}
