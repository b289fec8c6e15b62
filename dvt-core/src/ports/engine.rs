// dvt-core/src/ports/engine.rs

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::validation::ValidationConfig;
use crate::error::DvtError;

/// The aggregate query issued against one side of a validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregateQuery {
    /// "source" or "target"
    pub side: String,
    pub connection: String,
    pub fields: Vec<String>,
    pub sql: String,
}

/// What the engine reports back for a single validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationOutcome {
    pub validation_name: String,
    pub validation_type: String,
    pub queries: Vec<AggregateQuery>,
}

/// The external engine that actually runs a validation.
#[async_trait]
pub trait ValidationEngine: Send + Sync {
    async fn execute(
        &self,
        config: &ValidationConfig,
        verbose: bool,
    ) -> Result<ValidationOutcome, DvtError>;
}
