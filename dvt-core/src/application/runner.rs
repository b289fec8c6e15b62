// dvt-core/src/application/runner.rs

use std::time::Instant;
use tracing::{debug, error, info, instrument};

use crate::domain::validation::ValidationConfig;
use crate::error::DvtError;
use crate::ports::engine::{ValidationEngine, ValidationOutcome};

#[derive(Debug, Default)]
pub struct RunReport {
    pub outcomes: Vec<ValidationOutcome>,
}

impl RunReport {
    pub fn completed(&self) -> usize {
        self.outcomes.len()
    }
}

/// Executes configs one by one, in order. The first failure aborts the rest.
#[instrument(skip_all, fields(validations = configs.len()))]
pub async fn run_validations(
    engine: &dyn ValidationEngine,
    configs: Vec<ValidationConfig>,
    verbose: bool,
) -> Result<RunReport, DvtError> {
    let mut report = RunReport::default();

    for config in configs {
        let name = config.table().to_string();
        let start = Instant::now();
        debug!(table = %name, "executing validation");

        match engine.execute(&config, verbose).await {
            Ok(outcome) => {
                debug!(table = %name, "validation finished in {:.2?}", start.elapsed());
                report.outcomes.push(outcome);
            }
            Err(e) => {
                error!(table = %name, "validation failed after {:.2?}: {}", start.elapsed(), e);
                return Err(DvtError::Execution {
                    table: name,
                    completed: report.completed(),
                    reason: e.to_string(),
                });
            }
        }
    }

    info!(completed = report.completed(), "all validations executed");
    Ok(report)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::application::testing::RecordingEngine;
    use crate::domain::aggregate::AggregateSpec;
    use crate::domain::connection::{ConnectionDescriptor, ConnectionRef, ResolvedConnection};
    use crate::domain::table::TableIdentity;
    use crate::domain::validation::ValidationType;
    use anyhow::Result;
    use std::sync::Arc;

    fn configs(tables: &[&str]) -> Result<Vec<ValidationConfig>> {
        let conn = Arc::new(ResolvedConnection {
            reference: ConnectionRef::Named("c".into()),
            descriptor: ConnectionDescriptor::DuckDB { path: "c".into() },
        });
        tables
            .iter()
            .map(|t| {
                ValidationConfig::new(
                    ValidationType::Column,
                    Arc::clone(&conn),
                    Arc::clone(&conn),
                    TableIdentity::new("s", *t),
                    vec![AggregateSpec::table_count()],
                    None,
                    None,
                )
                .map_err(Into::into)
            })
            .collect()
    }

    #[tokio::test]
    async fn test_runs_in_list_order() -> Result<()> {
        let engine = RecordingEngine::default();
        let report = run_validations(&engine, configs(&["c", "a", "b"])?, false).await?;
        assert_eq!(report.completed(), 3);
        assert_eq!(*engine.executed.lock().unwrap(), vec!["s.c", "s.a", "s.b"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_fail_fast() -> Result<()> {
        let engine = RecordingEngine {
            fail_on: Some("s.b".into()),
            ..Default::default()
        };
        let result = run_validations(&engine, configs(&["a", "b", "c"])?, false).await;

        match result {
            Err(DvtError::Execution { table, completed, .. }) => {
                assert_eq!(table, "s.b");
                assert_eq!(completed, 1);
            }
            other => anyhow::bail!("Expected execution error, got {:?}", other.map(|r| r.completed())),
        }
        assert_eq!(*engine.executed.lock().unwrap(), vec!["s.a"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_list() -> Result<()> {
        let report = run_validations(&RecordingEngine::default(), vec![], true).await?;
        assert_eq!(report.completed(), 0);
        Ok(())
    }
}
