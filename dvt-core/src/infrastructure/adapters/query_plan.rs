// dvt-core/src/infrastructure/adapters/query_plan.rs

use async_trait::async_trait;
use std::io::Write;
use std::sync::Mutex;
use tracing::{debug, instrument};

use crate::domain::aggregate::AggregateSpec;
use crate::domain::table::TableDescriptor;
use crate::domain::validation::ValidationConfig;
use crate::error::DvtError;
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::result_handler::TextResultHandler;
use crate::ports::engine::{AggregateQuery, ValidationEngine, ValidationOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Source,
    Target,
}

impl Side {
    fn as_str(&self) -> &'static str {
        match self {
            Side::Source => "source",
            Side::Target => "target",
        }
    }
}

fn quote(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

fn aggregate_expr(aggregate: &AggregateSpec, side: Side) -> String {
    let column = match side {
        Side::Source => aggregate.source_column.as_deref(),
        Side::Target => aggregate
            .target_column
            .as_deref()
            .or(aggregate.source_column.as_deref()),
    };
    let function = aggregate.kind.as_str().to_uppercase();
    match column {
        Some(c) => format!("{}({}) AS {}", function, quote(c), quote(&aggregate.field_alias)),
        None => format!("{}(*) AS {}", function, quote(&aggregate.field_alias)),
    }
}

/// The aggregate SQL one side of `config` must run.
fn plan_side(config: &ValidationConfig, side: Side) -> AggregateQuery {
    let (table, connection): (TableDescriptor, String) = match side {
        Side::Source => (config.table().source(), config.source().label()),
        Side::Target => (config.table().target(), config.target().label()),
    };

    let mut select = Vec::new();
    let mut group_by = Vec::new();
    let mut fields = Vec::new();

    if let Some(group) = config.group() {
        for column in group.columns() {
            let name = match side {
                Side::Source => &column.source_column,
                Side::Target => &column.target_column,
            };
            select.push(format!("{} AS {}", quote(name), quote(&column.field_alias)));
            group_by.push(quote(name));
            fields.push(column.field_alias.clone());
        }
    }
    for aggregate in config.aggregates() {
        select.push(aggregate_expr(aggregate, side));
        fields.push(aggregate.field_alias.clone());
    }

    let mut sql = format!(
        "SELECT {} FROM {}.{}",
        select.join(", "),
        quote(&table.schema_name),
        quote(&table.table_name)
    );
    if !group_by.is_empty() {
        sql.push_str(&format!(" GROUP BY {}", group_by.join(", ")));
    }

    AggregateQuery {
        side: side.as_str().to_string(),
        connection,
        fields,
        sql,
    }
}

/// Plans each validation's aggregate queries and hands them to the result handler.
///
/// Nothing is executed against the data systems.
pub struct QueryPlanEngine {
    out: Mutex<Box<dyn Write + Send>>,
}

impl QueryPlanEngine {
    pub fn stdout() -> Self {
        Self::with_writer(Box::new(std::io::stdout()))
    }

    pub fn with_writer(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }
}

#[async_trait]
impl ValidationEngine for QueryPlanEngine {
    #[instrument(skip_all, fields(table = %config.table(), validation_type = %config.validation_type()))]
    async fn execute(
        &self,
        config: &ValidationConfig,
        verbose: bool,
    ) -> Result<ValidationOutcome, DvtError> {
        let queries = vec![
            plan_side(config, Side::Source),
            plan_side(config, Side::Target),
        ];
        if verbose {
            for query in &queries {
                debug!(side = %query.side, connection = %query.connection, sql = %query.sql, "aggregate query");
            }
        }

        let outcome = ValidationOutcome {
            validation_name: config.table().to_string(),
            validation_type: config.validation_type().to_string(),
            queries,
        };

        let rendered = TextResultHandler::from_config(config.result_handler()).render(&outcome)?;
        let mut out = self.out.lock().map_err(|_| {
            InfrastructureError::Io(std::io::Error::other("Result writer Mutex Poisoned"))
        })?;
        out.write_all(rendered.as_bytes())?;
        out.flush()?;

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregate::AggregateKind;
    use crate::domain::connection::{ConnectionDescriptor, ConnectionRef, ResolvedConnection};
    use crate::domain::table::TableIdentity;
    use crate::domain::validation::{GroupSpec, OutputFormat, ResultHandlerConfig, ValidationType};
    use anyhow::Result;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().map_err(|_| std::io::Error::other("poisoned"))?.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn conn(name: &str) -> Arc<ResolvedConnection> {
        Arc::new(ResolvedConnection {
            reference: ConnectionRef::Named(name.into()),
            descriptor: ConnectionDescriptor::DuckDB {
                path: format!("{}.duckdb", name),
            },
        })
    }

    #[test]
    fn test_plan_column_validation() -> Result<()> {
        let config = ValidationConfig::new(
            ValidationType::Column,
            conn("A"),
            conn("B"),
            TableIdentity {
                target_table_name: Some("orders_v2".into()),
                ..TableIdentity::new("sales", "orders")
            },
            vec![
                AggregateSpec::table_count(),
                AggregateSpec::column(AggregateKind::Sum, "amount"),
            ],
            None,
            None,
        )?;

        let source = plan_side(&config, Side::Source);
        assert_eq!(
            source.sql,
            "SELECT COUNT(*) AS \"count\", SUM(\"amount\") AS \"sum__amount\" FROM \"sales\".\"orders\""
        );
        assert_eq!(source.fields, vec!["count", "sum__amount"]);
        assert!(plan_side(&config, Side::Target).sql.ends_with("FROM \"sales\".\"orders_v2\""));
        Ok(())
    }

    #[test]
    fn test_plan_grouped_validation() -> Result<()> {
        let config = ValidationConfig::new(
            ValidationType::GroupedColumn,
            conn("A"),
            conn("B"),
            TableIdentity::new("sales", "orders"),
            vec![AggregateSpec::table_count()],
            Some(GroupSpec::from_columns(&["region".to_string()])),
            None,
        )?;

        let query = plan_side(&config, Side::Source);
        assert_eq!(
            query.sql,
            "SELECT \"region\" AS \"region\", COUNT(*) AS \"count\" FROM \"sales\".\"orders\" GROUP BY \"region\""
        );
        assert_eq!(query.fields, vec!["region", "count"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_execute_writes_through_handler() -> Result<()> {
        let buffer = SharedBuffer::default();
        let engine = QueryPlanEngine::with_writer(Box::new(buffer.clone()));
        let config = ValidationConfig::new(
            ValidationType::Column,
            conn("A"),
            conn("B"),
            TableIdentity::new("sales", "orders"),
            vec![AggregateSpec::table_count()],
            None,
            Some(ResultHandlerConfig::Text {
                format: OutputFormat::Json,
            }),
        )?;

        let outcome = engine.execute(&config, true).await?;
        assert_eq!(outcome.queries.len(), 2);

        let written = String::from_utf8(buffer.0.lock().map_err(|_| anyhow::anyhow!("poisoned"))?.clone())?;
        let value: serde_json::Value = serde_json::from_str(&written)?;
        assert_eq!(value["validation_name"], "sales.orders");
        assert_eq!(value["queries"][0]["connection"], "A");
        Ok(())
    }
}
