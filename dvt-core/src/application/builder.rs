// dvt-core/src/application/builder.rs

use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::application::assembler::{AggregateRequest, assemble_aggregates};
use crate::application::resolver::RunContext;
use crate::domain::aggregate::AggregateSpec;
use crate::domain::connection::ConnectionRef;
use crate::domain::error::DomainError;
use crate::domain::table::TableIdentity;
use crate::domain::validation::{GroupSpec, ResultHandlerConfig, ValidationConfig, ValidationType};
use crate::error::DvtError;
use crate::infrastructure::config::document::ValidationDocument;
use crate::infrastructure::error::InfrastructureError;

/// Validation intent as expressed on the command line.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub validation_type: ValidationType,
    pub source: ConnectionRef,
    pub target: ConnectionRef,
    pub tables: Vec<TableIdentity>,
    pub aggregates: AggregateRequest,
    pub grouped_columns: Vec<String>,
    pub result_handler: Option<ResultHandlerConfig>,
}

/// One config per requested table, in request order.
#[instrument(skip_all, fields(tables = request.tables.len(), validation_type = %request.validation_type))]
pub async fn build_configs_from_request(
    ctx: &mut RunContext<'_>,
    request: &RunRequest,
) -> Result<Vec<ValidationConfig>, DvtError> {
    if request.tables.is_empty() {
        return Err(DomainError::InvalidConfig("the tables list is empty".into()).into());
    }

    // Both clients up front: a bad connection fails before any table is assembled.
    let (source, source_client) = ctx.connect(&request.source).await?;
    let (target, _) = ctx.connect(&request.target).await?;

    let group = match request.validation_type {
        ValidationType::GroupedColumn if !request.grouped_columns.is_empty() => {
            Some(GroupSpec::from_columns(&request.grouped_columns))
        }
        ValidationType::GroupedColumn => None,
        ValidationType::Column => {
            if !request.grouped_columns.is_empty() {
                warn!("grouping columns are ignored for 'Column' validations");
            }
            None
        }
    };

    let mut configs = Vec::with_capacity(request.tables.len());
    for table in &request.tables {
        let columns = if request.aggregates.needs_schema() {
            source_client
                .describe_table(&table.schema_name, &table.table_name)
                .await?
        } else {
            Vec::new()
        };

        let aggregates = assemble_aggregates(&request.aggregates, &columns);
        configs.push(ValidationConfig::new(
            request.validation_type,
            Arc::clone(&source),
            Arc::clone(&target),
            table.clone(),
            aggregates,
            group.clone(),
            request.result_handler.clone(),
        )?);
    }

    info!(configs = configs.len(), "validation configs assembled from arguments");
    Ok(configs)
}

/// One config per document block, in document order. Aggregates and grouping
/// are taken as written; only the shared connections and handler are injected.
#[instrument(skip_all, fields(validations = document.validations.len()))]
pub async fn build_configs_from_document(
    ctx: &mut RunContext<'_>,
    document: ValidationDocument,
) -> Result<Vec<ValidationConfig>, DvtError> {
    let (source, _) = ctx.connect(&document.source).await?;
    let (target, _) = ctx.connect(&document.target).await?;

    let mut configs = Vec::with_capacity(document.validations.len());
    for (index, block) in document.validations.into_iter().enumerate() {
        let aggregates = if block.aggregates.is_empty() {
            vec![AggregateSpec::table_count()]
        } else {
            block.aggregates
        };

        let config = ValidationConfig::new(
            block.validation_type,
            Arc::clone(&source),
            Arc::clone(&target),
            block.table,
            aggregates,
            block.grouped_columns,
            document.result_handler.clone(),
        )
        .map_err(|e| InfrastructureError::InvalidBlock {
            index,
            reason: e.to_string(),
        })?;
        configs.push(config);
    }

    info!(configs = configs.len(), "validation configs loaded from document");
    Ok(configs)
}
