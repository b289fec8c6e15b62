// dvt/src/commands/run.rs
//
// USE CASE: Build validations from arguments, then run or save them.

use anyhow::Context;

use dvt_core::DvtError;
use dvt_core::application::{
    AggregateRequest, RunContext, RunRequest, build_configs_from_request, run_validations,
};
use dvt_core::domain::aggregate::{AggregateKind, ColumnSelector};
use dvt_core::domain::connection::ConnectionRef;
use dvt_core::domain::table::TableIdentity;
use dvt_core::domain::validation::{ResultHandlerConfig, ValidationType};
use dvt_core::infrastructure::{
    DefaultClientFactory, FileConnectionStore, QueryPlanEngine, ValidationDocument, save_document,
};

use crate::cli::RunArgs;
use crate::commands::parse_json_arg;

/// Turns raw flags into a typed request. No connection is opened here.
pub fn build_request(args: &RunArgs) -> Result<RunRequest, DvtError> {
    let validation_type: ValidationType = args.validation_type.parse()?;
    let tables: Vec<TableIdentity> = parse_json_arg("--tables-list", &args.tables_list)?;

    let mut aggregates = AggregateRequest::default();
    for (kind, raw) in [
        (AggregateKind::Count, &args.count),
        (AggregateKind::Sum, &args.sum),
        (AggregateKind::Avg, &args.avg),
        (AggregateKind::Min, &args.min),
        (AggregateKind::Max, &args.max),
    ] {
        if let Some(raw) = raw {
            aggregates = aggregates.with(kind, ColumnSelector::parse(raw)?);
        }
    }

    let grouped_columns: Vec<String> = match &args.grouped_columns {
        Some(raw) => parse_json_arg("--grouped-columns", raw)?,
        None => Vec::new(),
    };
    let result_handler: Option<ResultHandlerConfig> = match &args.result_handler_config {
        Some(raw) => Some(parse_json_arg("--result-handler-config", raw)?),
        None => None,
    };

    Ok(RunRequest {
        validation_type,
        source: ConnectionRef::parse(&args.source_conn)?,
        target: ConnectionRef::parse(&args.target_conn)?,
        tables,
        aggregates,
        grouped_columns,
        result_handler,
    })
}

pub async fn execute(args: RunArgs) -> anyhow::Result<()> {
    let request = build_request(&args)?;

    let store = FileConnectionStore::from_env();
    let factory = DefaultClientFactory;
    let mut ctx = RunContext::new(&store, &factory);

    let configs = build_configs_from_request(&mut ctx, &request).await?;

    match &args.config_file {
        Some(path) => {
            let document = ValidationDocument::from_configs(&configs)?;
            save_document(path, &document)
                .with_context(|| format!("Failed to write validations to {:?}", path))?;
            println!(
                "📝 {} validation(s) written to {}",
                document.validations.len(),
                path.display()
            );
        }
        None => {
            let engine = QueryPlanEngine::stdout();
            let report = run_validations(&engine, configs, args.verbose).await?;
            eprintln!("✨ {} validation(s) executed", report.completed());
        }
    }

    Ok(())
}
