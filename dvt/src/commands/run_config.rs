// dvt/src/commands/run_config.rs
//
// USE CASE: Run the validations of a YAML document.

use anyhow::Context;
use std::path::Path;

use dvt_core::application::{RunContext, build_configs_from_document, run_validations};
use dvt_core::infrastructure::{
    DefaultClientFactory, FileConnectionStore, QueryPlanEngine, load_document,
};

pub async fn execute(config_file: &Path, verbose: bool) -> anyhow::Result<()> {
    let document = load_document(config_file)
        .with_context(|| format!("Failed to load validations from {:?}", config_file))?;

    let store = FileConnectionStore::from_env();
    let factory = DefaultClientFactory;
    let mut ctx = RunContext::new(&store, &factory);

    let configs = build_configs_from_document(&mut ctx, document).await?;
    let engine = QueryPlanEngine::stdout();
    let report = run_validations(&engine, configs, verbose).await?;

    eprintln!("✨ {} validation(s) executed", report.completed());
    Ok(())
}
