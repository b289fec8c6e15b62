// dvt/src/main.rs

mod cli;
mod commands;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, ConnectionsCommand};
use dvt_core::domain::error::DomainError;
use dvt_core::infrastructure::error::InfrastructureError;
use dvt_core::{DvtError, ErrorKind};

fn init_tracing(verbose: bool) {
    // RUST_LOG=debug dvt run ... pour voir les détails
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // stdout reste réservé aux résultats (JSON, YAML, tableaux)
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn error_kind(err: &anyhow::Error) -> Option<ErrorKind> {
    if let Some(e) = err.downcast_ref::<DvtError>() {
        return Some(e.kind());
    }
    if let Some(e) = err.downcast_ref::<InfrastructureError>() {
        return Some(e.kind());
    }
    err.downcast_ref::<DomainError>().map(DomainError::kind)
}

fn kind_label(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::Configuration => "Configuration error",
        ErrorKind::Connection => "Connection error",
        ErrorKind::Matching => "Matching error",
        ErrorKind::Serialization => "Serialization error",
        ErrorKind::Execution => "Execution error",
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.command.verbose());

    let result = match cli.command {
        // --- USE CASE: RUN FROM ARGUMENTS ---
        Commands::Run(args) => commands::run::execute(args).await,

        // --- USE CASE: RUN FROM A YAML DOCUMENT ---
        Commands::RunConfig {
            config_file,
            verbose,
        } => commands::run_config::execute(&config_file, verbose).await,

        // --- USE CASE: TABLE DISCOVERY ---
        Commands::FindTables {
            source_conn,
            target_conn,
            score_cutoff,
            strict,
        } => commands::find_tables::execute(&source_conn, &target_conn, score_cutoff, strict).await,

        // --- USE CASE: CONNECTION REGISTRY ---
        Commands::Connections { action } => match action {
            ConnectionsCommand::List => commands::connections::list(),
            ConnectionsCommand::Add {
                connection_name,
                kind,
            } => commands::connections::add(&connection_name, kind.into()).await,
        },
    };

    if let Err(e) = result {
        let label = error_kind(&e).map(kind_label).unwrap_or("Error");
        eprintln!("❌ {}: {:#}", label, e);
        // Exit with error code for CI/CD
        std::process::exit(1);
    }
}
