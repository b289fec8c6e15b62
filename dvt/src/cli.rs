// dvt/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use dvt_core::domain::connection::ConnectionDescriptor;
use dvt_core::domain::matching::DEFAULT_SCORE_CUTOFF;

#[derive(Parser)]
#[command(name = "dvt")]
#[command(about = "Source/target data validation: config assembly and table matching", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 🚀 Builds validations from arguments and runs them (or saves them with --config-file)
    Run(RunArgs),

    /// 📄 Runs every validation of a YAML document, in order
    RunConfig {
        /// Validation document to execute
        #[arg(long, short = 'c')]
        config_file: PathBuf,

        #[arg(long, short)]
        verbose: bool,
    },

    /// 🔎 Pairs the tables of two connections by name similarity
    FindTables {
        #[arg(long)]
        source_conn: String,

        #[arg(long)]
        target_conn: String,

        /// Minimum Jaro-Winkler score (0..=1) for a pairing
        #[arg(long, default_value_t = DEFAULT_SCORE_CUTOFF)]
        score_cutoff: f64,

        /// Fail if any source table has no match
        #[arg(long)]
        strict: bool,
    },

    /// 🔗 Manages stored connections
    Connections {
        #[command(subcommand)]
        action: ConnectionsCommand,
    },
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Stored connection name, or an inline JSON descriptor
    #[arg(long)]
    pub source_conn: String,

    #[arg(long)]
    pub target_conn: String,

    /// JSON list, ex: '[{"schema_name": "s", "table_name": "t"}]'
    #[arg(long)]
    pub tables_list: String,

    /// Column | GroupedColumn
    #[arg(long = "type", value_name = "TYPE")]
    pub validation_type: String,

    /// '*' or a JSON list of columns
    #[arg(long)]
    pub count: Option<String>,

    #[arg(long)]
    pub sum: Option<String>,

    #[arg(long)]
    pub avg: Option<String>,

    #[arg(long)]
    pub min: Option<String>,

    #[arg(long)]
    pub max: Option<String>,

    /// JSON list of grouping columns (GroupedColumn only)
    #[arg(long)]
    pub grouped_columns: Option<String>,

    /// JSON object, ex: '{"type": "Text", "format": "csv"}'
    #[arg(long)]
    pub result_handler_config: Option<String>,

    /// Save the validations to this YAML file instead of running them
    #[arg(long, short = 'c')]
    pub config_file: Option<PathBuf>,

    #[arg(long, short)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum ConnectionsCommand {
    /// Lists stored connections
    List,

    /// Verifies a connection and stores it under a name
    Add {
        #[arg(long, short = 'c')]
        connection_name: String,

        #[command(subcommand)]
        kind: ConnectionKind,
    },
}

#[derive(Subcommand)]
pub enum ConnectionKind {
    /// 🦆 A DuckDB database file
    #[command(name = "duckdb")]
    DuckDB {
        #[arg(long)]
        path: String,
    },

    /// 🐘 A PostgreSQL database
    Postgres {
        #[arg(long)]
        host: String,

        #[arg(long, default_value_t = 5432)]
        port: u16,

        #[arg(long)]
        database: String,

        #[arg(long)]
        user: String,

        /// Environment variable holding the password
        #[arg(long)]
        password_env: Option<String>,
    },
}

impl From<ConnectionKind> for ConnectionDescriptor {
    fn from(kind: ConnectionKind) -> Self {
        match kind {
            ConnectionKind::DuckDB { path } => ConnectionDescriptor::DuckDB { path },
            ConnectionKind::Postgres {
                host,
                port,
                database,
                user,
                password_env,
            } => ConnectionDescriptor::Postgres {
                host,
                port,
                database,
                user,
                password_env,
            },
        }
    }
}

impl Commands {
    pub fn verbose(&self) -> bool {
        match self {
            Commands::Run(args) => args.verbose,
            Commands::RunConfig { verbose, .. } => *verbose,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, bail};
    use clap::Parser;

    #[test]
    fn test_cli_parse_run() -> Result<()> {
        let args = Cli::parse_from([
            "dvt",
            "run",
            "--source-conn",
            "A",
            "--target-conn",
            "B",
            "--tables-list",
            r#"[{"schema_name": "s", "table_name": "t"}]"#,
            "--type",
            "Column",
            "--count",
            "*",
        ]);
        match args.command {
            Commands::Run(run) => {
                assert_eq!(run.source_conn, "A");
                assert_eq!(run.validation_type, "Column");
                assert_eq!(run.count.as_deref(), Some("*"));
                assert_eq!(run.sum, None);
                assert_eq!(run.config_file, None);
                assert!(!run.verbose);
                Ok(())
            }
            _ => bail!("Expected Run command"),
        }
    }

    #[test]
    fn test_cli_run_requires_tables_list() {
        let parsed = Cli::try_parse_from([
            "dvt",
            "run",
            "--source-conn",
            "A",
            "--target-conn",
            "B",
            "--type",
            "Column",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_cli_parse_find_tables_defaults() -> Result<()> {
        let args = Cli::parse_from(["dvt", "find-tables", "--source-conn", "A", "--target-conn", "B"]);
        match args.command {
            Commands::FindTables {
                score_cutoff,
                strict,
                ..
            } => {
                assert_eq!(score_cutoff, 0.8);
                assert!(!strict);
                Ok(())
            }
            _ => bail!("Expected FindTables command"),
        }
    }

    #[test]
    fn test_cli_parse_run_config_verbose() -> Result<()> {
        let args = Cli::parse_from(["dvt", "run-config", "-c", "v.yaml", "--verbose"]);
        assert!(args.command.verbose());
        match args.command {
            Commands::RunConfig { config_file, .. } => {
                assert_eq!(config_file.to_string_lossy(), "v.yaml");
                Ok(())
            }
            _ => bail!("Expected RunConfig command"),
        }
    }

    #[test]
    fn test_cli_parse_connections_add_postgres() -> Result<()> {
        let args = Cli::parse_from([
            "dvt",
            "connections",
            "add",
            "--connection-name",
            "warehouse",
            "postgres",
            "--host",
            "db.local",
            "--database",
            "analytics",
            "--user",
            "dvt",
            "--password-env",
            "PGPASSWORD",
        ]);
        match args.command {
            Commands::Connections {
                action:
                    ConnectionsCommand::Add {
                        connection_name,
                        kind,
                    },
            } => {
                assert_eq!(connection_name, "warehouse");
                assert_eq!(
                    ConnectionDescriptor::from(kind),
                    ConnectionDescriptor::Postgres {
                        host: "db.local".into(),
                        port: 5432,
                        database: "analytics".into(),
                        user: "dvt".into(),
                        password_env: Some("PGPASSWORD".into()),
                    }
                );
                Ok(())
            }
            _ => bail!("Expected Connections Add command"),
        }
    }
}
