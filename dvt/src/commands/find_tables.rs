// dvt/src/commands/find_tables.rs
//
// USE CASE: Pair source and target tables, print them as a tables list.

use dvt_core::application::{RunContext, find_tables};
use dvt_core::domain::connection::ConnectionRef;
use dvt_core::domain::table::{TableIdentity, TableMatch};
use dvt_core::infrastructure::{DefaultClientFactory, FileConnectionStore};

pub async fn execute(
    source_conn: &str,
    target_conn: &str,
    score_cutoff: f64,
    strict: bool,
) -> anyhow::Result<()> {
    let source = ConnectionRef::parse(source_conn)?;
    let target = ConnectionRef::parse(target_conn)?;

    let store = FileConnectionStore::from_env();
    let factory = DefaultClientFactory;
    let mut ctx = RunContext::new(&store, &factory);

    let report = find_tables(&mut ctx, &source, &target, score_cutoff).await?;
    // Toujours visible, quel que soit le filtre de logs
    for key in &report.unmatched {
        eprintln!("⚠️  No target table matches '{}' (cutoff {})", key, score_cutoff);
    }

    let identities: Vec<TableIdentity> = if strict {
        report
            .into_strict()?
            .iter()
            .map(TableMatch::to_identity)
            .collect()
    } else {
        report.identities()
    };

    // Directement réutilisable avec `dvt run --tables-list`
    println!("{}", serde_json::to_string(&identities)?);
    Ok(())
}
