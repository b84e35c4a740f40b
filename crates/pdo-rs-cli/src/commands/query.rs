//! The `query` command: compile a spec, run it, print the rows as JSON.

use async_trait::async_trait;
use pdo_rs_core::{PdoResult, Settings};
use pdo_rs_db::{DbExecutor, QuerySpec};

use crate::command::ManagementCommand;
use crate::commands::{read_spec, spec_arguments};

/// Runs a spec against the configured database.
pub struct QueryCommand;

/// Runs `spec` on `db` and returns the rows as a JSON array.
///
/// With `first`, only one row is fetched and the result is that row's
/// object, or `null`.
pub async fn run_spec(
    spec: QuerySpec,
    settings: &Settings,
    db: &dyn DbExecutor,
    first: bool,
) -> PdoResult<serde_json::Value> {
    let builder = spec.into_builder(settings.compiler);
    if first {
        let row = builder.find(db).await?;
        return Ok(row.map_or(serde_json::Value::Null, |r| r.to_json()));
    }
    let rows = builder.select(db).await?;
    Ok(serde_json::Value::Array(
        rows.iter().map(pdo_rs_db::Row::to_json).collect(),
    ))
}

#[async_trait]
impl ManagementCommand for QueryCommand {
    fn name(&self) -> &'static str {
        "query"
    }

    fn help(&self) -> &'static str {
        "Compile a JSON query spec, run it, and print the rows as JSON"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        spec_arguments(cmd)
            .arg(
                clap::Arg::new("first")
                    .long("first")
                    .action(clap::ArgAction::SetTrue)
                    .help("Fetch a single row"),
            )
            .arg(
                clap::Arg::new("pretty")
                    .long("pretty")
                    .action(clap::ArgAction::SetTrue)
                    .help("Pretty-print the JSON output"),
            )
    }

    async fn handle(&self, matches: &clap::ArgMatches, settings: &Settings) -> PdoResult<()> {
        let spec = read_spec(matches)?;
        let db = pdo_rs_db_backends::connect(&settings.database)?;
        let output = run_spec(spec, settings, &db, matches.get_flag("first")).await?;
        let text = if matches.get_flag("pretty") {
            serde_json::to_string_pretty(&output)?
        } else {
            output.to_string()
        };
        println!("{text}");
        Ok(())
    }
}

#[cfg(all(test, feature = "sqlite"))]
mod tests {
    use super::*;
    use pdo_rs_db_backends::SqliteBackend;

    async fn seeded() -> SqliteBackend {
        let db = SqliteBackend::memory().unwrap();
        db.execute_sql("CREATE TABLE item (id INTEGER PRIMARY KEY, label TEXT)", &[])
            .await
            .unwrap();
        db.execute_sql("INSERT INTO item (label) VALUES ('a'), ('b'), ('c')", &[])
            .await
            .unwrap();
        db
    }

    #[tokio::test]
    async fn test_run_spec_rows() {
        let db = seeded().await;
        let spec = QuerySpec::from_json(r#"{"table": "item", "order": {"id": "desc"}, "limit": [0, 2]}"#)
            .unwrap();
        let out = run_spec(spec, &Settings::default(), &db, false).await.unwrap();
        assert_eq!(
            out.to_string(),
            r#"[{"id":3,"label":"c"},{"id":2,"label":"b"}]"#
        );
    }

    #[tokio::test]
    async fn test_run_spec_first() {
        let db = seeded().await;
        let spec = QuerySpec::from_json(r#"{"table": "item", "where": {"label": "b"}}"#).unwrap();
        let out = run_spec(spec, &Settings::default(), &db, true).await.unwrap();
        assert_eq!(out, serde_json::json!({"id": 2, "label": "b"}));

        let spec = QuerySpec::from_json(r#"{"table": "item", "where": {"label": "z"}}"#).unwrap();
        let out = run_spec(spec, &Settings::default(), &db, true).await.unwrap();
        assert!(out.is_null());
    }
}
