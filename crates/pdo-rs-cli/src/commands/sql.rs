//! The `sql` command: compile a spec and print the statement without running it.

use async_trait::async_trait;
use pdo_rs_core::{PdoResult, Settings};
use pdo_rs_db::QuerySpec;

use crate::command::ManagementCommand;
use crate::commands::{read_spec, spec_arguments};

/// Prints the SELECT a spec compiles to.
pub struct SqlCommand;

/// Compiles `spec` under the compiler switches in `settings`.
pub fn compile_spec(spec: QuerySpec, settings: &Settings) -> PdoResult<String> {
    spec.into_builder(settings.compiler).to_sql()
}

#[async_trait]
impl ManagementCommand for SqlCommand {
    fn name(&self) -> &'static str {
        "sql"
    }

    fn help(&self) -> &'static str {
        "Compile a JSON query spec and print the SQL"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        spec_arguments(cmd)
    }

    async fn handle(&self, matches: &clap::ArgMatches, settings: &Settings) -> PdoResult<()> {
        let sql = compile_spec(read_spec(matches)?, settings)?;
        println!("{sql}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPEC: &str = r#"{
        "table": "user",
        "where": {"status": 1, "age": ["GT", 18]},
        "order": {"id": "desc"},
        "limit": [0, 10]
    }"#;

    #[test]
    fn test_compile_spec() {
        let sql = compile_spec(QuerySpec::from_json(SPEC).unwrap(), &Settings::default()).unwrap();
        assert_eq!(
            sql,
            "SELECT * FROM `user` WHERE `status` = '1' AND `age` > '18' ORDER BY `id` desc LIMIT 0,10"
        );
    }

    #[test]
    fn test_compile_spec_preserved_spacing() {
        let mut settings = Settings::default();
        settings.compiler.preserve_clause_spacing = true;
        let sql = compile_spec(QuerySpec::from_json(SPEC).unwrap(), &settings).unwrap();
        assert!(sql.contains("'18'  ORDER BY"));
    }

    #[test]
    fn test_compile_spec_errors() {
        let err = compile_spec(QuerySpec::default(), &Settings::default()).unwrap_err();
        assert_eq!(err.code(), "missing_table");

        let spec = QuerySpec::from_json(r#"{"table": "t", "where": {"a": ["OR", 1]}}"#).unwrap();
        let err = compile_spec(spec, &Settings::default()).unwrap_err();
        assert_eq!(err.code(), "unsupported_operator");
    }
}
