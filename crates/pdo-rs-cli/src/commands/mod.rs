//! Built-in commands.
//!
//! `sql` and `query` read a JSON [`QuerySpec`](pdo_rs_db::QuerySpec) from a
//! positional argument, from `--file`, or from stdin, in that order.

pub mod check;
pub mod query;
pub mod sql;

pub use check::CheckCommand;
pub use query::QueryCommand;
pub use sql::SqlCommand;

use std::io::Read;
use std::path::PathBuf;

use pdo_rs_core::PdoResult;
use pdo_rs_db::QuerySpec;

use crate::command::CommandRegistry;

/// Registers every built-in command.
pub fn register_builtin_commands(registry: &mut CommandRegistry) {
    registry.register(Box::new(SqlCommand));
    registry.register(Box::new(QueryCommand));
    registry.register(Box::new(CheckCommand));
}

/// Adds the `SPEC` positional and the `--file` option.
pub(crate) fn spec_arguments(cmd: clap::Command) -> clap::Command {
    cmd.arg(
        clap::Arg::new("spec")
            .value_name("SPEC")
            .help("Query spec as inline JSON; read from stdin when omitted"),
    )
    .arg(
        clap::Arg::new("file")
            .long("file")
            .short('f')
            .value_name("PATH")
            .value_parser(clap::value_parser!(PathBuf))
            .conflicts_with("spec")
            .help("Read the query spec from a JSON file"),
    )
}

/// Reads and parses the spec named by [`spec_arguments`].
pub(crate) fn read_spec(matches: &clap::ArgMatches) -> PdoResult<QuerySpec> {
    let json = if let Some(inline) = matches.get_one::<String>("spec") {
        inline.clone()
    } else if let Some(path) = matches.get_one::<PathBuf>("file") {
        std::fs::read_to_string(path)?
    } else {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    };
    QuerySpec::from_json(&json)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> clap::ArgMatches {
        spec_arguments(clap::Command::new("t"))
            .try_get_matches_from(args)
            .unwrap()
    }

    #[test]
    fn test_register_builtin_commands() {
        let mut registry = CommandRegistry::new();
        register_builtin_commands(&mut registry);
        assert_eq!(registry.list_commands(), vec!["check", "query", "sql"]);
    }

    #[test]
    fn test_read_spec_inline() {
        let spec = read_spec(&parse(&["t", r#"{"table": "user"}"#])).unwrap();
        assert_eq!(spec.table, "user");
    }

    #[test]
    fn test_read_spec_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spec.json");
        std::fs::write(&path, r#"{"table": "orders", "limit": 5}"#).unwrap();
        let spec = read_spec(&parse(&["t", "--file", path.to_str().unwrap()])).unwrap();
        assert_eq!(spec.table, "orders");
        assert_eq!(spec.limit.offset, 5);
    }

    #[test]
    fn test_read_spec_missing_file() {
        let err = read_spec(&parse(&["t", "--file", "/nonexistent/spec.json"])).unwrap_err();
        assert_eq!(err.code(), "io_error");
    }

    #[test]
    fn test_spec_and_file_conflict() {
        let result = spec_arguments(clap::Command::new("t"))
            .try_get_matches_from(["t", "{}", "--file", "x.json"]);
        assert!(result.is_err());
    }
}
