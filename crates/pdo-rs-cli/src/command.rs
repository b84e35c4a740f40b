//! Command framework for the `pdo-rs` binary.
//!
//! A [`ManagementCommand`] names itself, declares its clap arguments, and
//! handles one invocation. [`CommandRegistry`] collects commands, builds the
//! top-level clap `Command` (with the global `--settings` option), and
//! dispatches parsed matches.
//!
//! ```rust,no_run
//! use async_trait::async_trait;
//! use pdo_rs_cli::command::ManagementCommand;
//! use pdo_rs_core::{PdoResult, Settings};
//!
//! struct EngineCommand;
//!
//! #[async_trait]
//! impl ManagementCommand for EngineCommand {
//!     fn name(&self) -> &'static str { "engine" }
//!     fn help(&self) -> &'static str { "Print the configured engine" }
//!
//!     async fn handle(&self, _matches: &clap::ArgMatches, settings: &Settings) -> PdoResult<()> {
//!         println!("{}", settings.database.engine);
//!         Ok(())
//!     }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;
use pdo_rs_core::{PdoError, PdoResult, Settings};

/// A subcommand of the `pdo-rs` binary.
#[async_trait]
pub trait ManagementCommand: Send + Sync {
    /// The name used to invoke the command.
    fn name(&self) -> &'static str;

    /// One-line help text.
    fn help(&self) -> &'static str;

    /// Adds arguments to the clap subcommand. The default adds none.
    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd
    }

    /// Runs the command.
    async fn handle(&self, matches: &clap::ArgMatches, settings: &Settings) -> PdoResult<()>;
}

/// Commands by name.
#[derive(Default)]
pub struct CommandRegistry {
    commands: BTreeMap<&'static str, Box<dyn ManagementCommand>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a command, replacing any command with the same name.
    pub fn register(&mut self, command: Box<dyn ManagementCommand>) {
        self.commands.insert(command.name(), command);
    }

    pub fn get(&self, name: &str) -> Option<&dyn ManagementCommand> {
        self.commands.get(name).map(AsRef::as_ref)
    }

    /// Returns the registered names in sorted order.
    pub fn list_commands(&self) -> Vec<&str> {
        self.commands.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Builds the top-level clap `Command` with one subcommand per entry.
    pub fn build_cli(&self) -> clap::Command {
        let mut app = clap::Command::new("pdo-rs")
            .about("Compile and run loosely shaped SELECT descriptors")
            .subcommand_required(true)
            .arg(
                clap::Arg::new("settings")
                    .long("settings")
                    .short('s')
                    .global(true)
                    .value_name("FILE")
                    .value_parser(clap::value_parser!(PathBuf))
                    .help("Settings file (.toml or .json); PDO_* variables override it"),
            );

        for (name, cmd) in &self.commands {
            let subcmd = clap::Command::new(*name).about(cmd.help());
            app = app.subcommand(cmd.add_arguments(subcmd));
        }
        app
    }

    /// Dispatches to the subcommand named in `matches`.
    pub async fn execute(&self, matches: &clap::ArgMatches, settings: &Settings) -> PdoResult<()> {
        let (name, sub_matches) = matches
            .subcommand()
            .ok_or_else(|| PdoError::ConfigurationError("No subcommand specified".to_string()))?;

        let cmd = self
            .get(name)
            .ok_or_else(|| PdoError::ConfigurationError(format!("Unknown command: {name}")))?;

        tracing::debug!(command = name, "dispatching");
        cmd.handle(sub_matches, settings).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestCommand(&'static str);

    #[async_trait]
    impl ManagementCommand for TestCommand {
        fn name(&self) -> &'static str {
            self.0
        }

        fn help(&self) -> &'static str {
            "A test command"
        }

        fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
            cmd.arg(
                clap::Arg::new("verbose")
                    .long("verbose")
                    .action(clap::ArgAction::SetTrue),
            )
        }

        async fn handle(&self, _matches: &clap::ArgMatches, _settings: &Settings) -> PdoResult<()> {
            Ok(())
        }
    }

    struct FailingCommand;

    #[async_trait]
    impl ManagementCommand for FailingCommand {
        fn name(&self) -> &'static str {
            "fail"
        }

        fn help(&self) -> &'static str {
            "Always fails"
        }

        async fn handle(&self, _matches: &clap::ArgMatches, _settings: &Settings) -> PdoResult<()> {
            Err(PdoError::MissingTable)
        }
    }

    #[test]
    fn test_registry_new_is_empty() {
        let registry = CommandRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
        assert!(registry.get("sql").is_none());
    }

    #[test]
    fn test_register_replaces_and_sorts() {
        let mut registry = CommandRegistry::new();
        registry.register(Box::new(TestCommand("zebra")));
        registry.register(Box::new(TestCommand("alpha")));
        registry.register(Box::new(TestCommand("alpha")));
        assert_eq!(registry.list_commands(), vec!["alpha", "zebra"]);
        assert_eq!(registry.get("alpha").unwrap().help(), "A test command");
    }

    #[test]
    fn test_build_cli_global_settings() {
        let mut registry = CommandRegistry::new();
        registry.register(Box::new(TestCommand("sql")));

        let matches = registry
            .build_cli()
            .try_get_matches_from(["pdo-rs", "sql", "--verbose", "--settings", "pdo.toml"])
            .unwrap();
        assert_eq!(
            matches.get_one::<PathBuf>("settings"),
            Some(&PathBuf::from("pdo.toml"))
        );
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "sql");
        assert!(sub.get_flag("verbose"));
    }

    #[test]
    fn test_build_cli_requires_subcommand() {
        let mut registry = CommandRegistry::new();
        registry.register(Box::new(TestCommand("sql")));
        assert!(registry.build_cli().try_get_matches_from(["pdo-rs"]).is_err());
    }

    #[tokio::test]
    async fn test_execute_dispatches() {
        let mut registry = CommandRegistry::new();
        registry.register(Box::new(TestCommand("ok")));
        registry.register(Box::new(FailingCommand));
        let settings = Settings::default();

        let matches = registry.build_cli().try_get_matches_from(["pdo-rs", "ok"]).unwrap();
        assert!(registry.execute(&matches, &settings).await.is_ok());

        let matches = registry.build_cli().try_get_matches_from(["pdo-rs", "fail"]).unwrap();
        let err = registry.execute(&matches, &settings).await.unwrap_err();
        assert_eq!(err.code(), "missing_table");
    }
}
