//! The `check` command: validate settings, and optionally the connection.

use async_trait::async_trait;
use pdo_rs_core::{PdoError, PdoResult, Settings};
use pdo_rs_db::DbExecutor;
use pdo_rs_db_backends::{DatabaseBackend, DatabaseConfig, Engine};

use crate::command::ManagementCommand;

/// Validates the loaded settings.
pub struct CheckCommand;

/// One finding from [`run_checks`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckMessage {
    pub level: CheckLevel,
    pub msg: String,
    pub hint: Option<String>,
    /// A stable identifier such as `"database.E001"`.
    pub id: &'static str,
}

/// Severity of a [`CheckMessage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CheckLevel {
    Info,
    Warning,
    Error,
}

impl std::fmt::Display for CheckLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARNING"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

const fn engine_compiled(engine: Engine) -> bool {
    match engine {
        Engine::Sqlite => cfg!(feature = "sqlite"),
        Engine::MySql => cfg!(feature = "mysql"),
    }
}

/// Checks `settings` without touching the network.
pub fn run_checks(settings: &Settings) -> Vec<CheckMessage> {
    let mut messages = Vec::new();
    let db = &settings.database;

    match DatabaseConfig::from_settings(db) {
        Err(err) => messages.push(CheckMessage {
            level: CheckLevel::Error,
            msg: err.to_string(),
            hint: Some("Fix the [database] section or the PDO_DB_* variables".to_string()),
            id: "database.E001",
        }),
        Ok(config) => {
            if !engine_compiled(config.engine) {
                messages.push(CheckMessage {
                    level: CheckLevel::Error,
                    msg: format!("Engine '{}' is not compiled into this binary", config.engine),
                    hint: Some(format!("Rebuild with the `{}` feature", config.engine)),
                    id: "database.E002",
                });
            }
            if config.engine == Engine::MySql && config.user.is_none() {
                messages.push(CheckMessage {
                    level: CheckLevel::Warning,
                    msg: "No MySQL user configured".to_string(),
                    hint: Some("Set database.user or PDO_DB_USER".to_string()),
                    id: "database.W001",
                });
            }
            if config.engine == Engine::Sqlite && config.name == ":memory:" {
                messages.push(CheckMessage {
                    level: CheckLevel::Info,
                    msg: "SQLite database is in memory and starts empty".to_string(),
                    hint: None,
                    id: "database.I001",
                });
            }
        }
    }

    if settings.compiler.legacy_neq {
        messages.push(CheckMessage {
            level: CheckLevel::Warning,
            msg: "legacy_neq is on: NEQ conditions compile to '='".to_string(),
            hint: Some("Turn it off unless a caller depends on the old output".to_string()),
            id: "compiler.W001",
        });
    }

    messages
}

#[async_trait]
impl ManagementCommand for CheckCommand {
    fn name(&self) -> &'static str {
        "check"
    }

    fn help(&self) -> &'static str {
        "Validate settings"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(
            clap::Arg::new("connect")
                .long("connect")
                .action(clap::ArgAction::SetTrue)
                .help("Also open a connection and run SELECT 1"),
        )
    }

    async fn handle(&self, matches: &clap::ArgMatches, settings: &Settings) -> PdoResult<()> {
        let messages = run_checks(settings);
        let errors = messages
            .iter()
            .filter(|m| m.level == CheckLevel::Error)
            .count();

        for msg in &messages {
            let hint = msg
                .hint
                .as_ref()
                .map_or(String::new(), |h| format!("\n\tHINT: {h}"));
            println!("{} ({}): {}{hint}", msg.level, msg.id, msg.msg);
        }

        if errors > 0 {
            return Err(PdoError::ConfigurationError(format!(
                "Settings check found {errors} error(s)"
            )));
        }

        if matches.get_flag("connect") {
            let db = pdo_rs_db_backends::connect(&settings.database)?;
            db.query("SELECT 1", &[]).await?;
            println!("Connected to {}", db.vendor());
        }

        println!("Settings check identified {} issue(s)", messages.len());
        Ok(())
    }
}
