//! Settings loading from configuration files and the environment.
//!
//! ## Loading Order
//!
//! 1. Start with default settings.
//! 2. Load from a TOML or JSON file (overriding defaults).
//! 3. Apply environment variable overrides (highest priority).
//!
//! ## Environment Variable Mapping
//!
//! | Env Var | Setting |
//! |---|---|
//! | `PDO_DEBUG` | `debug` |
//! | `PDO_LOG_LEVEL` | `log_level` |
//! | `PDO_DB_ENGINE` | `database.engine` |
//! | `PDO_DB_NAME` | `database.name` |
//! | `PDO_DB_HOST` | `database.host` |
//! | `PDO_DB_PORT` | `database.port` |
//! | `PDO_DB_USER` | `database.user` |
//! | `PDO_DB_PASSWORD` | `database.password` |
//! | `PDO_LEGACY_NEQ` | `compiler.legacy_neq` |
//! | `PDO_PRESERVE_CLAUSE_SPACING` | `compiler.preserve_clause_spacing` |
//!
//! ## Examples
//!
//! ```rust,no_run
//! use pdo_rs_core::settings_loader;
//!
//! let settings = settings_loader::from_toml_file_with_env("pdo.toml").unwrap();
//! ```

use std::path::Path;

use crate::error::PdoError;
use crate::settings::Settings;

/// Loads settings from a TOML string.
///
/// Keys missing from the document keep their default values.
pub fn from_toml_str(toml_str: &str) -> Result<Settings, PdoError> {
    let toml_value: toml::Value = toml::from_str(toml_str)
        .map_err(|e| PdoError::ConfigurationError(format!("Failed to parse TOML: {e}")))?;

    overlay_defaults(toml_to_json(toml_value), "TOML")
}

/// Loads settings from a TOML file.
pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Settings, PdoError> {
    from_toml_str(&read_config(path.as_ref(), "TOML")?)
}

/// Loads settings from a TOML file and then applies environment variable overrides.
pub fn from_toml_file_with_env(path: impl AsRef<Path>) -> Result<Settings, PdoError> {
    let mut settings = from_toml_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from a JSON string.
pub fn from_json_str(json_str: &str) -> Result<Settings, PdoError> {
    let json_value: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|e| PdoError::ConfigurationError(format!("Failed to parse JSON: {e}")))?;

    overlay_defaults(json_value, "JSON")
}

/// Loads settings from a JSON file.
pub fn from_json_file(path: impl AsRef<Path>) -> Result<Settings, PdoError> {
    from_json_str(&read_config(path.as_ref(), "JSON")?)
}

/// Loads settings from a JSON file and then applies environment variable overrides.
pub fn from_json_file_with_env(path: impl AsRef<Path>) -> Result<Settings, PdoError> {
    let mut settings = from_json_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from a file, picking the format from its extension
/// (`.json` is JSON, anything else is TOML), then applies environment
/// overrides.
pub fn from_path_with_env(path: impl AsRef<Path>) -> Result<Settings, PdoError> {
    let path = path.as_ref();
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        from_json_file_with_env(path)
    } else {
        from_toml_file_with_env(path)
    }
}

/// Loads settings from just environment variables (starting from defaults).
pub fn from_env() -> Settings {
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings);
    settings
}

/// Applies environment variable overrides to a settings struct.
///
/// Boolean variables accept `"true"`, `"1"` and `"yes"` (any case) as true;
/// anything else is false. An unparsable `PDO_DB_PORT` is ignored.
pub fn apply_env_overrides(settings: &mut Settings) {
    if let Ok(val) = std::env::var("PDO_DEBUG") {
        settings.debug = parse_flag(&val);
    }

    if let Ok(val) = std::env::var("PDO_LOG_LEVEL") {
        settings.log_level = val;
    }

    if let Ok(val) = std::env::var("PDO_DB_ENGINE") {
        settings.database.engine = val;
    }

    if let Ok(val) = std::env::var("PDO_DB_NAME") {
        settings.database.name = val;
    }

    if let Ok(val) = std::env::var("PDO_DB_HOST") {
        settings.database.host = val;
    }

    if let Ok(val) = std::env::var("PDO_DB_PORT") {
        match val.parse::<u16>() {
            Ok(port) => settings.database.port = port,
            Err(_) => tracing::warn!(value = %val, "ignoring invalid PDO_DB_PORT"),
        }
    }

    if let Ok(val) = std::env::var("PDO_DB_USER") {
        settings.database.user = val;
    }

    if let Ok(val) = std::env::var("PDO_DB_PASSWORD") {
        settings.database.password = val;
    }

    if let Ok(val) = std::env::var("PDO_LEGACY_NEQ") {
        settings.compiler.legacy_neq = parse_flag(&val);
    }

    if let Ok(val) = std::env::var("PDO_PRESERVE_CLAUSE_SPACING") {
        settings.compiler.preserve_clause_spacing = parse_flag(&val);
    }
}

// ============================================================
// Helpers
// ============================================================

fn parse_flag(val: &str) -> bool {
    matches!(val.to_lowercase().as_str(), "true" | "1" | "yes")
}

fn read_config(path: &Path, format: &str) -> Result<String, PdoError> {
    std::fs::read_to_string(path).map_err(|e| {
        PdoError::ConfigurationError(format!(
            "Failed to read {format} file '{}': {e}",
            path.display()
        ))
    })
}

/// Deep-merges `value` over the serialized defaults and deserializes the result.
fn overlay_defaults(value: serde_json::Value, format: &str) -> Result<Settings, PdoError> {
    let default_json = serde_json::to_value(Settings::default()).map_err(|e| {
        PdoError::ConfigurationError(format!("Failed to serialize default settings: {e}"))
    })?;

    let merged = merge_json(default_json, value);
    serde_json::from_value(merged).map_err(|e| {
        PdoError::ConfigurationError(format!("Failed to deserialize settings from {format}: {e}"))
    })
}

/// Converts a TOML value to a `serde_json::Value`.
fn toml_to_json(value: toml::Value) -> serde_json::Value {
    match value {
        toml::Value::String(s) => serde_json::Value::String(s),
        toml::Value::Integer(i) => serde_json::json!(i),
        toml::Value::Float(f) => serde_json::json!(f),
        toml::Value::Boolean(b) => serde_json::Value::Bool(b),
        toml::Value::Datetime(dt) => serde_json::Value::String(dt.to_string()),
        toml::Value::Array(arr) => {
            serde_json::Value::Array(arr.into_iter().map(toml_to_json).collect())
        }
        toml::Value::Table(table) => serde_json::Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}

/// Deep-merges two JSON values. The `override_val` takes precedence.
fn merge_json(base: serde_json::Value, override_val: serde_json::Value) -> serde_json::Value {
    match (base, override_val) {
        (serde_json::Value::Object(mut base_map), serde_json::Value::Object(override_map)) => {
            for (key, override_v) in override_map {
                let merged = match base_map.remove(&key) {
                    Some(base_v) => merge_json(base_v, override_v),
                    None => override_v,
                };
                base_map.insert(key, merged);
            }
            serde_json::Value::Object(base_map)
        }
        (_, override_val) => override_val,
    }
}
