//! # pdo-rs-core
//!
//! Settings, logging, and error types shared by every pdo-rs crate.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`settings`] - Connection parameters and compiler switches
//! - [`settings_loader`] - TOML/JSON/environment loading
//! - [`logging`] - Tracing-based logging integration

pub mod error;
pub mod logging;
pub mod settings;
pub mod settings_loader;

// Re-export the most commonly used types at the crate root.
pub use error::{PdoError, PdoResult};
pub use settings::{CompilerSettings, DatabaseSettings, Settings};
