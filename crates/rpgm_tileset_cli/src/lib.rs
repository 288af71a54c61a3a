//! The `rpgm-expand` command-line tool
//!
//! Wraps `rpgm_tileset_export` with argument parsing, remembered
//! preferences and interactive prompts.

pub mod cli;
pub mod preferences;
pub mod prompt;

pub use cli::{init_logging, run, run_with_preferences, Cli, CliError};
pub use preferences::{Preferences, PreferencesError};
#[cfg(all(feature = "native", not(target_arch = "wasm32")))]
pub use prompt::DialogDecisions;
pub use prompt::TerminalDecisions;
