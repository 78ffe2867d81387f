pub mod cli;
pub mod code_view;
pub mod command;
pub mod commands;
pub mod config;
pub mod events;
pub mod host;
pub mod memory;
pub mod modal;
pub mod plugin;
pub mod toolbar;
#[cfg(feature = "editor")]
pub mod ui;
pub mod validation;

pub use command::{CommandPhase, ScriptCommand, SCRIPT_COMMAND_ID};
pub use commands::{CommandRegistry, RunOptions};
pub use config::PluginOptions;
pub use plugin::install;
pub use validation::{ScriptCallbacks, ScriptValidator, ValidationError};
