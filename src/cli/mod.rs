//! CLI layer: argument parsing, operator console and command dispatch

pub mod args;
pub mod commands;
pub mod console;
pub mod error;
pub mod menu;
pub mod output;
pub mod timing;

pub use args::{Cli, Commands, ConfigCommands};
pub use commands::execute_command;
pub use console::Console;
pub use error::{CliError, CliResult};
