// CLI module for tagwright
//
// Argument parsing, output formatting and the subcommands of the binary.
// Only the binary compiles this module; the library stays free of clap.

pub mod commands;
pub mod config;
pub mod output;

pub use config::{Commands, Config, OutputFormat};
pub use output::OutputFormatter;
