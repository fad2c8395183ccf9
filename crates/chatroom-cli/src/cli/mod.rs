pub mod commands;
pub mod config;
pub mod validation;

pub use commands::{execute, render, run_browse, CliCommand, ThemeChoice};
pub use config::CliConfig;
pub use validation::ValidationError;
