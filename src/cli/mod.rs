//! Command line interface for unity_builder.
//!
//! Parses arguments, runs the build pipeline and turns its outcome into a
//! process exit code.

mod args;
pub mod commands;
mod output;

pub use args::{Args, RuntimeConfig};
pub use commands::execute_command;
pub use output::OutputManager;

use crate::error::Result;

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    execute_command(args).await
}
