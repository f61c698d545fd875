//! unity_builder - build Unity projects inside a Docker container.
//!
//! Exits with the container's exit code, so Unity build results and driver
//! configuration errors reach the calling workflow unchanged.

use std::process;
use unity_builder::cli;
use unity_builder::cli::OutputManager;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match cli::run().await {
        Ok(exit_code) => {
            process::exit(exit_code);
        }
        Err(e) => {
            // Never quiet for fatal errors
            let output = OutputManager::new(false);
            output.error(&format!("Fatal error: {e}"));

            let suggestions = e.recovery_suggestions();
            if !suggestions.is_empty() {
                let _ = output.println("\n💡 Recovery suggestions:");
                for suggestion in suggestions {
                    let _ = output.indent(&suggestion);
                }
            }

            process::exit(e.exit_code());
        }
    }
}
