//! Command execution coordinating the build pipeline.

mod build;

use crate::cli::{Args, RuntimeConfig};
use crate::error::{BuilderError, Result};

pub use build::execute_build;

/// Execute the build described by `args` and return the process exit code.
///
/// Pipeline failures are reported here; a failed container run yields the
/// container's own exit code.
pub async fn execute_command(args: Args) -> Result<i32> {
    if let Err(validation_error) = args.validate() {
        let output = super::OutputManager::new(false);
        output.error(&validation_error.to_string());
        return Ok(BuilderError::from(validation_error).exit_code());
    }

    let config = RuntimeConfig::from(&args);

    match execute_build(&args, &config).await {
        Ok(exit_code) => Ok(exit_code),
        Err(e) => {
            config.error_println(&format!("Build failed: {}", e));

            let suggestions = e.recovery_suggestions();
            if !suggestions.is_empty() {
                config.println("\n💡 Recovery suggestions:");
                for suggestion in suggestions {
                    config.println(&format!("  • {}", suggestion));
                }
            }

            Ok(e.exit_code())
        }
    }
}
