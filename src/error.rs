//! Error types for unity_builder operations.
//!
//! This module defines all error types with actionable error messages and recovery suggestions.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for unity_builder operations
pub type Result<T> = std::result::Result<T, BuilderError>;

/// Exit code used for fatal errors that carry no more specific status
pub const GENERIC_FAILURE_EXIT_CODE: i32 = 1;

/// Main error type for all unity_builder operations
#[derive(Error, Debug)]
pub enum BuilderError {
    /// Container build/run errors
    #[error("Docker error: {0}")]
    Docker(#[from] DockerError),

    /// In-container driver errors
    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),

    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while building or running the builder container
#[derive(Error, Debug)]
pub enum DockerError {
    /// Docker binary missing or daemon not responding
    #[error("Docker is not available: {reason}")]
    Unavailable {
        /// Reason for the error
        reason: String,
    },

    /// Subprocess could not be started
    #[error("Failed to launch '{command}': {source}")]
    LaunchFailed {
        /// Command that failed to start
        command: String,
        /// Underlying spawn error
        #[source]
        source: std::io::Error,
    },

    /// `docker build` exited unsuccessfully
    #[error("Image build for '{tag}' failed with exit code {exit_code}")]
    BuildFailed {
        /// Tag that was being built
        tag: String,
        /// Exit code of docker build
        exit_code: i32,
    },

    /// `docker run` exited unsuccessfully
    #[error("Container '{container}' exited with code {exit_code}")]
    RunFailed {
        /// Container name
        container: String,
        /// Exit code of the container process, unaltered
        exit_code: i32,
    },

    /// Dockerfile missing from the build context
    #[error("Dockerfile not found at {path}")]
    MissingDockerfile {
        /// Path where the Dockerfile was expected
        path: PathBuf,
    },
}

/// Configuration errors detected by the in-container driver.
///
/// Each variant terminates the driver with its own exit code.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DriverError {
    /// `-projectPath` not supplied
    #[error("Missing argument -projectPath")]
    MissingProjectPath,

    /// `-buildTarget` not supplied
    #[error("Missing argument -buildTarget")]
    MissingBuildTarget,

    /// `-buildTarget` is not a known target platform
    #[error("Invalid argument -buildTarget, \"{value}\" is not a known build target")]
    UnknownBuildTarget {
        /// Value that was supplied
        value: String,
    },

    /// `-customBuildPath` not supplied
    #[error("Missing argument -customBuildPath")]
    MissingCustomBuildPath,

    /// The same flag appeared more than once
    #[error("Duplicate argument -{flag}")]
    DuplicateArgument {
        /// Flag name without its marker
        flag: String,
    },

    /// No engine command configured
    #[error("No build engine configured, set {variable}")]
    EngineNotConfigured {
        /// Environment variable that names the engine command
        variable: String,
    },

    /// Engine process could not be driven
    #[error("Build engine failed: {reason}")]
    EngineFailed {
        /// Reason for the error
        reason: String,
    },
}

impl DriverError {
    /// Process exit code for this configuration error
    pub fn exit_code(&self) -> i32 {
        match self {
            DriverError::MissingProjectPath => 110,
            DriverError::MissingBuildTarget => 120,
            DriverError::UnknownBuildTarget { .. } => 121,
            DriverError::MissingCustomBuildPath => 130,
            DriverError::DuplicateArgument { .. } => 140,
            DriverError::EngineNotConfigured { .. } | DriverError::EngineFailed { .. } => {
                GENERIC_FAILURE_EXIT_CODE
            }
        }
    }
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },
}

impl BuilderError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            BuilderError::Docker(DockerError::Unavailable { .. }) => vec![
                "Install Docker: https://docs.docker.com/get-docker/".to_string(),
                "Ensure the Docker daemon is running: docker info".to_string(),
            ],
            BuilderError::Docker(DockerError::MissingDockerfile { .. }) => vec![
                "Point --action-path at the directory holding the builder Dockerfile".to_string(),
                "Or pass the Dockerfile explicitly with --dockerfile".to_string(),
            ],
            BuilderError::Docker(DockerError::BuildFailed { .. }) => vec![
                "Check that the base image exists for this Unity version and platform".to_string(),
                "Verify --repository and --docker-image-name".to_string(),
            ],
            BuilderError::Docker(DockerError::RunFailed { exit_code, .. }) => {
                match exit_code {
                    110 | 120 | 121 | 130 | 140 => vec![
                        "The build driver rejected its arguments, check targetPlatform and \
                         projectPath"
                            .to_string(),
                    ],
                    101..=103 => vec!["Inspect the Unity build log above for errors".to_string()],
                    _ => vec!["Check the container output above for specific details".to_string()],
                }
            }
            BuilderError::Cli(CliError::InvalidArguments { .. }) => {
                vec!["Run with --help to see the accepted options".to_string()]
            }
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }

    /// Process exit code for this error.
    ///
    /// Container failures carry the container's own status so engine and
    /// driver codes reach the invoking process unchanged.
    pub fn exit_code(&self) -> i32 {
        match self {
            BuilderError::Docker(DockerError::RunFailed { exit_code, .. }) => *exit_code,
            BuilderError::Driver(e) => e.exit_code(),
            _ => GENERIC_FAILURE_EXIT_CODE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn driver_errors_map_to_documented_codes() {
        assert_eq!(DriverError::MissingProjectPath.exit_code(), 110);
        assert_eq!(DriverError::MissingBuildTarget.exit_code(), 120);
        assert_eq!(
            DriverError::UnknownBuildTarget {
                value: "Nintendo64".to_string()
            }
            .exit_code(),
            121
        );
        assert_eq!(DriverError::MissingCustomBuildPath.exit_code(), 130);
    }

    #[test]
    fn run_failure_keeps_container_exit_code() {
        let err = BuilderError::Docker(DockerError::RunFailed {
            container: "unity-builder-test".to_string(),
            exit_code: 101,
        });
        assert_eq!(err.exit_code(), 101);

        let err = BuilderError::Docker(DockerError::BuildFailed {
            tag: "unity-builder:2019.3.0f1".to_string(),
            exit_code: 2,
        });
        assert_eq!(err.exit_code(), GENERIC_FAILURE_EXIT_CODE);
    }
}
