//! Command line argument parsing for the build orchestrator.
//!
//! Every build input can be given as a flag or, when running as a workflow
//! step, as the host's `INPUT_<NAME>` variable. Flags win over variables.

use crate::env::ProcessEnv;
use crate::error::CliError;
use crate::input::{ActionInputs, InputSource};
use clap::Parser;
use std::path::PathBuf;

/// Build a Unity project inside a Docker container
#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "unity_builder",
    version,
    about = "Build a Unity project inside a Docker container",
    long_about = "Resolve build inputs, build the builder image on top of the Unity base image,
and run the build in a container. The container's exit code is returned unchanged.

Usage:
  unity_builder --target-platform Android --unity-version 2019.3.0f1
  INPUT_TARGETPLATFORM=WebGL unity_builder"
)]
pub struct Args {
    /// Unity version of the base image
    #[arg(long, value_name = "VERSION")]
    pub unity_version: Option<String>,

    /// Build target, e.g. StandaloneWindows64, Android, iOS, WebGL
    #[arg(long, value_name = "PLATFORM")]
    pub target_platform: Option<String>,

    /// Path to the Unity project
    #[arg(long, value_name = "PATH")]
    pub project_path: Option<String>,

    /// Name of the produced build
    #[arg(long, value_name = "NAME")]
    pub build_name: Option<String>,

    /// Root directory for build outputs
    #[arg(long, value_name = "PATH")]
    pub builds_path: Option<String>,

    /// Custom static build method to execute
    #[arg(long, value_name = "METHOD")]
    pub build_method: Option<String>,

    /// Extra parameters forwarded to Unity
    #[arg(long, value_name = "PARAMS", allow_hyphen_values = true)]
    pub custom_parameters: Option<String>,

    /// Owner of the Unity base image
    #[arg(long, value_name = "OWNER")]
    pub repository: Option<String>,

    /// Name of the Unity base image
    #[arg(long, value_name = "NAME")]
    pub docker_image_name: Option<String>,

    /// Directory holding the builder Dockerfile (docker build context)
    #[arg(long, env = "GITHUB_ACTION_PATH", default_value = ".", value_name = "DIR")]
    pub action_path: PathBuf,

    /// Dockerfile to build, defaults to <ACTION_PATH>/Dockerfile
    #[arg(long, value_name = "FILE")]
    pub dockerfile: Option<PathBuf>,

    /// Host directory mounted as the container workspace, defaults to the current directory
    #[arg(long, env = "GITHUB_WORKSPACE", value_name = "DIR")]
    pub workspace: Option<PathBuf>,

    /// Discard docker build and run output
    #[arg(long)]
    pub silent: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Value given on the command line for input `name`
    pub fn cli_value(&self, name: &str) -> Option<String> {
        let value = match name {
            "unityVersion" => &self.unity_version,
            "targetPlatform" => &self.target_platform,
            "projectPath" => &self.project_path,
            "buildName" => &self.build_name,
            "buildsPath" => &self.builds_path,
            "buildMethod" => &self.build_method,
            "customParameters" => &self.custom_parameters,
            "repository" => &self.repository,
            "dockerImageName" => &self.docker_image_name,
            _ => return None,
        };
        value.clone()
    }

    /// Dockerfile to build
    pub fn dockerfile_path(&self) -> PathBuf {
        self.dockerfile
            .clone()
            .unwrap_or_else(|| self.action_path.join("Dockerfile"))
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), CliError> {
        if let Some(workspace) = &self.workspace
            && workspace.as_os_str().is_empty()
        {
            return Err(CliError::InvalidArguments {
                reason: "Workspace path must not be empty".to_string(),
            });
        }

        if let Some(dockerfile) = &self.dockerfile
            && dockerfile.as_os_str().is_empty()
        {
            return Err(CliError::InvalidArguments {
                reason: "Dockerfile path must not be empty".to_string(),
            });
        }

        Ok(())
    }
}

impl InputSource for Args {
    fn get(&self, name: &str) -> Option<String> {
        self.cli_value(name)
            .or_else(|| ActionInputs::new(ProcessEnv).get(name))
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Output manager for colored terminal output
    output: super::OutputManager,
}

impl RuntimeConfig {
    /// Create runtime configuration
    pub fn new() -> Self {
        Self {
            output: super::OutputManager::new(false),
        }
    }

    /// Print message
    pub fn println(&self, message: &str) {
        let _ = self.output.println(message);
    }

    /// Print error message (always shown)
    pub fn error_println(&self, message: &str) {
        self.output.error(message);
    }

    /// Print warning message
    pub fn warn(&self, message: &str) {
        let _ = self.output.warn(message);
    }

    /// Print success message
    pub fn success(&self, message: &str) {
        let _ = self.output.success(message);
    }

    /// Print progress message
    pub fn progress(&self, message: &str) {
        let _ = self.output.progress(message);
    }

    /// Print section header
    pub fn section(&self, title: &str) {
        let _ = self.output.section(title);
    }

    /// Print indented text
    pub fn indent(&self, message: &str) {
        let _ = self.output.indent(message);
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&Args> for RuntimeConfig {
    fn from(_args: &Args) -> Self {
        Self::new()
    }
}
