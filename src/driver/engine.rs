//! The engine build pipeline, seen from the driver.
//!
//! The driver hands the engine a [`BuildPlayerOptions`] document and waits
//! for a [`BuildSummary`]. How the engine builds is not our concern.

use super::android::AndroidSettings;
use crate::env::Environment;
use crate::error::DriverError;
use crate::platform::TargetPlatform;
use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};
use std::io::{ErrorKind, Write};
use std::process::{Command, Stdio};
use std::time::Duration;

/// Variable naming the engine command, split on whitespace
pub const ENGINE_COMMAND_VARIABLE: &str = "UNITY_BUILD_ENGINE";

/// Everything the engine needs for one player build
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildPlayerOptions {
    /// Enabled scenes in build order
    pub scenes: Vec<String>,
    /// Output location
    pub location_path_name: String,
    /// Build target
    pub target: TargetPlatform,
    /// Android player settings, only for Android builds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub android: Option<AndroidSettings>,
}

/// Outcome reported by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildResult {
    /// Build result could not be determined
    Unknown,
    /// Build completed
    Succeeded,
    /// Build failed
    Failed,
    /// Build was cancelled
    Cancelled,
}

impl BuildResult {
    /// Process exit code for this result
    pub fn exit_code(self) -> i32 {
        match self {
            BuildResult::Succeeded => 0,
            BuildResult::Failed => 101,
            BuildResult::Cancelled => 102,
            BuildResult::Unknown => 103,
        }
    }
}

/// Summary of a finished build
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildSummary {
    /// Overall result
    pub result: BuildResult,
    /// Wall time in seconds
    #[serde(default)]
    pub total_time_seconds: f64,
    /// Number of warnings
    #[serde(default)]
    pub total_warnings: u32,
    /// Number of errors
    #[serde(default)]
    pub total_errors: u32,
    /// Output size in bytes
    #[serde(default)]
    pub total_size: u64,
}

impl BuildSummary {
    /// Summary with no metrics for `result`
    pub fn empty(result: BuildResult) -> Self {
        Self {
            result,
            total_time_seconds: 0.0,
            total_warnings: 0,
            total_errors: 0,
            total_size: 0,
        }
    }

    /// Wall time of the build
    pub fn total_time(&self) -> Duration {
        Duration::try_from_secs_f64(self.total_time_seconds).unwrap_or_default()
    }
}

/// Black-box engine build pipeline
pub trait Engine {
    /// Build a player. Blocks until the engine is done.
    fn build_player(&mut self, options: &BuildPlayerOptions) -> Result<BuildSummary, DriverError>;
}

/// Engine reached through an external command.
///
/// The command receives the options as JSON on stdin and prints the summary
/// as JSON on stdout. Its stderr is passed through.
#[derive(Debug, Clone, Default)]
pub struct ProcessEngine {
    command: Option<Vec<String>>,
}

impl ProcessEngine {
    /// Engine running `program` with `args`
    pub fn new(program: impl Into<String>, args: impl IntoIterator<Item = String>) -> Self {
        let mut command = vec![program.into()];
        command.extend(args);
        Self {
            command: Some(command),
        }
    }

    /// Engine named by [`ENGINE_COMMAND_VARIABLE`]; unconfigured when unset.
    pub fn from_env(env: &dyn Environment) -> Self {
        let command: Option<Vec<String>> = env
            .non_empty(ENGINE_COMMAND_VARIABLE)
            .map(|value| value.split_whitespace().map(str::to_string).collect())
            .filter(|command: &Vec<String>| !command.is_empty());
        Self { command }
    }

    fn invoke(command: &[String], options: &BuildPlayerOptions) -> anyhow::Result<BuildSummary> {
        let (program, args) = command
            .split_first()
            .context("engine command is empty")?;
        let request = serde_json::to_vec(options).context("failed to encode build options")?;

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .with_context(|| format!("failed to start engine '{}'", program))?;

        if let Some(mut stdin) = child.stdin.take() {
            match stdin.write_all(&request) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::BrokenPipe => {
                    log::debug!("Engine closed stdin before reading the build options");
                }
                Err(e) => return Err(e).context("failed to send build options to the engine"),
            }
        }

        let output = child
            .wait_with_output()
            .context("failed to wait for the engine")?;

        match serde_json::from_slice::<BuildSummary>(&output.stdout) {
            Ok(summary) => Ok(summary),
            Err(_) if !output.status.success() => {
                log::warn!(
                    "Engine exited with {} without a build summary",
                    output.status
                );
                Ok(BuildSummary::empty(BuildResult::Failed))
            }
            Err(e) => bail!("engine printed an invalid build summary: {}", e),
        }
    }
}

impl Engine for ProcessEngine {
    fn build_player(&mut self, options: &BuildPlayerOptions) -> Result<BuildSummary, DriverError> {
        let command = self
            .command
            .as_deref()
            .ok_or_else(|| DriverError::EngineNotConfigured {
                variable: ENGINE_COMMAND_VARIABLE.to_string(),
            })?;

        Self::invoke(command, options).map_err(|e| DriverError::EngineFailed {
            reason: format!("{:#}", e),
        })
    }
}
