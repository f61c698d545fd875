//! Docker integration for containerized Unity builds.
//!
//! The pipeline builds one builder image on top of a Unity base image and runs
//! it once per build. Everything the in-container driver needs reaches it
//! through the environment and volume contract in [`runner`].
//!
//! # Module Structure
//!
//! - `image` - image tags, image build, Docker availability check
//! - `runner` - container run with the fixed env/volume contract

mod image;
mod runner;

pub use image::{
    BUILDER_IMAGE_NAME, ImageBuildParameters, ImageTag, build, build_arguments, builder_tag,
    check_docker_available,
};
pub use runner::{
    ContainerRunParameters, forwarded_environment, mounted_volumes, run, run_arguments,
};

use crate::cli::RuntimeConfig;
use crate::error::{DockerError, Result};
use std::process::{ExitStatus, Stdio};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;

/// Runs `docker <args>` to completion.
///
/// With `silent` both output streams are discarded; otherwise stdout is streamed
/// line by line through the runtime output and stderr is inherited. Lines that
/// are not UTF-8 are printed lossily.
async fn execute_docker(
    args: &[String],
    silent: bool,
    runtime_config: &RuntimeConfig,
) -> Result<ExitStatus> {
    let command_line = format!("docker {}", args.first().map(String::as_str).unwrap_or(""));
    log::debug!("Executing docker {}", args.join(" "));

    let (stdout, stderr) = if silent {
        (Stdio::null(), Stdio::null())
    } else {
        (Stdio::piped(), Stdio::inherit())
    };

    let mut child = Command::new("docker")
        .args(args)
        .stdout(stdout)
        .stderr(stderr)
        .spawn()
        .map_err(|source| DockerError::LaunchFailed {
            command: command_line.clone(),
            source,
        })?;

    if let Some(stdout) = child.stdout.take() {
        let mut reader = BufReader::new(stdout);
        let mut line = Vec::new();

        loop {
            line.clear();
            match reader.read_until(b'\n', &mut line).await {
                Ok(0) => break,
                Ok(_) => {
                    let text = String::from_utf8_lossy(&line);
                    runtime_config.indent(text.trim_end_matches(['\r', '\n']));
                }
                Err(e) => {
                    // Keep the pipe open until docker exits so it is not killed by SIGPIPE
                    log::debug!("Stopped streaming docker output: {}", e);
                    let _ = tokio::io::copy(&mut reader, &mut tokio::io::sink()).await;
                    break;
                }
            }
        }
    }

    let status = child
        .wait()
        .await
        .map_err(|source| DockerError::LaunchFailed {
            command: command_line,
            source,
        })?;

    Ok(status)
}

/// Exit code of a finished subprocess; `-1` when it was killed by a signal.
fn exit_code(status: &ExitStatus) -> i32 {
    status.code().unwrap_or(-1)
}
