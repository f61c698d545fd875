//! Docker image naming and building for Unity builds.
//!
//! Base images are published per Unity version and builder flavour. The
//! builder image is layered on top of the matching base image.

use super::{execute_docker, exit_code};
use crate::cli::RuntimeConfig;
use crate::error::{DockerError, Result};
use crate::input::LEGACY_REPOSITORY;
use crate::platform::TargetPlatform;
use std::fmt;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

/// Name of the builder image produced by [`build`]
pub const BUILDER_IMAGE_NAME: &str = "unity-builder";

/// Timeout for Docker info check (5 seconds)
/// Quick daemon availability check shouldn't take long
pub const DOCKER_INFO_TIMEOUT: Duration = Duration::from_secs(5);

/// Reference to a Unity image: `{repository}/{name}:{version}-{flavour}`.
///
/// Equal fields always render the same reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageTag {
    /// Image owner, empty for un-namespaced images
    pub repository: String,
    /// Image name
    pub name: String,
    /// Unity version
    pub version: String,
    /// Target platform identifier
    pub platform: String,
}

impl ImageTag {
    /// Image descriptor from its parts
    pub fn new(
        repository: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
        platform: impl Into<String>,
    ) -> Self {
        Self {
            repository: repository.into(),
            name: name.into(),
            version: version.into(),
            platform: platform.into(),
        }
    }

    /// `{repository}/{name}`, without the leading slash for bare images
    pub fn image(&self) -> String {
        format!("{}/{}", self.repository, self.name)
            .trim_start_matches('/')
            .to_string()
    }

    /// `{version}-{flavour}`, without trailing dashes when there is no flavour
    pub fn tag(&self) -> String {
        format!("{}-{}", self.version, builder_flavour(&self.platform))
            .trim_end_matches('-')
            .to_string()
    }
}

impl fmt::Display for ImageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.image(), self.tag())
    }
}

/// Image flavour that carries the build support modules for `platform`.
///
/// Unrecognized platforms get the generic image.
pub fn builder_flavour(platform: &str) -> &'static str {
    let Ok(platform) = platform.parse::<TargetPlatform>() else {
        return "";
    };

    match platform {
        TargetPlatform::StandaloneOsx => "mac",
        TargetPlatform::StandaloneWindows
        | TargetPlatform::StandaloneWindows64
        | TargetPlatform::WsaPlayer
        | TargetPlatform::Ps4
        | TargetPlatform::XboxOne
        | TargetPlatform::Switch => "windows",
        TargetPlatform::StandaloneLinux64 | TargetPlatform::Stadia => "linux",
        TargetPlatform::Ios | TargetPlatform::TvOs => "ios",
        TargetPlatform::Android | TargetPlatform::Lumin => "android",
        TargetPlatform::WebGl => "webgl",
        TargetPlatform::NoTarget => "",
    }
}

/// Tag for the builder image derived from `base_image`.
///
/// Custom repositories get a namespaced tag; the legacy repository gets a bare one.
pub fn builder_tag(base_image: &ImageTag) -> ImageTag {
    let repository = if base_image.repository != LEGACY_REPOSITORY {
        base_image.repository.clone()
    } else {
        String::new()
    };

    ImageTag::new(
        repository,
        BUILDER_IMAGE_NAME,
        base_image.version.clone(),
        base_image.platform.clone(),
    )
}

/// Inputs for one `docker build`
#[derive(Debug, Clone)]
pub struct ImageBuildParameters {
    /// Build context directory
    pub context: PathBuf,
    /// Dockerfile to build
    pub dockerfile: PathBuf,
    /// Unity base image passed as the `IMAGE` build argument
    pub base_image: ImageTag,
    /// Discard docker output
    pub silent: bool,
}

/// Arguments for `docker build` producing `tag`
pub fn build_arguments(parameters: &ImageBuildParameters, tag: &ImageTag) -> Vec<String> {
    vec![
        "build".to_string(),
        parameters.context.display().to_string(),
        "--file".to_string(),
        parameters.dockerfile.display().to_string(),
        "--build-arg".to_string(),
        format!("IMAGE={}", parameters.base_image),
        "--tag".to_string(),
        tag.to_string(),
    ]
}

/// Builds the builder image and returns its tag.
///
/// # Returns
///
/// * `Ok(ImageTag)` - Image built; the tag is ready for [`super::run`]
/// * `Err` - Dockerfile missing, docker could not start, or the build failed
pub async fn build(
    parameters: &ImageBuildParameters,
    runtime_config: &RuntimeConfig,
) -> Result<ImageTag> {
    if !parameters.dockerfile.is_file() {
        return Err(DockerError::MissingDockerfile {
            path: parameters.dockerfile.clone(),
        }
        .into());
    }

    let tag = builder_tag(&parameters.base_image);
    runtime_config.progress(&format!(
        "Building {} on top of {}",
        tag, parameters.base_image
    ));

    let args = build_arguments(parameters, &tag);
    let status = execute_docker(&args, parameters.silent, runtime_config).await?;

    if !status.success() {
        return Err(DockerError::BuildFailed {
            tag: tag.to_string(),
            exit_code: exit_code(&status),
        }
        .into());
    }

    runtime_config.success(&format!("Built image {}", tag));
    Ok(tag)
}

/// Checks if Docker is installed and the daemon is running.
///
/// # Returns
///
/// * `Ok(())` - Docker is available
/// * `Err` - Docker is not installed or daemon is not running
pub async fn check_docker_available() -> Result<()> {
    let docker = which::which("docker").map_err(|e| DockerError::Unavailable {
        reason: format!("docker executable not found on PATH: {}", e),
    })?;
    log::debug!("Using docker at {}", docker.display());

    let status_result = timeout(
        DOCKER_INFO_TIMEOUT,
        Command::new(&docker)
            .arg("info")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status(),
    )
    .await;

    match status_result {
        Err(_) => Err(DockerError::Unavailable {
            reason: format!(
                "Docker daemon check timed out after {} seconds",
                DOCKER_INFO_TIMEOUT.as_secs()
            ),
        }
        .into()),
        Ok(Ok(status)) if status.success() => Ok(()),
        Ok(Ok(status)) => Err(DockerError::Unavailable {
            reason: format!(
                "Docker daemon is not responding (exit code: {})",
                exit_code(&status)
            ),
        }
        .into()),
        Ok(Err(source)) => Err(DockerError::LaunchFailed {
            command: "docker info".to_string(),
            source,
        }
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_includes_platform_flavour() {
        let tag = ImageTag::new("gableroux", "unity3d", "2019.3.0f1", "Android");
        assert_eq!(tag.to_string(), "gableroux/unity3d:2019.3.0f1-android");

        let tag = ImageTag::new("gableroux", "unity3d", "2019.3.0f1", "StandaloneWindows64");
        assert_eq!(tag.to_string(), "gableroux/unity3d:2019.3.0f1-windows");
    }

    #[test]
    fn generic_flavour_drops_trailing_dash() {
        let tag = ImageTag::new("gableroux", "unity3d", "2019.3.0f1", "NotARealPlatform");
        assert_eq!(tag.tag(), "2019.3.0f1");
    }

    #[test]
    fn equal_descriptors_render_identical_tags() {
        let a = ImageTag::new("acme", "unity", "2020.1.0f1", "WebGL");
        let b = ImageTag::new("acme", "unity", "2020.1.0f1", "WebGL");
        assert_eq!(a.to_string(), b.to_string());
        assert_eq!(builder_tag(&a).to_string(), builder_tag(&b).to_string());
    }

    #[test]
    fn legacy_repository_builds_bare_tag() {
        let base = ImageTag::new("gableroux", "unity3d", "2019.3.0f1", "iOS");
        assert_eq!(builder_tag(&base).to_string(), "unity-builder:2019.3.0f1-ios");
    }

    #[test]
    fn custom_repository_builds_namespaced_tag() {
        let base = ImageTag::new("acme", "unity-editor", "2019.3.0f1", "iOS");
        assert_eq!(
            builder_tag(&base).to_string(),
            "acme/unity-builder:2019.3.0f1-ios"
        );
    }

    #[test]
    fn build_arguments_pass_base_image_and_tag() {
        let parameters = ImageBuildParameters {
            context: PathBuf::from("action"),
            dockerfile: PathBuf::from("action/Dockerfile"),
            base_image: ImageTag::new("gableroux", "unity3d", "2019.3.0f1", "WebGL"),
            silent: true,
        };
        let tag = builder_tag(&parameters.base_image);

        assert_eq!(
            build_arguments(&parameters, &tag),
            vec![
                "build",
                "action",
                "--file",
                "action/Dockerfile",
                "--build-arg",
                "IMAGE=gableroux/unity3d:2019.3.0f1-webgl",
                "--tag",
                "unity-builder:2019.3.0f1-webgl",
            ]
        );
    }
}
