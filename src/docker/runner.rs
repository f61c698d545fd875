//! Container run for a resolved build.
//!
//! The forwarded environment and the mounted volumes are the only channel
//! between the host pipeline and the in-container driver.

use super::{ImageTag, execute_docker, exit_code};
use crate::build_parameters::BuildSpecification;
use crate::cli::RuntimeConfig;
use crate::error::{DockerError, Result};
use std::path::PathBuf;
use uuid::Uuid;

/// Workspace location inside the container
pub const CONTAINER_WORKSPACE: &str = "/github/workspace";

/// Home directory inside the container
pub const CONTAINER_HOME: &str = "/github/home";

/// Unity license material, passed through from the host
const LICENSE_VARIABLES: &[&str] = &[
    "UNITY_LICENSE",
    "UNITY_LICENSE_FILE",
    "UNITY_EMAIL",
    "UNITY_PASSWORD",
    "UNITY_SERIAL",
];

/// Android signing material, passed through from the host
const SIGNING_VARIABLES: &[&str] = &[
    "ANDROID_KEYSTORE_BASE64",
    "KEYSTORE_PASS",
    "KEY_ALIAS_NAME",
    "KEY_ALIAS_PASS",
    "BUNDLE_VERSION_CODE",
];

/// CI context, passed through from the host
const CI_VARIABLES: &[&str] = &[
    "GITHUB_REF",
    "GITHUB_SHA",
    "GITHUB_REPOSITORY",
    "GITHUB_ACTOR",
    "GITHUB_WORKFLOW",
    "GITHUB_HEAD_REF",
    "GITHUB_BASE_REF",
    "GITHUB_EVENT_NAME",
    "GITHUB_ACTION",
    "GITHUB_EVENT_PATH",
    "RUNNER_OS",
    "RUNNER_TOOL_CACHE",
    "RUNNER_TEMP",
    "RUNNER_WORKSPACE",
];

/// Host paths mounted into every build container, as `(host, container)`
const FIXED_VOLUMES: &[(&str, &str)] = &[
    ("/var/run/docker.sock", "/var/run/docker.sock"),
    ("/home/runner/work/_temp/_github_home", CONTAINER_HOME),
    ("/home/runner/work/_temp/_github_workflow", "/github/workflow"),
];

/// Inputs for one `docker run`
#[derive(Debug, Clone)]
pub struct ContainerRunParameters {
    /// Host directory mounted as the container workspace
    pub workspace: PathBuf,
    /// Discard container output
    pub silent: bool,
}

/// `--env` values for `spec`, in a fixed order.
///
/// Entries without `=` are passed through from the host environment.
pub fn forwarded_environment(spec: &BuildSpecification) -> Vec<String> {
    let mut env: Vec<String> = LICENSE_VARIABLES.iter().map(|v| v.to_string()).collect();

    env.extend([
        format!("UNITY_VERSION={}", spec.version()),
        format!("PROJECT_PATH={}", spec.project_path()),
        format!("BUILD_TARGET={}", spec.platform()),
        format!("BUILD_NAME={}", spec.build_name()),
        format!("BUILD_PATH={}", spec.build_path()),
        format!("BUILD_FILE={}", spec.build_file()),
        format!("BUILD_METHOD={}", spec.build_method()),
        format!("CUSTOM_PARAMETERS={}", spec.custom_parameters()),
        format!("HOME={}", CONTAINER_HOME),
    ]);

    env.push(match spec.android_app_bundle() {
        Some(app_bundle) => format!("BUILD_APP_BUNDLE={}", app_bundle),
        None => "BUILD_APP_BUNDLE".to_string(),
    });

    env.extend(SIGNING_VARIABLES.iter().map(|v| v.to_string()));
    env.extend(CI_VARIABLES.iter().map(|v| v.to_string()));
    env.push(format!("GITHUB_WORKSPACE={}", CONTAINER_WORKSPACE));
    env
}

/// `--volume` values for a run mounting `workspace`
pub fn mounted_volumes(parameters: &ContainerRunParameters) -> Vec<String> {
    let mut volumes: Vec<String> = FIXED_VOLUMES
        .iter()
        .map(|(host, container)| format!("{}:{}", host, container))
        .collect();
    volumes.push(format!(
        "{}:{}",
        parameters.workspace.display(),
        CONTAINER_WORKSPACE
    ));
    volumes
}

/// Arguments for `docker run` of `image` named `container_name`
pub fn run_arguments(
    image: &ImageTag,
    spec: &BuildSpecification,
    parameters: &ContainerRunParameters,
    container_name: &str,
) -> Vec<String> {
    let mut docker_args = vec![
        "run".to_string(),
        "--name".to_string(),
        container_name.to_string(),
        "--workdir".to_string(),
        CONTAINER_WORKSPACE.to_string(),
        "--rm".to_string(),
    ];

    for variable in forwarded_environment(spec) {
        docker_args.push("--env".to_string());
        docker_args.push(variable);
    }

    for volume in mounted_volumes(parameters) {
        docker_args.push("--volume".to_string());
        docker_args.push(volume);
    }

    docker_args.push(image.to_string());
    docker_args
}

/// Runs the build container and waits for it to exit.
///
/// # Returns
///
/// * `Ok(0)` - Container exited successfully
/// * `Err(DockerError::RunFailed)` - Container exited non-zero; carries the exit code unaltered
/// * `Err` - docker could not be started
pub async fn run(
    image: &ImageTag,
    spec: &BuildSpecification,
    parameters: &ContainerRunParameters,
    runtime_config: &RuntimeConfig,
) -> Result<i32> {
    let container_name = format!("unity-builder-{}", Uuid::new_v4());
    runtime_config.progress(&format!(
        "Running {} for {} in container {}",
        image,
        spec.platform(),
        container_name
    ));

    let args = run_arguments(image, spec, parameters, &container_name);
    let status = execute_docker(&args, parameters.silent, runtime_config).await?;
    let code = exit_code(&status);

    if !status.success() {
        return Err(DockerError::RunFailed {
            container: container_name,
            exit_code: code,
        }
        .into());
    }

    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Input;
    use std::collections::HashMap;

    fn spec(platform: &str, custom_parameters: &str) -> BuildSpecification {
        let source: HashMap<String, String> = [
            ("unityVersion", "2019.3.0f1"),
            ("targetPlatform", platform),
            ("projectPath", "game/"),
            ("buildName", "MyGame"),
            ("customParameters", custom_parameters),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        BuildSpecification::resolve(&Input::from_source(&source))
    }

    fn parameters() -> ContainerRunParameters {
        ContainerRunParameters {
            workspace: PathBuf::from("/home/runner/work/game/game"),
            silent: false,
        }
    }

    #[test]
    fn environment_carries_resolved_specification() {
        let env = forwarded_environment(&spec("Android", "-buildAppBundle true"));

        for expected in [
            "UNITY_VERSION=2019.3.0f1",
            "PROJECT_PATH=game",
            "BUILD_TARGET=Android",
            "BUILD_NAME=MyGame",
            "BUILD_PATH=build/Android",
            "BUILD_FILE=MyGame.aab",
            "BUILD_METHOD=",
            "CUSTOM_PARAMETERS=-buildAppBundle true",
            "BUILD_APP_BUNDLE=true",
            "HOME=/github/home",
            "GITHUB_WORKSPACE=/github/workspace",
        ] {
            assert!(env.contains(&expected.to_string()), "missing {expected}");
        }
    }

    #[test]
    fn secrets_are_passed_through_by_name_only() {
        let env = forwarded_environment(&spec("Android", ""));

        for name in ["UNITY_LICENSE", "UNITY_SERIAL", "KEYSTORE_PASS", "KEY_ALIAS_PASS"] {
            assert!(env.contains(&name.to_string()), "missing {name}");
        }
    }

    #[test]
    fn app_bundle_decision_is_explicit_for_android() {
        let env = forwarded_environment(&spec("Android", ""));
        assert!(env.contains(&"BUILD_APP_BUNDLE=false".to_string()));

        let env = forwarded_environment(&spec("WebGL", "-buildAppBundle true"));
        assert!(env.contains(&"BUILD_APP_BUNDLE".to_string()));
        assert!(!env.iter().any(|e| e.starts_with("BUILD_APP_BUNDLE=")));
    }

    #[test]
    fn volumes_mount_workspace_home_socket_and_workflow() {
        let volumes = mounted_volumes(&parameters());
        assert_eq!(
            volumes,
            vec![
                "/var/run/docker.sock:/var/run/docker.sock",
                "/home/runner/work/_temp/_github_home:/github/home",
                "/home/runner/work/_temp/_github_workflow:/github/workflow",
                "/home/runner/work/game/game:/github/workspace",
            ]
        );
    }

    #[test]
    fn run_arguments_end_with_image() {
        let image = ImageTag::new("", "unity-builder", "2019.3.0f1", "Android");
        let args = run_arguments(&image, &spec("Android", ""), &parameters(), "unity-builder-test");

        assert_eq!(
            &args[..6],
            &["run", "--name", "unity-builder-test", "--workdir", "/github/workspace", "--rm"]
        );
        assert_eq!(
            args.last().map(String::as_str),
            Some("unity-builder:2019.3.0f1-android")
        );
        assert_eq!(args.iter().filter(|a| a.as_str() == "--volume").count(), 4);
    }
}
