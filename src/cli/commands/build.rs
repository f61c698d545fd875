//! Build command: resolve inputs, build the builder image, run the build container.

use crate::build_parameters::BuildSpecification;
use crate::cli::{Args, RuntimeConfig};
use crate::docker::{self, ContainerRunParameters, ImageBuildParameters, ImageTag};
use crate::error::Result;
use crate::input::Input;
use chrono::Utc;

/// Run the full pipeline for `args`.
///
/// Each step is awaited before the next one starts; the first failure aborts
/// the pipeline without retries.
pub async fn execute_build(args: &Args, config: &RuntimeConfig) -> Result<i32> {
    config.section("Unity build");

    let input = Input::from_source(args);
    let spec = BuildSpecification::resolve(&input);
    report_specification(&spec, config);
    if spec.version().is_empty() {
        config.warn("No Unity version given, using the base image tagged by platform only");
    }

    docker::check_docker_available().await?;

    let base_image = ImageTag::new(
        spec.repository(),
        spec.docker_image_name(),
        spec.version(),
        spec.platform(),
    );
    let image = docker::build(
        &ImageBuildParameters {
            context: args.action_path.clone(),
            dockerfile: args.dockerfile_path(),
            base_image,
            silent: args.silent,
        },
        config,
    )
    .await?;

    let workspace = match &args.workspace {
        Some(workspace) => workspace.clone(),
        None => std::env::current_dir()?,
    };

    let started = Utc::now();
    let exit_code = docker::run(
        &image,
        &spec,
        &ContainerRunParameters {
            workspace,
            silent: args.silent,
        },
        config,
    )
    .await?;

    let elapsed = Utc::now() - started;
    config.success(&format!(
        "Built {} for {} in {}s",
        spec.build_file(),
        spec.platform(),
        elapsed.num_seconds()
    ));

    Ok(exit_code)
}

fn report_specification(spec: &BuildSpecification, config: &RuntimeConfig) {
    config.progress(&format!(
        "Resolved {} build of {}",
        spec.platform(),
        spec.project_path()
    ));
    config.indent(&format!("Unity version: {}", spec.version()));
    config.indent(&format!("Build path:    {}", spec.build_path()));
    config.indent(&format!("Build file:    {}", spec.build_file()));
    if !spec.build_method().is_empty() {
        config.indent(&format!("Build method:  {}", spec.build_method()));
    }
}
