//! Resolution of sanitised input into the build specification.

use crate::input::Input;
use crate::platform;

/// Flag in the custom parameters that requests an Android App Bundle
pub const APP_BUNDLE_FLAG: &str = "buildAppBundle";

/// Fully resolved parameters for one build.
///
/// Immutable once resolved. `build_path`, `build_file` and `android_app_bundle`
/// are functions of the primitive fields, so a specification can always be
/// reproduced from its [`Input`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSpecification {
    version: String,
    platform: String,
    project_path: String,
    build_name: String,
    builds_path: String,
    build_method: String,
    custom_parameters: String,
    repository: String,
    docker_image_name: String,
    build_path: String,
    build_file: String,
    android_app_bundle: Option<bool>,
}

impl BuildSpecification {
    /// Resolve `input` into a complete specification. Never fails:
    /// unrecognized platforms simply get no file extension.
    pub fn resolve(input: &Input) -> Self {
        let platform = input.target_platform.clone();
        let artifact = ArtifactName::parse(&input.build_name, &platform, &input.custom_parameters);

        Self {
            version: input.unity_version.clone(),
            build_path: format!("{}/{}", input.builds_path, platform),
            build_file: artifact.file_name,
            android_app_bundle: artifact.app_bundle,
            platform,
            project_path: input.project_path.clone(),
            build_name: input.build_name.clone(),
            builds_path: input.builds_path.clone(),
            build_method: input.build_method.clone(),
            custom_parameters: input.custom_parameters.clone(),
            repository: input.repository.clone(),
            docker_image_name: input.docker_image_name.clone(),
        }
    }

    /// Unity version
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Target platform identifier, possibly unrecognized
    pub fn platform(&self) -> &str {
        &self.platform
    }

    /// Project path without trailing slash
    pub fn project_path(&self) -> &str {
        &self.project_path
    }

    /// Logical build name
    pub fn build_name(&self) -> &str {
        &self.build_name
    }

    /// Output root
    pub fn builds_path(&self) -> &str {
        &self.builds_path
    }

    /// Custom build method hook
    pub fn build_method(&self) -> &str {
        &self.build_method
    }

    /// Flags forwarded to the engine unmodified
    pub fn custom_parameters(&self) -> &str {
        &self.custom_parameters
    }

    /// Base image owner
    pub fn repository(&self) -> &str {
        &self.repository
    }

    /// Base image name
    pub fn docker_image_name(&self) -> &str {
        &self.docker_image_name
    }

    /// `{builds_path}/{platform}`
    pub fn build_path(&self) -> &str {
        &self.build_path
    }

    /// Build name with the platform's artifact extension
    pub fn build_file(&self) -> &str {
        &self.build_file
    }

    /// App bundle decision for Android targets, `None` for every other platform.
    ///
    /// Forwarded to the container as `BUILD_APP_BUNDLE`.
    pub fn android_app_bundle(&self) -> Option<bool> {
        self.android_app_bundle
    }
}

/// Artifact file name derived from build name, platform and custom parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactName {
    /// File name, with extension when the platform has one
    pub file_name: String,
    /// Android App Bundle decision, `None` for non-Android platforms
    pub app_bundle: Option<bool>,
}

impl ArtifactName {
    /// Derive the artifact name.
    ///
    /// Windows targets get `.exe`. Android targets get `.apk`, or `.aab` when a
    /// token containing `buildAppBundle` is directly followed by `true`; the first
    /// such token decides. Every other platform keeps the bare build name.
    pub fn parse(build_name: &str, platform: &str, custom_parameters: &str) -> Self {
        if platform::is_windows(platform) {
            return Self {
                file_name: format!("{build_name}.exe"),
                app_bundle: None,
            };
        }

        if platform::is_android(platform) {
            let app_bundle = requests_app_bundle(custom_parameters);
            let extension = if app_bundle { "aab" } else { "apk" };
            return Self {
                file_name: format!("{build_name}.{extension}"),
                app_bundle: Some(app_bundle),
            };
        }

        Self {
            file_name: build_name.to_string(),
            app_bundle: None,
        }
    }
}

/// Single left-to-right scan for `<..buildAppBundle..> true`.
fn requests_app_bundle(custom_parameters: &str) -> bool {
    let tokens: Vec<&str> = custom_parameters.split_whitespace().collect();
    tokens
        .windows(2)
        .any(|pair| pair[0].contains(APP_BUNDLE_FLAG) && pair[1] == "true")
}
