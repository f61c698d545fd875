//! Raw build input collection.
//!
//! Inputs arrive as a flat, string-keyed mapping (workflow `with:` values,
//! command line flags, or a plain map in tests). Empty values count as absent
//! and fall back to the documented defaults.

use crate::env::Environment;
use crate::platform::TargetPlatform;
use std::collections::HashMap;

/// Owner of the legacy base images, which are tagged without a namespace
pub const LEGACY_REPOSITORY: &str = "gableroux";

/// Base image name used when none is given
pub const DEFAULT_IMAGE_NAME: &str = "unity3d";

/// Output root used when none is given
pub const DEFAULT_BUILDS_PATH: &str = "build";

/// String-keyed provider of raw input values
pub trait InputSource {
    /// Raw value for input `name` (camelCase, e.g. `targetPlatform`)
    fn get(&self, name: &str) -> Option<String>;
}

impl InputSource for HashMap<String, String> {
    fn get(&self, name: &str) -> Option<String> {
        HashMap::get(self, name).cloned()
    }
}

/// Inputs passed the way workflow hosts pass them: `INPUT_<NAME>` variables.
#[derive(Debug, Clone)]
pub struct ActionInputs<E> {
    env: E,
}

impl<E: Environment> ActionInputs<E> {
    /// Read inputs from `env`
    pub fn new(env: E) -> Self {
        Self { env }
    }

    /// Variable name holding input `name`
    pub fn variable_name(name: &str) -> String {
        format!("INPUT_{}", name.replace(' ', "_").to_uppercase())
    }
}

impl<E: Environment> InputSource for ActionInputs<E> {
    fn get(&self, name: &str) -> Option<String> {
        self.env
            .var(&Self::variable_name(name))
            .map(|value| value.trim().to_string())
    }
}

/// Sanitised user input with every default applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Input {
    /// Unity version, opaque to the pipeline
    pub unity_version: String,
    /// Target platform identifier, possibly unrecognized
    pub target_platform: String,
    /// Project path without trailing slash
    pub project_path: String,
    /// Logical build name
    pub build_name: String,
    /// Output root
    pub builds_path: String,
    /// Custom build method hook, processed inside the container
    pub build_method: String,
    /// Flags forwarded to the engine
    pub custom_parameters: String,
    /// Base image owner
    pub repository: String,
    /// Base image name
    pub docker_image_name: String,
}

impl Input {
    /// Collect input from `source`, applying defaults for absent or empty values.
    pub fn from_source(source: &dyn InputSource) -> Self {
        let get = |name: &str| source.get(name).filter(|value| !value.is_empty());

        let requested_build_name = get("buildName");
        log::info!(
            "Requested build name: {}",
            requested_build_name.as_deref().unwrap_or("<unset>")
        );

        let unity_version = get("unityVersion").unwrap_or_default();
        let target_platform =
            get("targetPlatform").unwrap_or_else(|| TargetPlatform::DEFAULT.to_string());
        let raw_project_path = get("projectPath").unwrap_or_else(|| ".".to_string());
        let build_name = requested_build_name.unwrap_or_else(|| target_platform.clone());
        let builds_path = get("buildsPath").unwrap_or_else(|| DEFAULT_BUILDS_PATH.to_string());
        let build_method = get("buildMethod").unwrap_or_default();
        let custom_parameters = get("customParameters").unwrap_or_default();
        let repository = get("repository").unwrap_or_else(|| LEGACY_REPOSITORY.to_string());
        let docker_image_name =
            get("dockerImageName").unwrap_or_else(|| DEFAULT_IMAGE_NAME.to_string());

        let project_path = raw_project_path
            .strip_suffix('/')
            .unwrap_or(&raw_project_path)
            .to_string();

        Self {
            unity_version,
            target_platform,
            project_path,
            build_name,
            builds_path,
            build_method,
            custom_parameters,
            repository,
            docker_image_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_apply_to_empty_source() {
        let input = Input::from_source(&HashMap::<String, String>::new());

        assert_eq!(input.unity_version, "");
        assert_eq!(input.target_platform, "StandaloneWindows64");
        assert_eq!(input.project_path, ".");
        assert_eq!(input.build_name, "StandaloneWindows64");
        assert_eq!(input.builds_path, "build");
        assert_eq!(input.build_method, "");
        assert_eq!(input.custom_parameters, "");
        assert_eq!(input.repository, "gableroux");
        assert_eq!(input.docker_image_name, "unity3d");
    }

    #[test]
    fn build_name_defaults_to_requested_platform() {
        let input = Input::from_source(&source(&[("targetPlatform", "Android")]));
        assert_eq!(input.build_name, "Android");
    }

    #[test]
    fn empty_values_count_as_absent() {
        let input = Input::from_source(&source(&[("buildsPath", ""), ("repository", "")]));
        assert_eq!(input.builds_path, "build");
        assert_eq!(input.repository, "gableroux");
    }

    #[test]
    fn one_trailing_slash_is_stripped_from_project_path() {
        let input = Input::from_source(&source(&[("projectPath", "game/")]));
        assert_eq!(input.project_path, "game");

        let input = Input::from_source(&source(&[("projectPath", "./")]));
        assert_eq!(input.project_path, ".");

        let input = Input::from_source(&source(&[("projectPath", "game")]));
        assert_eq!(input.project_path, "game");
    }

    #[test]
    fn action_inputs_read_uppercased_variables() {
        let env = source(&[
            ("INPUT_TARGETPLATFORM", " iOS "),
            ("INPUT_CUSTOMPARAMETERS", "-quit"),
        ]);
        let inputs = ActionInputs::new(env);

        assert_eq!(
            ActionInputs::<HashMap<String, String>>::variable_name("unityVersion"),
            "INPUT_UNITYVERSION"
        );
        assert_eq!(inputs.get("targetPlatform"), Some("iOS".to_string()));

        let input = Input::from_source(&inputs);
        assert_eq!(input.target_platform, "iOS");
        assert_eq!(input.custom_parameters, "-quit");
    }
}
