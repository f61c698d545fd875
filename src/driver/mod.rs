//! In-container build driver.
//!
//! Runs once per container: parse the argument vector, validate it, apply
//! Android player settings, run the engine build and exit with a code that
//! encodes the outcome.
//!
//! | exit code | meaning |
//! |-----------|---------|
//! | 0 | build succeeded |
//! | 101 / 102 / 103 | build failed / cancelled / unknown |
//! | 110 | `-projectPath` missing |
//! | 120 / 121 | `-buildTarget` missing / not a build target |
//! | 130 | `-customBuildPath` missing |
//! | 140 | a flag was given twice |
//! | 1 | engine not configured or not reachable |

pub mod android;
pub mod arguments;
pub mod engine;
pub mod options;
pub mod report;
pub mod scenes;

pub use android::{AndroidSettings, AndroidSigning};
pub use arguments::{ParsedArguments, parse_arguments};
pub use engine::{BuildPlayerOptions, BuildResult, BuildSummary, Engine, ProcessEngine};
pub use options::{BuildOptions, DEFAULT_BUILD_NAME};

use crate::env::Environment;
use crate::error::{DriverError, GENERIC_FAILURE_EXIT_CODE};
use std::path::Path;

/// Stages of a driver run, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Tokenizing the argument vector
    ParsingArguments,
    /// Checking required options
    Validating,
    /// Applying platform settings
    ConfiguringPlatform,
    /// Waiting for the engine
    Building,
    /// Logging the build summary
    ReportingResult,
    /// Mapping the result to an exit code
    Exiting,
}

/// Drives one engine build from the container's arguments and environment
pub struct BuildDriver<E, V> {
    engine: E,
    env: V,
    stage: Stage,
}

impl<E: Engine, V: Environment> BuildDriver<E, V> {
    /// Driver using `engine`, reading settings from `env`
    pub fn new(engine: E, env: V) -> Self {
        Self {
            engine,
            env,
            stage: Stage::ParsingArguments,
        }
    }

    /// Stage reached by the last run
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Run a build for `args` and return the process exit code.
    pub fn run<I, S>(&mut self, args: I) -> i32
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let code = match self.try_run(args) {
            Ok(code) => code,
            Err(e) => {
                log::error!("{}", e);
                e.exit_code()
            }
        };
        self.enter(Stage::Exiting);
        code
    }

    fn enter(&mut self, stage: Stage) {
        log::debug!("{:?} -> {:?}", self.stage, stage);
        self.stage = stage;
    }

    fn try_run<I, S>(&mut self, args: I) -> Result<i32, DriverError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.enter(Stage::ParsingArguments);
        report::banner("Parsing settings");
        let arguments = parse_arguments(args)?;

        self.enter(Stage::Validating);
        let options = BuildOptions::from_arguments(&arguments)?;
        let project_path = Path::new(&options.project_path);

        self.enter(Stage::ConfiguringPlatform);
        let android = options
            .build_target
            .is_android()
            .then(|| AndroidSettings::configure(&self.env, project_path));

        let scenes =
            scenes::enabled_scenes(project_path).map_err(|e| DriverError::EngineFailed {
                reason: format!("cannot read build settings: {:#}", e),
            })?;

        let build_options = BuildPlayerOptions {
            scenes,
            location_path_name: options.custom_build_path.clone(),
            target: options.build_target,
            android,
        };

        self.enter(Stage::Building);
        log::info!(
            "Building {} for {} into {}",
            options.custom_build_name,
            options.build_target,
            options.custom_build_path
        );
        let summary = self.engine.build_player(&build_options)?;

        self.enter(Stage::ReportingResult);
        report::report_summary(&summary);

        Ok(report::exit_code_for(summary.result))
    }
}

/// Exit code used when the driver cannot start at all
pub const STARTUP_FAILURE_EXIT_CODE: i32 = GENERIC_FAILURE_EXIT_CODE;

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    /// Engine double recording the options it was called with
    struct FakeEngine {
        result: BuildResult,
        calls: Vec<BuildPlayerOptions>,
    }

    impl FakeEngine {
        fn returning(result: BuildResult) -> Self {
            Self {
                result,
                calls: Vec::new(),
            }
        }
    }

    impl Engine for FakeEngine {
        fn build_player(
            &mut self,
            options: &BuildPlayerOptions,
        ) -> Result<BuildSummary, DriverError> {
            self.calls.push(options.clone());
            Ok(BuildSummary {
                result: self.result,
                total_time_seconds: 12.5,
                total_warnings: 2,
                total_errors: 0,
                total_size: 4096,
            })
        }
    }

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn args(project: &Path, target: &str) -> Vec<String> {
        vec![
            "unity-editor".to_string(),
            "-batchmode".to_string(),
            "-projectPath".to_string(),
            project.display().to_string(),
            "-buildTarget".to_string(),
            target.to_string(),
            "-customBuildPath".to_string(),
            "build/out".to_string(),
        ]
    }

    #[test]
    fn engine_results_become_exit_codes() {
        let project = TempDir::new().expect("tempdir");

        for (result, code) in [
            (BuildResult::Succeeded, 0),
            (BuildResult::Failed, 101),
            (BuildResult::Cancelled, 102),
            (BuildResult::Unknown, 103),
        ] {
            let mut driver = BuildDriver::new(FakeEngine::returning(result), env(&[]));
            assert_eq!(driver.run(args(project.path(), "WebGL")), code);
            assert_eq!(driver.stage(), Stage::Exiting);
        }
    }

    #[test]
    fn validation_failures_never_reach_the_engine() {
        let mut driver =
            BuildDriver::new(FakeEngine::returning(BuildResult::Succeeded), env(&[]));

        assert_eq!(driver.run(["-buildTarget", "iOS"]), 110);
        assert_eq!(driver.run(["-projectPath", "game"]), 120);
        assert_eq!(driver.run(["-projectPath", "game", "-buildTarget", "Wii"]), 121);
        assert_eq!(driver.run(["-projectPath", "game", "-buildTarget", "iOS"]), 130);
        assert_eq!(driver.run(["-projectPath", "a", "-projectPath", "b"]), 140);
        assert!(driver.engine.calls.is_empty());
    }

    #[test]
    fn engine_receives_target_and_output_path() {
        let project = TempDir::new().expect("tempdir");
        let mut driver =
            BuildDriver::new(FakeEngine::returning(BuildResult::Succeeded), env(&[]));

        assert_eq!(driver.run(args(project.path(), "StandaloneLinux64")), 0);

        let call = &driver.engine.calls[0];
        assert_eq!(call.target, crate::platform::TargetPlatform::StandaloneLinux64);
        assert_eq!(call.location_path_name, "build/out");
        assert!(call.android.is_none());
    }

    #[test]
    fn engine_receives_enabled_scenes_unquoted() {
        let project = TempDir::new().expect("tempdir");
        std::fs::create_dir_all(project.path().join("ProjectSettings")).expect("mkdir");
        std::fs::write(
            project.path().join(scenes::EDITOR_BUILD_SETTINGS),
            "%YAML 1.1\n--- !u!1045 &1\nEditorBuildSettings:\n  m_Scenes:\n  \
             - enabled: 1\n    path: 'Assets/Scenes/[Boot].unity'\n",
        )
        .expect("write build settings");
        let mut driver =
            BuildDriver::new(FakeEngine::returning(BuildResult::Succeeded), env(&[]));

        assert_eq!(driver.run(args(project.path(), "WebGL")), 0);
        assert_eq!(driver.engine.calls[0].scenes, vec!["Assets/Scenes/[Boot].unity"]);
    }

    #[test]
    fn unreadable_build_settings_exit_with_generic_failure() {
        let project = TempDir::new().expect("tempdir");
        std::fs::create_dir_all(project.path().join("ProjectSettings")).expect("mkdir");
        std::fs::write(
            project.path().join(scenes::EDITOR_BUILD_SETTINGS),
            "EditorBuildSettings:\n  m_Scenes: [\n",
        )
        .expect("write build settings");
        let mut driver =
            BuildDriver::new(FakeEngine::returning(BuildResult::Succeeded), env(&[]));

        assert_eq!(driver.run(args(project.path(), "WebGL")), STARTUP_FAILURE_EXIT_CODE);
        assert!(driver.engine.calls.is_empty());
    }

    #[test]
    fn android_without_keystore_still_builds() {
        let project = TempDir::new().expect("tempdir");
        let mut driver = BuildDriver::new(
            FakeEngine::returning(BuildResult::Failed),
            env(&[("KEYSTORE_PASS", "store"), ("BUILD_APP_BUNDLE", "true")]),
        );

        assert_eq!(driver.run(args(project.path(), "Android")), 101);

        let android = driver.engine.calls[0].android.as_ref().expect("android settings");
        assert_eq!(android.signing, AndroidSigning::NoKeystore);
        assert_eq!(android.build_app_bundle, Some(true));
    }

    #[test]
    fn android_with_keystore_but_no_passwords_still_builds() {
        let project = TempDir::new().expect("tempdir");
        std::fs::write(project.path().join(android::KEYSTORE_FILE), b"ks").expect("write");
        let mut driver =
            BuildDriver::new(FakeEngine::returning(BuildResult::Succeeded), env(&[]));

        assert_eq!(driver.run(args(project.path(), "Android")), 0);

        let android = driver.engine.calls[0].android.as_ref().expect("android settings");
        assert!(matches!(android.signing, AndroidSigning::DefaultSigning { .. }));
    }

    #[test]
    fn engine_errors_exit_with_generic_failure() {
        let project = TempDir::new().expect("tempdir");
        let mut driver = BuildDriver::new(ProcessEngine::default(), env(&[]));
        assert_eq!(
            driver.run(args(project.path(), "WebGL")),
            STARTUP_FAILURE_EXIT_CODE
        );
    }
}
