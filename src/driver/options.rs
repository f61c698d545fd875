//! Validated driver options.

use super::arguments::ParsedArguments;
use crate::error::DriverError;
use crate::platform::TargetPlatform;

/// Build name used when `-customBuildName` is missing or empty
pub const DEFAULT_BUILD_NAME: &str = "TestBuild";

/// Options the driver understands, as flag names without the marker
pub mod flags {
    /// Unity project directory
    pub const PROJECT_PATH: &str = "projectPath";
    /// Engine build target
    pub const BUILD_TARGET: &str = "buildTarget";
    /// Output location handed to the engine
    pub const CUSTOM_BUILD_PATH: &str = "customBuildPath";
    /// Logical build name
    pub const CUSTOM_BUILD_NAME: &str = "customBuildName";

    /// Every recognized flag
    pub const ALL: [&str; 4] = [PROJECT_PATH, BUILD_TARGET, CUSTOM_BUILD_PATH, CUSTOM_BUILD_NAME];
}

/// Options for one driver run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    /// Unity project directory
    pub project_path: String,
    /// Engine build target
    pub build_target: TargetPlatform,
    /// Output location handed to the engine
    pub custom_build_path: String,
    /// Logical build name
    pub custom_build_name: String,
}

impl BuildOptions {
    /// Validate `arguments`.
    ///
    /// Checks run in a fixed order and the first failure is returned:
    /// project path, build target presence, build target value, build path.
    /// Flags the driver does not know are left to the engine.
    pub fn from_arguments(arguments: &ParsedArguments) -> Result<Self, DriverError> {
        let project_path = arguments
            .get(flags::PROJECT_PATH)
            .ok_or(DriverError::MissingProjectPath)?;

        let build_target = arguments
            .get(flags::BUILD_TARGET)
            .ok_or(DriverError::MissingBuildTarget)?;
        let build_target = build_target
            .parse::<TargetPlatform>()
            .map_err(|e| DriverError::UnknownBuildTarget { value: e.0 })?;

        let custom_build_path = arguments
            .get(flags::CUSTOM_BUILD_PATH)
            .ok_or(DriverError::MissingCustomBuildPath)?;

        let custom_build_name = match arguments.get(flags::CUSTOM_BUILD_NAME) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => {
                log::info!(
                    "Missing or empty argument -{}, defaulting to {}.",
                    flags::CUSTOM_BUILD_NAME,
                    DEFAULT_BUILD_NAME
                );
                DEFAULT_BUILD_NAME.to_string()
            }
        };

        for flag in arguments.flags().filter(|flag| !flags::ALL.contains(flag)) {
            log::debug!("Ignoring engine flag -{}", flag);
        }

        Ok(Self {
            project_path: project_path.to_string(),
            build_target,
            custom_build_path: custom_build_path.to_string(),
            custom_build_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::arguments::parse_arguments;

    fn options(args: &[&str]) -> Result<BuildOptions, DriverError> {
        BuildOptions::from_arguments(&parse_arguments(args).expect("parse"))
    }

    const COMPLETE: &[&str] = &[
        "-projectPath",
        "game",
        "-buildTarget",
        "Android",
        "-customBuildPath",
        "build/Android/game.apk",
        "-customBuildName",
        "game",
    ];

    #[test]
    fn complete_arguments_validate() {
        let options = options(COMPLETE).expect("valid");
        assert_eq!(options.project_path, "game");
        assert_eq!(options.build_target, TargetPlatform::Android);
        assert_eq!(options.custom_build_path, "build/Android/game.apk");
        assert_eq!(options.custom_build_name, "game");
    }

    #[test]
    fn missing_project_path_fails_first() {
        let err = options(&["-buildTarget", "Nope"]).expect_err("invalid");
        assert_eq!(err, DriverError::MissingProjectPath);
        assert_eq!(err.exit_code(), 110);
    }

    #[test]
    fn missing_build_target() {
        let err =
            options(&["-projectPath", "game", "-customBuildPath", "out"]).expect_err("invalid");
        assert_eq!(err.exit_code(), 120);
    }

    #[test]
    fn unknown_build_target() {
        let err = options(&["-projectPath", "game", "-buildTarget", "Dreamcast"])
            .expect_err("invalid");
        assert_eq!(
            err,
            DriverError::UnknownBuildTarget {
                value: "Dreamcast".to_string()
            }
        );
        assert_eq!(err.exit_code(), 121);
    }

    #[test]
    fn valueless_build_target_is_unknown() {
        let err = options(&["-projectPath", "game", "-buildTarget", "-customBuildPath", "out"])
            .expect_err("invalid");
        assert_eq!(err.exit_code(), 121);
    }

    #[test]
    fn missing_custom_build_path() {
        let err = options(&["-projectPath", "game", "-buildTarget", "iOS"]).expect_err("invalid");
        assert_eq!(err.exit_code(), 130);
    }

    #[test]
    fn build_name_defaults_when_missing_or_empty() {
        let base = ["-projectPath", "game", "-buildTarget", "iOS", "-customBuildPath", "out"];
        assert_eq!(options(&base).expect("valid").custom_build_name, "TestBuild");

        let mut empty = base.to_vec();
        empty.push("-customBuildName");
        assert_eq!(options(&empty).expect("valid").custom_build_name, "TestBuild");
    }

    #[test]
    fn engine_flags_are_tolerated() {
        let mut args = COMPLETE.to_vec();
        args.extend(["-batchmode", "-quit", "-logFile", "/dev/stdout"]);
        assert!(options(&args).is_ok());
    }
}
