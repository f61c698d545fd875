//! Android player configuration from the container environment.
//!
//! Nothing in here is fatal. Missing or malformed values are logged and the
//! build falls back to the project's own settings and the engine's debug
//! keystore.

use crate::env::{Environment, Secret};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Toggle for building an App Bundle instead of an APK
pub const BUILD_APP_BUNDLE: &str = "BUILD_APP_BUNDLE";
/// Integer bundle version code
pub const BUNDLE_VERSION_CODE: &str = "BUNDLE_VERSION_CODE";
/// Keystore password
pub const KEYSTORE_PASS: &str = "KEYSTORE_PASS";
/// Key alias name override
pub const KEY_ALIAS_NAME: &str = "KEY_ALIAS_NAME";
/// Key alias password
pub const KEY_ALIAS_PASS: &str = "KEY_ALIAS_PASS";

/// Keystore file name, relative to the project directory
pub const KEYSTORE_FILE: &str = "keystore.keystore";

/// How the Android artifact gets signed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum AndroidSigning {
    /// No keystore in the project; the engine signs with its debug keystore
    NoKeystore,
    /// Keystore present but passwords incomplete; custom keystore stays disabled
    #[serde(rename_all = "camelCase")]
    DefaultSigning {
        /// Keystore location
        keystore: PathBuf,
        /// Key alias override, project setting otherwise
        key_alias_name: Option<String>,
    },
    /// Keystore and both passwords present
    #[serde(rename_all = "camelCase")]
    CustomSigning {
        /// Keystore location
        keystore: PathBuf,
        /// Key alias override, project setting otherwise
        key_alias_name: Option<String>,
        /// Keystore password
        keystore_pass: Secret,
        /// Key alias password
        key_alias_pass: Secret,
    },
}

impl AndroidSigning {
    /// Whether the engine should use the custom keystore
    pub fn uses_custom_keystore(&self) -> bool {
        matches!(self, AndroidSigning::CustomSigning { .. })
    }

    /// Resolve signing from the keystore in `project_path` and the environment.
    pub fn resolve(env: &dyn Environment, project_path: &Path) -> Self {
        let keystore = project_path.join(KEYSTORE_FILE);
        if !keystore.is_file() {
            log::info!(
                ":: {} not found, skipping setup, using Unity's default keystore",
                KEYSTORE_FILE
            );
            return AndroidSigning::NoKeystore;
        }

        let key_alias_name = env.non_empty(KEY_ALIAS_NAME);
        if key_alias_name.is_some() {
            log::info!(":: using ${} env var on PlayerSettings", KEY_ALIAS_NAME);
        } else {
            log::info!(
                ":: ${} env var not set, using Project's PlayerSettings",
                KEY_ALIAS_NAME
            );
        }

        let Some(keystore_pass) = env.non_empty(KEYSTORE_PASS) else {
            log::info!(
                ":: ${} env var not set, skipping setup, using Unity's default keystore",
                KEYSTORE_PASS
            );
            return AndroidSigning::DefaultSigning {
                keystore,
                key_alias_name,
            };
        };

        let Some(key_alias_pass) = env.non_empty(KEY_ALIAS_PASS) else {
            log::info!(
                ":: ${} env var not set, skipping setup, using Unity's default keystore",
                KEY_ALIAS_PASS
            );
            return AndroidSigning::DefaultSigning {
                keystore,
                key_alias_name,
            };
        };

        AndroidSigning::CustomSigning {
            keystore,
            key_alias_name,
            keystore_pass: Secret::new(keystore_pass),
            key_alias_pass: Secret::new(key_alias_pass),
        }
    }
}

/// Android player settings applied before the build
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AndroidSettings {
    /// Build an App Bundle; project setting when `None`
    pub build_app_bundle: Option<bool>,
    /// Bundle version code; project setting when `None`
    pub bundle_version_code: Option<i32>,
    /// Keystore configuration
    pub signing: AndroidSigning,
}

impl AndroidSettings {
    /// Read Android settings from `env` and the project's keystore.
    pub fn configure(env: &dyn Environment, project_path: &Path) -> Self {
        let build_app_bundle = env.non_empty(BUILD_APP_BUNDLE).and_then(|value| {
            match parse_bool(&value) {
                Some(enabled) => {
                    log::info!(
                        ":: {} env var detected, set buildAppBundle to {}.",
                        BUILD_APP_BUNDLE,
                        value
                    );
                    Some(enabled)
                }
                None => {
                    log::warn!(
                        ":: {} env var detected but the value \"{}\" is not a boolean.",
                        BUILD_APP_BUNDLE,
                        value
                    );
                    None
                }
            }
        });

        let bundle_version_code = env.non_empty(BUNDLE_VERSION_CODE).and_then(|value| {
            match value.trim().parse::<i32>() {
                Ok(code) => {
                    log::info!(
                        ":: {} env var detected, set the bundle version code to {}.",
                        BUNDLE_VERSION_CODE,
                        value
                    );
                    Some(code)
                }
                Err(_) => {
                    log::warn!(
                        ":: {} env var detected but the version value \"{}\" is not an integer.",
                        BUNDLE_VERSION_CODE,
                        value
                    );
                    None
                }
            }
        });

        let signing = AndroidSigning::resolve(env, project_path);
        log::info!(
            ":: custom keystore {}",
            if signing.uses_custom_keystore() {
                "enabled"
            } else {
                "disabled"
            }
        );

        Self {
            build_app_bundle,
            bundle_version_code,
            signing,
        }
    }
}

/// `true`/`false`, case-insensitive, surrounding whitespace ignored
fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}
