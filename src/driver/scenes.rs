//! Scene list from the project's build settings.

use anyhow::Context;
use serde::Deserialize;
use std::path::Path;

/// Build settings file, relative to the project directory
pub const EDITOR_BUILD_SETTINGS: &str = "ProjectSettings/EditorBuildSettings.asset";

/// Enabled scene paths from the project's build settings, in build order.
///
/// A project without build settings has no scenes.
pub fn enabled_scenes(project_path: &Path) -> anyhow::Result<Vec<String>> {
    let settings = project_path.join(EDITOR_BUILD_SETTINGS);
    if !settings.is_file() {
        log::warn!(
            "No build settings at {}, building without scenes",
            settings.display()
        );
        return Ok(Vec::new());
    }

    let contents = std::fs::read_to_string(&settings)
        .with_context(|| format!("failed to read {}", settings.display()))?;
    parse_scene_list(&contents).with_context(|| format!("failed to parse {}", settings.display()))
}

#[derive(Deserialize)]
struct SettingsDocument {
    #[serde(rename = "EditorBuildSettings")]
    editor_build_settings: Option<EditorBuildSettings>,
}

#[derive(Deserialize)]
struct EditorBuildSettings {
    #[serde(rename = "m_Scenes", default)]
    scenes: Vec<SceneEntry>,
}

#[derive(Deserialize)]
struct SceneEntry {
    #[serde(default)]
    enabled: i64,
    #[serde(default)]
    path: String,
}

/// Parses the `m_Scenes` list of an `EditorBuildSettings.asset` file.
pub fn parse_scene_list(contents: &str) -> Result<Vec<String>, serde_yaml::Error> {
    let yaml = plain_yaml(contents);

    for document in serde_yaml::Deserializer::from_str(&yaml) {
        let document = SettingsDocument::deserialize(document)?;
        if let Some(settings) = document.editor_build_settings {
            return Ok(settings
                .scenes
                .into_iter()
                .filter(|scene| scene.enabled != 0 && !scene.path.is_empty())
                .map(|scene| scene.path)
                .collect());
        }
    }

    Ok(Vec::new())
}

/// Drops Unity's `%` directives and `!u!` object tags from the document markers.
fn plain_yaml(contents: &str) -> String {
    contents
        .lines()
        .filter(|line| !line.starts_with('%'))
        .map(|line| if line.starts_with("---") { "---" } else { line })
        .collect::<Vec<_>>()
        .join("\n")
}
