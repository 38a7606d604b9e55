//! Centralized viewport options with TOML preset support.
//!
//! All tweakable settings (camera placement, flight timing, resolution
//! budget, pointer/keyboard controls, key bindings) are consolidated here.
//! Options serialize to/from TOML so hosts can keep presets on disk.

mod animation;
mod camera;
mod controls;
mod resize;

use std::path::Path;

pub use animation::AnimationOptions;
pub use camera::{CameraOptions, ProjectionKind};
pub use controls::ControlOptions;
pub use resize::ResizeOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ViewportError;
use crate::input::KeyBindings;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[resize]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct ViewportOptions {
    /// Camera projection and initial placement.
    pub camera: CameraOptions,
    /// Camera flight timing.
    pub animation: AnimationOptions,
    /// Render-resolution budget.
    pub resize: ResizeOptions,
    /// Pointer and keyboard control parameters.
    pub controls: ControlOptions,
    /// Keyboard binding options.
    #[schemars(skip)]
    pub keybindings: KeyBindings,
}

impl ViewportOptions {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(ViewportOptions)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ViewportError::Io`] if the file cannot be read and
    /// [`ViewportError::OptionsParse`] if it is not valid options TOML.
    pub fn load(path: &Path) -> Result<Self, ViewportError> {
        let content = std::fs::read_to_string(path).map_err(ViewportError::Io)?;
        Self::from_toml(&content)
    }

    /// Parse options from a TOML string. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ViewportError::OptionsParse`] on malformed input.
    pub fn from_toml(content: &str) -> Result<Self, ViewportError> {
        toml::from_str(content)
            .map_err(|e| ViewportError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`ViewportError`] if serialization or the write fails.
    pub fn save(&self, path: &Path) -> Result<(), ViewportError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ViewportError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ViewportError::Io)?;
        }
        std::fs::write(path, content).map_err(ViewportError::Io)
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyAction;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = ViewportOptions::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: ViewportOptions = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r"
[resize]
max_texture_budget = 2000000.0
";
        let opts = ViewportOptions::from_toml(toml_str).unwrap();
        assert_eq!(opts.resize.max_texture_budget, 2.0e6);
        // Everything else should be default
        assert_eq!(opts.resize.epsilon_px, 0.1);
        assert_eq!(opts.animation.min_duration_ms, 600);
        assert!(!opts.controls.keyboard_navigation);
    }

    #[test]
    fn malformed_toml_is_options_parse_error() {
        let err = ViewportOptions::from_toml("[resize\nmax = ").unwrap_err();
        assert!(matches!(err, ViewportError::OptionsParse(_)));
    }

    #[test]
    fn keybinding_lookup() {
        let opts = ViewportOptions::default();
        assert_eq!(
            opts.keybindings.lookup("KeyW"),
            Some(KeyAction::MoveForward)
        );
        assert_eq!(opts.keybindings.lookup("KeyZ"), None);
    }

    #[test]
    fn save_and_list_presets() {
        let dir = std::env::temp_dir()
            .join(format!("vantage-presets-{}", std::process::id()));
        let mut opts = ViewportOptions::default();
        opts.controls.keyboard_navigation = true;
        opts.save(&dir.join("walk.toml")).unwrap();
        assert_eq!(ViewportOptions::list_presets(&dir), vec!["walk".to_owned()]);
        let loaded = ViewportOptions::load(&dir.join("walk.toml")).unwrap();
        assert_eq!(loaded, opts);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(ViewportOptions::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        assert!(props.contains_key("camera"));
        assert!(props.contains_key("animation"));
        assert!(props.contains_key("resize"));
        assert!(props.contains_key("controls"));
        assert!(!props.contains_key("keybindings"));

        let resize = &props["resize"]["properties"];
        assert!(resize.get("max_texture_budget").is_some());
        assert!(resize.get("epsilon_px").is_none());
    }
}
