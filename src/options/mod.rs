//! Centralized session options with TOML support.
//!
//! Asset locations, camera and display settings are consolidated here.
//! Options serialize to/from TOML; every section uses `#[serde(default)]` so
//! a file overriding only `[camera]` still loads. The ring layout formulas
//! are not configurable and live in [`crate::layout`].

mod camera;
mod display;
mod scene;

use std::path::Path;

pub use camera::CameraOptions;
pub use display::DisplayOptions;
pub use scene::SceneOptions;
use serde::{Deserialize, Serialize};

use crate::error::RingfieldError;

/// Top-level options container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Options {
    /// Asset locations and composition seed.
    pub scene: SceneOptions,
    /// Camera projection and orbit-control parameters.
    pub camera: CameraOptions,
    /// Window and output settings.
    pub display: DisplayOptions,
}

impl Options {
    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`RingfieldError::Io`] if the file cannot be read and
    /// [`RingfieldError::OptionsParse`] if it is not valid TOML for
    /// [`Options`].
    pub fn load(path: &Path) -> Result<Self, RingfieldError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse options from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`RingfieldError::OptionsParse`] on malformed input.
    pub fn from_toml(content: &str) -> Result<Self, RingfieldError> {
        toml::from_str(content)
            .map_err(|e| RingfieldError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`RingfieldError::OptionsParse`] if serialization fails and
    /// [`RingfieldError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), RingfieldError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| RingfieldError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content).map_err(RingfieldError::Io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r"
[camera]
damping_factor = 0.1
";
        let opts = Options::from_toml(toml_str).unwrap();
        assert_eq!(opts.camera.damping_factor, 0.1);
        // Everything else should be default
        assert_eq!(opts.camera.fovy, 75.0);
        assert_eq!(opts.scene.assets.len(), 8);
        assert!(opts.display.tone_mapping);
    }

    #[test]
    fn seed_is_optional() {
        let opts = Options::from_toml("[scene]\nseed = 42\n").unwrap();
        assert_eq!(opts.scene.seed, Some(42));
        assert_eq!(Options::default().scene.seed, None);
    }

    #[test]
    fn malformed_toml_is_an_options_error() {
        let err = Options::from_toml("[camera\nfovy = ").unwrap_err();
        assert!(matches!(err, RingfieldError::OptionsParse(_)));
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("presets/custom.toml");
        let mut opts = Options::default();
        opts.camera.distance = 12.0;
        opts.scene.assets = vec!["skull2".into()];
        opts.save(&path).unwrap();
        assert_eq!(Options::load(&path).unwrap(), opts);
    }
}
