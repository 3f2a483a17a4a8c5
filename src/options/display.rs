use serde::{Deserialize, Serialize};

use crate::gpu::texture::MSAA_SAMPLES;

/// Window and output settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DisplayOptions {
    /// Window title.
    pub title: String,
    /// Linear RGB background color.
    pub clear_color: [f32; 3],
    /// Apply ACES filmic tone mapping before sRGB output.
    pub tone_mapping: bool,
    /// Multisample the scene pass (4x MSAA).
    pub antialias: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            title: "Ringfield".into(),
            clear_color: [0.0, 0.0, 0.0],
            tone_mapping: true,
            antialias: true,
        }
    }
}

impl DisplayOptions {
    /// Samples per pixel for the scene pass.
    pub fn sample_count(&self) -> u32 {
        if self.antialias {
            MSAA_SAMPLES
        } else {
            1
        }
    }
}
