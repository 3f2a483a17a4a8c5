//! Crate-level error types.

use std::fmt;

use crate::gpu::render_context::RenderContextError;

/// Errors produced by the ringfield crate.
#[derive(Debug)]
pub enum RingfieldError {
    /// GPU context initialization failure.
    Gpu(RenderContextError),
    /// A single mesh asset could not be read or parsed.
    AssetLoad {
        /// Identifier of the asset that failed.
        name: String,
        /// Human-readable cause.
        message: String,
    },
    /// Composition was attempted with no loaded geometry to choose from.
    EmptyGeometryPool,
    /// Matcap image decoding failure.
    Texture(String),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// Failed to spawn a background loader thread.
    ThreadSpawn(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Viewer event-loop failure.
    Viewer(String),
}

impl fmt::Display for RingfieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpu(e) => write!(f, "GPU error: {e}"),
            Self::AssetLoad { name, message } => {
                write!(f, "failed to load asset '{name}': {message}")
            }
            Self::EmptyGeometryPool => write!(
                f,
                "no geometry available for composition (every asset failed \
                 to load)"
            ),
            Self::Texture(msg) => write!(f, "texture error: {msg}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::ThreadSpawn(e) => {
                write!(f, "failed to spawn thread: {e}")
            }
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Viewer(msg) => write!(f, "viewer error: {msg}"),
        }
    }
}

impl std::error::Error for RingfieldError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Gpu(e) => Some(e),
            Self::Io(e) | Self::ThreadSpawn(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RenderContextError> for RingfieldError {
    fn from(e: RenderContextError) -> Self {
        Self::Gpu(e)
    }
}

impl From<std::io::Error> for RingfieldError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
