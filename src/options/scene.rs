use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Mesh identifiers loaded when no options file overrides them.
pub const DEFAULT_ASSETS: [&str; 8] = [
    "A_12",
    "B_01",
    "B_10",
    "D_08",
    "D_16",
    "H_07",
    "goldfish3",
    "skull2",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Where assets come from and how the composition is seeded.
pub struct SceneOptions {
    /// Directory holding `<name>.obj` mesh files.
    pub asset_dir: PathBuf,
    /// Mesh identifiers, in request order.
    pub assets: Vec<String>,
    /// Matcap lookup image shared by every material.
    pub matcap_path: PathBuf,
    /// Fixed RNG seed; `None` draws a fresh composition each session.
    pub seed: Option<u64>,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            asset_dir: PathBuf::from("assets/objs"),
            assets: DEFAULT_ASSETS.iter().map(|&s| s.to_owned()).collect(),
            matcap_path: PathBuf::from("assets/black-n-shiney2.jpg"),
            seed: None,
        }
    }
}
