//! Mesh and texture assets.
//!
//! OBJ files are parsed on background threads by [`loader::AssetLoader`];
//! results come back through a channel and are gathered by a
//! [`barrier::LoadBarrier`], which releases the finished
//! [`GeometryPool`] exactly once. The matcap image is decoded separately by
//! [`matcap`].

pub mod barrier;
pub mod loader;
pub mod matcap;
pub mod obj;

use std::sync::Arc;

pub use barrier::LoadBarrier;
pub use loader::{has_obj_files, AssetLoader, PendingLoads};

use crate::geometry::MeshData;

/// One mesh sub-part tagged with the identifier of the file it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryAsset {
    /// Source identifier (file stem).
    pub name: String,
    /// Triangle mesh.
    pub mesh: MeshData,
}

/// Loaded geometries, available for indexed random selection.
///
/// Entries are immutable and shared; cloning the pool or an entry is cheap.
#[derive(Debug, Clone, Default)]
pub struct GeometryPool {
    assets: Vec<Arc<GeometryAsset>>,
}

impl GeometryPool {
    /// Wrap already-loaded assets, keeping their order.
    pub fn new(assets: Vec<GeometryAsset>) -> Self {
        Self {
            assets: assets.into_iter().map(Arc::new).collect(),
        }
    }

    /// Number of geometries.
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// `true` when every load failed (or none were requested).
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Geometry at `index`.
    pub fn get(&self, index: usize) -> Option<&Arc<GeometryAsset>> {
        self.assets.get(index)
    }

    /// All geometries in pool order.
    pub fn as_slice(&self) -> &[Arc<GeometryAsset>] {
        &self.assets
    }

    /// Distinct source identifiers, in pool order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for asset in &self.assets {
            if !names.contains(&asset.name.as_str()) {
                names.push(&asset.name);
            }
        }
        names
    }
}
