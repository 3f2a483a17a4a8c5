//! OBJ mesh parsing.

use std::io::Cursor;
use std::path::Path;

use glam::Vec3;

use super::GeometryAsset;
use crate::error::RingfieldError;
use crate::geometry::{compute_vertex_normals, MeshData};

/// Read and parse `path`, tagging every sub-part with `name`.
///
/// # Errors
///
/// Returns [`RingfieldError::AssetLoad`] if the file cannot be read, is not
/// valid OBJ, or holds no triangles.
pub fn load_obj_file(
    name: &str,
    path: &Path,
) -> Result<Vec<GeometryAsset>, RingfieldError> {
    let bytes = std::fs::read(path).map_err(|e| RingfieldError::AssetLoad {
        name: name.to_owned(),
        message: format!("{}: {e}", path.display()),
    })?;
    parse_obj(name, &bytes)
}

/// Parse OBJ text, producing one [`GeometryAsset`] per object/group that
/// has faces. Material libraries are not read.
///
/// # Errors
///
/// Returns [`RingfieldError::AssetLoad`] on malformed input or when no
/// sub-part contains triangles.
pub fn parse_obj(
    name: &str,
    bytes: &[u8],
) -> Result<Vec<GeometryAsset>, RingfieldError> {
    let load_error = |message: String| RingfieldError::AssetLoad {
        name: name.to_owned(),
        message,
    };

    let (models, _materials) = tobj::load_obj_buf(
        &mut Cursor::new(bytes),
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
        |_| Ok((Vec::new(), Default::default())),
    )
    .map_err(|e| load_error(format!("invalid OBJ: {e}")))?;

    let assets: Vec<GeometryAsset> = models
        .into_iter()
        .filter_map(|model| {
            let mesh = mesh_from_tobj(model.mesh);
            if mesh.is_empty() {
                log::debug!("{name}: skipping empty sub-part '{}'", model.name);
                return None;
            }
            Some(GeometryAsset {
                name: name.to_owned(),
                mesh,
            })
        })
        .collect();

    if assets.is_empty() {
        return Err(load_error("no triangles found".into()));
    }
    Ok(assets)
}

fn mesh_from_tobj(mesh: tobj::Mesh) -> MeshData {
    let positions: Vec<Vec3> = mesh
        .positions
        .chunks_exact(3)
        .map(|v| Vec3::new(v[0], v[1], v[2]))
        .collect();

    let normals = if mesh.normals.len() == mesh.positions.len() {
        mesh.normals
            .chunks_exact(3)
            .map(|n| {
                Vec3::new(n[0], n[1], n[2]).try_normalize().unwrap_or(Vec3::Z)
            })
            .collect()
    } else {
        compute_vertex_normals(&positions, &mesh.indices)
    };

    MeshData {
        positions,
        normals,
        indices: mesh.indices,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE: &str = "\
v 0 0 0
v 1 0 0
v 0 1 0
f 1 2 3
";

    const TWO_OBJECTS_WITH_NORMALS: &str = "\
o first
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vn 0 0 2
f 1//1 2//1 3//1 4//1
o second
v 0 0 1
v 1 0 1
v 0 1 1
f 5 6 7
";

    #[test]
    fn single_triangle_gets_computed_normals() {
        let assets = parse_obj("tri", TRIANGLE.as_bytes()).unwrap();
        assert_eq!(assets.len(), 1);
        let mesh = &assets[0].mesh;
        assert_eq!(assets[0].name, "tri");
        assert_eq!(mesh.triangle_count(), 1);
        for n in &mesh.normals {
            assert!((*n - Vec3::Z).length() < 1e-6);
        }
    }

    #[test]
    fn every_sub_part_is_tagged_with_source_name() {
        let assets =
            parse_obj("pair", TWO_OBJECTS_WITH_NORMALS.as_bytes()).unwrap();
        assert_eq!(assets.len(), 2);
        assert!(assets.iter().all(|a| a.name == "pair"));
        // Quad face is triangulated
        assert_eq!(assets[0].mesh.triangle_count(), 2);
        // File normals are kept, normalized
        assert!((assets[0].mesh.normals[0] - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn vertices_without_faces_are_an_error() {
        let err = parse_obj("points", b"v 0 0 0\nv 1 1 1\n").unwrap_err();
        assert!(matches!(
            err,
            RingfieldError::AssetLoad { ref name, .. } if name == "points"
        ));
    }

    #[test]
    fn missing_file_is_an_asset_error() {
        let err = load_obj_file("ghost", Path::new("/nonexistent/ghost.obj"))
            .unwrap_err();
        assert!(err.to_string().contains("ghost"));
    }
}
