//! Load OBJ fixtures from disk and compose a full scene without a GPU.

use std::fs;
use std::path::Path;

use ringfield::assets::{AssetLoader, GeometryPool};
use ringfield::layout::{self, RING_COUNT};
use ringfield::scene::{CenterpieceKind, SceneComposer};
use ringfield::RingfieldError;

const TETRAHEDRON: &str = "\
v 0 0 0
v 1 0 0
v 0 1 0
v 0 0 1
f 1 3 2
f 1 2 4
f 1 4 3
f 2 3 4
";

const QUAD: &str = "\
v -1 -1 0
v 1 -1 0
v 1 1 0
v -1 1 0
f 1 2 3 4
";

fn write_fixture(dir: &Path, name: &str, body: &str) {
    fs::write(dir.join(format!("{name}.obj")), body).unwrap();
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| (*s).to_owned()).collect()
}

#[test]
fn loads_and_composes_ten_rings_and_a_centerpiece() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path(), "tetra", TETRAHEDRON);
    write_fixture(dir.path(), "quad", QUAD);

    let loader = AssetLoader::new(dir.path(), names(&["tetra", "quad"]));
    let pending = loader.spawn().unwrap();
    let pool = pending.wait();
    assert_eq!(pool.names(), vec!["tetra", "quad"]);

    let scene = SceneComposer::seeded(Some(42)).compose(&pool).unwrap();
    assert_eq!(scene.rings.len(), RING_COUNT);
    assert_eq!(scene.drawable_count(), RING_COUNT + 1);
    assert!((0.5..1.0).contains(&scene.base_hue));
    assert!(CenterpieceKind::ALL.contains(&scene.centerpiece.kind));

    let mut expected_instances = 1;
    for (i, ring) in scene.rings.iter().enumerate() {
        let i = i as u32;
        assert_eq!(ring.spec.index, i);
        assert_eq!(ring.instances.len() as u32, layout::instance_count(i));
        expected_instances += ring.instances.len();

        // Slots wrap onto the two loaded assets
        let slot = ring.kind.ordinal() % pool.len();
        assert!(std::sync::Arc::ptr_eq(&ring.geometry, pool.get(slot).unwrap()));
    }
    assert_eq!(scene.instance_count(), expected_instances);
}

#[test]
fn same_seed_gives_same_scene() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path(), "tetra", TETRAHEDRON);
    let pool = AssetLoader::new(dir.path(), names(&["tetra"]))
        .load_blocking()
        .unwrap();

    let a = SceneComposer::seeded(Some(7)).compose(&pool).unwrap();
    let b = SceneComposer::seeded(Some(7)).compose(&pool).unwrap();
    assert_eq!(a.base_hue, b.base_hue);
    assert_eq!(a.centerpiece.kind, b.centerpiece.kind);
    let kinds = |s: &ringfield::scene::ComposedScene| {
        s.rings.iter().map(|r| r.kind).collect::<Vec<_>>()
    };
    assert_eq!(kinds(&a), kinds(&b));
}

#[test]
fn missing_files_leave_an_empty_pool_that_cannot_compose() {
    let dir = tempfile::tempdir().unwrap();
    let pool = AssetLoader::new(dir.path(), names(&["absent", "also_absent"]))
        .load_blocking()
        .unwrap();
    assert!(pool.is_empty());

    let result = SceneComposer::seeded(Some(1)).compose(&pool);
    assert!(matches!(result, Err(RingfieldError::EmptyGeometryPool)));
}

#[test]
fn partial_failures_still_compose() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path(), "quad", QUAD);
    fs::write(dir.path().join("broken.obj"), "this is not an obj\n").unwrap();

    let pool = AssetLoader::new(dir.path(), names(&["broken", "quad", "absent"]))
        .load_blocking()
        .unwrap();
    assert_eq!(pool.names(), vec!["quad"]);

    let scene = SceneComposer::seeded(None).compose(&pool).unwrap();
    assert!(scene.rings.iter().all(|r| r.geometry.name == "quad"));
}

#[test]
fn empty_pool_value_is_rejected() {
    let pool = GeometryPool::new(Vec::new());
    assert!(SceneComposer::seeded(Some(3)).compose(&pool).is_err());
}
