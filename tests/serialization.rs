//! Serialization round trips for mesh snapshots, configurations and
//! generation statistics.

use sweepmesh::core::builder::{GenerationStats, MeshConfig, MeshConfigBuilder, generate_mesh_seeded};
use sweepmesh::core::snapshot::{EdgeRecord, MeshSnapshot};
use sweepmesh::prelude::*;

fn sample_mesh() -> Mesh {
    let mut mesh = Mesh::new(40);
    for (x, y) in [(0, 0), (9, 1), (2, 8), (10, 10), (5, 4), (-6, 3)] {
        mesh.add_vertex(Point::new(x, y)).unwrap();
    }
    let key = mesh.vertex_key_at(5, 4).unwrap();
    mesh.set_vertex_z(key, -12);
    mesh
}

#[test]
fn test_snapshot_json_round_trip() {
    let mesh = sample_mesh();
    let snapshot = mesh.snapshot();

    let json = serde_json::to_string(&snapshot).unwrap();
    let restored: MeshSnapshot = serde_json::from_str(&json).unwrap();

    assert_eq!(restored, snapshot);
    // Point equality ignores z, so compare heights separately.
    let heights: Vec<i64> = snapshot.vertices.iter().map(Point::z).collect();
    let restored_heights: Vec<i64> = restored.vertices.iter().map(Point::z).collect();
    assert_eq!(restored_heights, heights);
    assert!(heights.contains(&-12));
}

#[test]
fn test_snapshot_json_shape() {
    let mut mesh = Mesh::new(10);
    for (x, y) in [(0, 0), (3, 0), (0, 3)] {
        mesh.add_vertex(Point::new(x, y)).unwrap();
    }
    let value = serde_json::to_value(mesh.snapshot()).unwrap();

    assert_eq!(value["extent"], 10);
    assert_eq!(value["total_flips"], 0);
    assert_eq!(value["vertices"].as_array().unwrap().len(), 3);
    assert_eq!(value["vertices"][0]["x"], 0);
    assert_eq!(value["triangles"].as_array().unwrap().len(), 1);
    assert_eq!(value["edges"][0]["boundary"], true);
    assert_eq!(value["edges"][0]["hidden"], false);
}

#[test]
fn test_point_height_defaults_to_zero() {
    let point: Point = serde_json::from_str(r#"{"x": 4, "y": -2}"#).unwrap();
    assert_eq!(point.xy(), (4, -2));
    assert_eq!(point.z(), 0);
}

#[test]
fn test_edge_record_round_trip() {
    let record = EdgeRecord {
        vertices: [2, 7],
        hidden: true,
        boundary: false,
    };
    let json = serde_json::to_string(&record).unwrap();
    assert_eq!(serde_json::from_str::<EdgeRecord>(&json).unwrap(), record);
}

#[test]
fn test_config_and_stats_round_trip() {
    let config = MeshConfigBuilder::default()
        .extent(30)
        .vertex_count(25)
        .edge_density(7)
        .build()
        .unwrap();
    let json = serde_json::to_string(&config).unwrap();
    assert_eq!(serde_json::from_str::<MeshConfig>(&json).unwrap(), config);

    let (_, stats) = generate_mesh_seeded(&config, 9).unwrap();
    let json = serde_json::to_string(&stats).unwrap();
    assert_eq!(serde_json::from_str::<GenerationStats>(&json).unwrap(), stats);
}
