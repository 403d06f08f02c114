//! End-to-end generation: random insertion followed by budgeted thinning.

use pastey::paste;
use rand::SeedableRng;
use rand::rngs::StdRng;
use sweepmesh::core::builder::{
    GenerationError, MeshConfigBuilder, generate_mesh, generate_mesh_seeded, removal_budget,
};
use sweepmesh::core::util::{validate_mesh, validate_visible_connectivity};

fn init_tracing() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

macro_rules! gen_density_test {
    ($density:literal, $extent:literal, $vertices:literal, $seed:literal) => {
        paste! {
            #[test]
            fn [<test_generate_density_ $density>]() {
                init_tracing();
                let config = MeshConfigBuilder::default()
                    .extent($extent)
                    .vertex_count($vertices)
                    .edge_density($density)
                    .build()
                    .unwrap();
                let (mesh, stats) = generate_mesh_seeded(&config, $seed).unwrap();

                assert_eq!(stats.vertices, $vertices);
                assert_eq!(stats.removal_budget, removal_budget(stats.edges, $vertices, $density));
                assert!(stats.hidden_edges <= stats.removal_budget);
                assert_eq!(
                    stats.insertion_attempts,
                    stats.vertices + stats.rejected_insertions
                );
                // Never below a spanning tree.
                assert!(stats.edges - stats.hidden_edges >= $vertices - 1);
                assert_eq!(validate_mesh(&mesh), Ok(()));
                assert_eq!(validate_visible_connectivity(&mesh), Ok(()));
            }
        }
    };
}

gen_density_test!(1, 60, 50, 1);
gen_density_test!(3, 60, 50, 2);
gen_density_test!(5, 80, 80, 3);
gen_density_test!(8, 40, 30, 4);
gen_density_test!(10, 40, 30, 5);

#[test]
fn test_sparser_density_hides_at_least_as_many_edges() {
    init_tracing();
    let build = |density| {
        MeshConfigBuilder::default()
            .extent(50)
            .vertex_count(40)
            .edge_density(density)
            .build()
            .unwrap()
    };
    // Same seed, same insertion sequence; only the budget differs.
    let (_, sparse) = generate_mesh_seeded(&build(2), 17).unwrap();
    let (_, dense) = generate_mesh_seeded(&build(9), 17).unwrap();
    assert_eq!(sparse.edges, dense.edges);
    assert_eq!(sparse.total_flips, dense.total_flips);
    assert!(sparse.removal_budget >= dense.removal_budget);
}

#[test]
fn test_crowded_extent_retries_rejected_points() {
    init_tracing();
    // 40 of 100 lattice points: repeated draws are all but certain.
    let config = MeshConfigBuilder::default()
        .extent(10)
        .vertex_count(40)
        .build()
        .unwrap();
    let (mesh, stats) = generate_mesh_seeded(&config, 21).unwrap();
    assert_eq!(mesh.number_of_vertices(), 40);
    assert!(stats.rejected_insertions > 0);
    assert_eq!(stats.insertion_attempts, 40 + stats.rejected_insertions);
    assert_eq!(validate_mesh(&mesh), Ok(()));
}

#[test]
fn test_generate_with_caller_rng() {
    init_tracing();
    let config = MeshConfigBuilder::default().extent(30).build().unwrap();
    let mut rng = StdRng::seed_from_u64(99);
    let (mesh, stats) = generate_mesh(&config, &mut rng).unwrap();
    assert_eq!(mesh.number_of_vertices(), 30);
    assert_eq!(mesh.extent(), 30);
    assert!(stats.average_flips_per_vertex() >= 0.0);
}

#[test]
fn test_invalid_config_converts_into_generation_error() {
    let result: Result<(), GenerationError> = (|| {
        let config = MeshConfigBuilder::default().extent(0).build()?;
        generate_mesh_seeded(&config, 0)?;
        Ok(())
    })();
    assert!(matches!(result, Err(GenerationError::InvalidConfig(_))));
}
