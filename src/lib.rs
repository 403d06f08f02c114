//! # sweepmesh
//!
//! Incremental planar triangulation of integer points, kept legal by
//! angle-sum edge flips, plus a thinning pass that hides edges while keeping
//! every vertex reachable over the edges that remain visible.
//!
//! # Features
//!
//! - Incremental insertion: points inside the mesh split their triangle,
//!   points on an edge split both neighbors, points outside attach to every
//!   boundary edge they can see.
//! - Flip legalization by the angle-sum test, which reduces to the
//!   empty-circumcircle test while every vertex height is zero.
//! - Connectivity-preserving edge thinning with per-edge memoization.
//! - Exact integer predicates for orientation, containment and crossings.
//! - Random mesh generation through a validated [`MeshConfig`](core::builder::MeshConfig).
//! - Serialization of mesh snapshots with [serde](https://serde.rs).
//!
//! # Basic Usage
//!
//! ```rust
//! use sweepmesh::prelude::*;
//!
//! let mut mesh = Mesh::new(100);
//! for (x, y) in [(0, 0), (10, 0), (0, 10), (10, 10), (4, 6)] {
//!     mesh.add_vertex(Point::new(x, y)).unwrap();
//! }
//!
//! assert_eq!(mesh.number_of_vertices(), 5);
//! assert_eq!(mesh.number_of_triangles(), 4);
//! assert!(mesh.is_valid().is_ok());
//!
//! // Duplicates are rejected and leave the mesh untouched.
//! assert_eq!(
//!     mesh.add_vertex(Point::new(4, 6)),
//!     Err(InsertionError::DuplicateCoordinates { x: 4, y: 6 })
//! );
//! ```
//!
//! # Thinning
//!
//! ```rust
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use sweepmesh::prelude::*;
//!
//! let mut grid = generate_grid_points(4, 4, 3).unwrap();
//! // Three collinear points cannot seed a mesh, so bring (3, 3) forward.
//! grid.swap(2, 5);
//!
//! let mut mesh = Mesh::new(50);
//! for point in grid {
//!     mesh.add_vertex(point).unwrap();
//! }
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let hidden = mesh.thin(&mut rng, None);
//!
//! // Thinning to completion leaves a spanning tree of visible edges.
//! assert_eq!(mesh.number_of_edges() - hidden, mesh.number_of_vertices() - 1);
//! assert!(mesh.is_visible_connected());
//! ```
//!
//! # Mesh Invariants
//!
//! [`Mesh::is_valid`](core::mesh::Mesh::is_valid) and the validators in
//! [`core::util`] check:
//!
//! - every edge is owned by one or two triangles, and the boundary list holds
//!   exactly the edges with one owner;
//! - vertices, edges and triangles agree about incidence, and the coordinate
//!   and endpoint indices are in sync;
//! - no triangle is degenerate and no vertex lies strictly inside a triangle;
//! - (right after construction) every interior edge passes the angle test;
//! - (during thinning) the visible edges connect every vertex.
//!
//! # Logging
//!
//! The crate emits [`tracing`] events and never installs a subscriber. Flip
//! counts, rejected insertions and thinning progress are logged at `debug`;
//! the legalization safety cap and exhausted generation attempts at `warn`.

// Allow multiple crate versions due to transitive dependencies
#![expect(clippy::multiple_crate_versions)]
#![forbid(unsafe_code)]

#[macro_use]
extern crate derive_builder;

/// Mesh tables, the algorithms that build and thin them, and validation.
pub mod core {
    /// Insertion, legalization, location and thinning.
    pub mod algorithms {
        /// Angle-sum flip legalization.
        pub mod flips;
        /// Vertex insertion: seed, split and outside attachment.
        pub mod incremental_insertion;
        /// Point location by linear scan.
        pub mod locate;
        /// Connectivity-preserving edge hiding.
        pub mod thinning;
    }
    pub mod builder;
    /// Collection aliases used by the mesh tables
    pub mod collections;
    pub mod edge;
    pub mod mesh;
    pub mod snapshot;
    pub mod triangle;
    pub mod util;
    pub mod vertex;

    pub use edge::*;
    pub use mesh::*;
    pub use snapshot::*;
    pub use triangle::*;
    pub use util::*;
    pub use vertex::*;
    // Note: collections module not re-exported here to avoid namespace pollution
}

/// Integer points, exact predicates and point sampling.
pub mod geometry {
    pub mod point;
    pub mod predicates;
    /// Random and grid point generation
    pub mod util;

    pub use point::*;
    pub use predicates::*;
    pub use util::*;
}

/// A prelude module that re-exports commonly used types.
pub mod prelude {
    pub use crate::core::{
        algorithms::{
            flips::{add_and_flip_triangle, is_locally_legal},
            incremental_insertion::{InsertionError, split_triangle},
            locate::{LocateResult, adjacent_triangle, locate},
            thinning::{can_remove_edge, hide_edge_near, hide_random_edge},
        },
        builder::*,
        edge::*,
        mesh::*,
        snapshot::*,
        triangle::*,
        util::*,
        vertex::*,
    };

    pub use crate::core::collections::{
        FastHashMap, FastHashSet, SmallBuffer, fast_hash_map_with_capacity,
        fast_hash_set_with_capacity,
    };

    pub use crate::geometry::{point::*, predicates::*, util::*};
}

/// The function `is_normal` checks that structs implement `auto` traits.
/// Traits are checked at compile time, so this function is only used for
/// testing.
#[must_use]
pub const fn is_normal<T: Sized + Send + Sync + Unpin>() -> bool {
    true
}

// =============================================================================
// TESTS
// =============================================================================
