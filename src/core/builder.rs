//! Random mesh generation.
//!
//! [`generate_mesh`] drives the full pipeline described by a [`MeshConfig`]:
//! sample random points in the extent and insert them until the target
//! vertex count is reached, then hide edges up to a budget derived from the
//! requested edge density.
//!
//! # Examples
//!
//! ```rust
//! use sweepmesh::core::builder::{MeshConfigBuilder, generate_mesh_seeded};
//!
//! let config = MeshConfigBuilder::default()
//!     .extent(40)
//!     .vertex_count(30)
//!     .edge_density(3)
//!     .build()
//!     .unwrap();
//!
//! let (mesh, stats) = generate_mesh_seeded(&config, 7).unwrap();
//! assert_eq!(mesh.number_of_vertices(), 30);
//! assert_eq!(stats.hidden_edges, mesh.number_of_hidden_edges());
//! assert!(mesh.is_visible_connected());
//! ```

#![forbid(unsafe_code)]

use derive_builder::UninitializedFieldError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::mesh::Mesh;
use crate::geometry::util::random_point_in_extent;

/// Largest accepted extent. Sampled coordinates then stay within
/// [`MAX_COORDINATE`].
pub const MAX_EXTENT: i64 = 1 << 30;

/// Largest coordinate magnitude a mesh accepts. Coordinate spans stay within
/// `2^30`, which keeps every predicate's intermediate products exact in
/// `i128`.
pub const MAX_COORDINATE: i64 = MAX_EXTENT / 2;

/// Insertion attempts allowed per requested vertex when
/// [`MeshConfig::max_insertion_attempts`] is not set.
pub const DEFAULT_ATTEMPTS_PER_VERTEX: usize = 1000;

/// Default [`MeshConfig::edge_density`].
pub const DEFAULT_EDGE_DENSITY: u8 = 5;

// =============================================================================
// ERRORS
// =============================================================================

/// Errors raised while building a [`MeshConfig`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum MeshConfigError {
    /// A required field was never set.
    #[error("Missing required field `{field}`")]
    MissingField {
        /// The field name.
        field: &'static str,
    },
    /// The extent is outside `2..=MAX_EXTENT`.
    #[error("Extent {extent} is out of range 2..={max}", max = MAX_EXTENT)]
    ExtentOutOfRange {
        /// The rejected extent.
        extent: i64,
    },
    /// The vertex count is below 3 or exceeds the number of grid positions.
    #[error("Vertex count {vertex_count} is out of range 3..={capacity}")]
    VertexCountOutOfRange {
        /// The rejected count.
        vertex_count: usize,
        /// Distinct integer positions inside the extent.
        capacity: usize,
    },
    /// The edge density is outside `1..=10`.
    #[error("Edge density {edge_density} is out of range 1..=10")]
    EdgeDensityOutOfRange {
        /// The rejected density.
        edge_density: u8,
    },
    /// Zero insertion attempts were allowed.
    #[error("At least one insertion attempt is required")]
    NoInsertionAttempts,
}

impl From<UninitializedFieldError> for MeshConfigError {
    fn from(error: UninitializedFieldError) -> Self {
        Self::MissingField {
            field: error.field_name(),
        }
    }
}

/// Errors raised by [`generate_mesh`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum GenerationError {
    /// The configuration is invalid.
    #[error(transparent)]
    InvalidConfig(#[from] MeshConfigError),
    /// Random insertion ran out of attempts before placing every vertex.
    #[error("Placed {placed} of {target} vertices before exhausting {attempts} insertion attempts")]
    AttemptsExhausted {
        /// Vertices placed.
        placed: usize,
        /// Vertices requested.
        target: usize,
        /// Attempts made.
        attempts: usize,
    },
}

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Parameters for [`generate_mesh`].
///
/// Only `extent` is required. `vertex_count` defaults to the extent, and
/// `max_insertion_attempts` to [`DEFAULT_ATTEMPTS_PER_VERTEX`] per vertex.
#[derive(Builder, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[builder(build_fn(validate = "Self::validate", error = "MeshConfigError"))]
pub struct MeshConfig {
    /// Side length of the square coordinate domain.
    extent: i64,
    /// Number of vertices to place.
    #[builder(default = "self.default_vertex_count()")]
    vertex_count: usize,
    /// 1 (sparse) to 10 (dense).
    #[builder(default = "DEFAULT_EDGE_DENSITY")]
    edge_density: u8,
    /// Upper bound on random insertion attempts.
    #[builder(default = "self.default_max_insertion_attempts()")]
    max_insertion_attempts: usize,
}

impl MeshConfigBuilder {
    fn default_vertex_count(&self) -> usize {
        self.extent
            .and_then(|extent| usize::try_from(extent).ok())
            .unwrap_or(0)
    }

    fn default_max_insertion_attempts(&self) -> usize {
        self.vertex_count
            .unwrap_or_else(|| self.default_vertex_count())
            .saturating_mul(DEFAULT_ATTEMPTS_PER_VERTEX)
    }

    fn validate(&self) -> Result<(), MeshConfigError> {
        let extent = self
            .extent
            .ok_or(MeshConfigError::MissingField { field: "extent" })?;
        if !(2..=MAX_EXTENT).contains(&extent) {
            return Err(MeshConfigError::ExtentOutOfRange { extent });
        }

        let capacity = usize::try_from(extent)
            .ok()
            .and_then(|side| side.checked_mul(side))
            .unwrap_or(usize::MAX);
        let vertex_count = self
            .vertex_count
            .unwrap_or_else(|| self.default_vertex_count());
        if !(3..=capacity).contains(&vertex_count) {
            return Err(MeshConfigError::VertexCountOutOfRange {
                vertex_count,
                capacity,
            });
        }

        if let Some(edge_density) = self.edge_density
            && !(1..=10).contains(&edge_density)
        {
            return Err(MeshConfigError::EdgeDensityOutOfRange { edge_density });
        }
        if self.max_insertion_attempts == Some(0) {
            return Err(MeshConfigError::NoInsertionAttempts);
        }
        Ok(())
    }
}

impl MeshConfig {
    /// Side length of the square coordinate domain.
    #[must_use]
    pub const fn extent(&self) -> i64 {
        self.extent
    }

    /// Number of vertices to place.
    #[must_use]
    pub const fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Requested edge density, 1..=10.
    #[must_use]
    pub const fn edge_density(&self) -> u8 {
        self.edge_density
    }

    /// Upper bound on random insertion attempts.
    #[must_use]
    pub const fn max_insertion_attempts(&self) -> usize {
        self.max_insertion_attempts
    }
}

// =============================================================================
// GENERATION
// =============================================================================

/// Summary of one [`generate_mesh`] run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Vertices placed.
    pub vertices: usize,
    /// Edges in the triangulation, hidden ones included.
    pub edges: usize,
    /// Edges hidden by thinning.
    pub hidden_edges: usize,
    /// Flips performed during insertion.
    pub total_flips: usize,
    /// Edges thinning was allowed to hide.
    pub removal_budget: usize,
    /// Random points drawn, rejected ones included.
    pub insertion_attempts: usize,
    /// Drawn points the mesh rejected and that were retried.
    pub rejected_insertions: usize,
}

impl GenerationStats {
    /// Mean flips per placed vertex.
    #[must_use]
    #[expect(
        clippy::cast_precision_loss,
        reason = "counts are far below 2^53"
    )]
    pub fn average_flips_per_vertex(&self) -> f64 {
        if self.vertices == 0 {
            return 0.0;
        }
        self.total_flips as f64 / self.vertices as f64
    }
}

/// Number of edges thinning may hide for a mesh with `edges` edges and
/// `vertex_count` vertices: `ceil((edges - vertex_count) / 10 * (11 - edge_density))`.
///
/// Saturates at zero when there are no more edges than vertices. Densities
/// above 10 are treated as 10.
///
/// # Examples
///
/// ```rust
/// use sweepmesh::core::builder::removal_budget;
///
/// assert_eq!(removal_budget(25, 10, 5), 9);
/// assert_eq!(removal_budget(25, 10, 10), 2);
/// assert_eq!(removal_budget(25, 10, 1), 15);
/// assert_eq!(removal_budget(8, 10, 5), 0);
/// ```
#[must_use]
pub fn removal_budget(edges: usize, vertex_count: usize, edge_density: u8) -> usize {
    let excess = edges.saturating_sub(vertex_count);
    let weight = usize::from(11_u8.saturating_sub(edge_density.min(10)));
    excess.saturating_mul(weight).div_ceil(10)
}

/// Builds and thins a random mesh.
///
/// # Errors
///
/// Returns [`GenerationError::AttemptsExhausted`] if fewer than
/// `vertex_count` points could be inserted within `max_insertion_attempts`
/// draws.
pub fn generate_mesh<R: Rng + ?Sized>(
    config: &MeshConfig,
    rng: &mut R,
) -> Result<(Mesh, GenerationStats), GenerationError> {
    let target = config.vertex_count;
    let mut mesh = Mesh::with_capacity(config.extent, target);

    let mut attempts = 0;
    let mut rejected = 0;
    while mesh.number_of_vertices() < target {
        if attempts == config.max_insertion_attempts {
            tracing::warn!(
                placed = mesh.number_of_vertices(),
                target,
                attempts,
                "mesh generation ran out of insertion attempts"
            );
            return Err(GenerationError::AttemptsExhausted {
                placed: mesh.number_of_vertices(),
                target,
                attempts,
            });
        }
        attempts += 1;
        if let Err(err) = mesh.add_vertex(random_point_in_extent(rng, config.extent)) {
            rejected += 1;
            tracing::trace!(%err, attempts, "insertion rejected; drawing another point");
        }
    }

    let edges = mesh.number_of_edges();
    let budget = removal_budget(edges, target, config.edge_density);
    let hidden = mesh.thin(rng, Some(budget));

    let stats = GenerationStats {
        vertices: mesh.number_of_vertices(),
        edges,
        hidden_edges: hidden,
        total_flips: mesh.total_flips(),
        removal_budget: budget,
        insertion_attempts: attempts,
        rejected_insertions: rejected,
    };
    tracing::debug!(?stats, "generated mesh");
    Ok((mesh, stats))
}

/// [`generate_mesh`] with a [`StdRng`] seeded from `seed`.
///
/// # Errors
///
/// See [`generate_mesh`].
pub fn generate_mesh_seeded(
    config: &MeshConfig,
    seed: u64,
) -> Result<(Mesh, GenerationStats), GenerationError> {
    let mut rng = StdRng::seed_from_u64(seed);
    generate_mesh(config, &mut rng)
}
