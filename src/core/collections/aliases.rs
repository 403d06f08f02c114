use rustc_hash::{FxBuildHasher, FxHashMap, FxHashSet};
use slotmap::SlotMap;
use smallvec::SmallVec;

use crate::core::mesh::{EdgeKey, TriangleKey, VertexKey};

// =============================================================================
// STORAGE BACKEND
// =============================================================================

/// Internal storage backend for the mesh tables.
///
/// Keys stay valid until the entity they address is removed, which lets the
/// mesh replace every cross-reference of the vertex/edge/triangle graph with a
/// key lookup.
///
/// # Examples
///
/// ```rust
/// use sweepmesh::core::collections::StorageMap;
/// use sweepmesh::core::mesh::VertexKey;
///
/// let mut table: StorageMap<VertexKey, &str> = StorageMap::with_key();
/// let key = table.insert("a");
/// assert_eq!(table[key], "a");
/// ```
pub type StorageMap<K, V> = SlotMap<K, V>;

// =============================================================================
// CORE OPTIMIZED TYPES
// =============================================================================

/// Optimized `HashMap` type for performance-critical operations.
/// Uses `rustc_hash::FxHasher` for faster hashing in non-cryptographic contexts.
///
/// # Security Warning
///
/// Not DoS-resistant: do not use with attacker-controlled keys.
///
/// # Examples
///
/// ```rust
/// use sweepmesh::core::collections::FastHashMap;
///
/// let mut map: FastHashMap<(i64, i64), usize> = FastHashMap::default();
/// map.insert((3, -4), 7);
/// assert_eq!(map.get(&(3, -4)), Some(&7));
/// ```
pub type FastHashMap<K, V> = FxHashMap<K, V>;

/// Build hasher behind [`FastHashMap`] and [`FastHashSet`].
pub type FastBuildHasher = FxBuildHasher;

/// Re-export the Entry enum for `FastHashMap`.
pub use std::collections::hash_map::Entry;

/// Optimized `HashSet` type for performance-critical operations.
/// Uses `rustc_hash::FxHasher` for faster hashing in non-cryptographic contexts.
pub type FastHashSet<T> = FxHashSet<T>;

/// Small-optimized Vec that uses stack allocation for small collections.
///
/// # Size Guidelines
///
/// - **N=2**: triangles owning an edge (1 on the boundary, 2 in the interior)
/// - **N=3**: edge-adjacent neighbors of a triangle
/// - **N=4**: replacement triangles produced by a split
/// - **N=16**: incident edges of a vertex
///
/// # Examples
///
/// ```rust
/// use sweepmesh::core::collections::SmallBuffer;
///
/// let mut buffer: SmallBuffer<i32, 4> = SmallBuffer::new();
/// buffer.extend([1, 2, 3]);
/// assert!(!buffer.spilled());
/// ```
pub type SmallBuffer<T, const N: usize> = SmallVec<[T; N]>;

// =============================================================================
// SEMANTIC SIZE CONSTANTS AND TYPE ALIASES
// =============================================================================

/// Inline capacity for per-vertex edge lists. Planar triangulations average
/// fewer than six incident edges per vertex.
pub const VERTEX_DEGREE_BUFFER_SIZE: usize = 16;

/// Triangles owning a single edge.
pub type EdgeTriangleBuffer = SmallBuffer<TriangleKey, 2>;

/// Edge-adjacent neighbors of a single triangle.
pub type NeighborBuffer = SmallBuffer<TriangleKey, 3>;

/// Triangles removed by one split: the located triangle, plus its neighbor
/// when the new vertex lies on their shared side.
pub type RemovedTriangleBuffer = SmallBuffer<TriangleKey, 2>;

/// Incident edges of one vertex, in traversal order.
pub type IncidentEdgeBuffer = SmallBuffer<EdgeKey, VERTEX_DEGREE_BUFFER_SIZE>;

/// Set of vertex keys, used for visited sets in graph searches.
pub type VertexKeySet = FastHashSet<VertexKey>;

/// Set of edge keys, used for visited sets in edge-graph searches.
pub type EdgeKeySet = FastHashSet<EdgeKey>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_map_keys_survive_unrelated_removals() {
        let mut table: StorageMap<VertexKey, i32> = StorageMap::with_key();
        let a = table.insert(1);
        let b = table.insert(2);
        table.remove(a);
        assert_eq!(table[b], 2);
        assert!(table.get(a).is_none());
    }

    #[test]
    fn semantic_buffers_stay_inline_for_typical_sizes() {
        let mut table: StorageMap<TriangleKey, ()> = StorageMap::with_key();
        let mut owners = EdgeTriangleBuffer::new();
        owners.push(table.insert(()));
        owners.push(table.insert(()));
        assert!(!owners.spilled());

        let mut neighbors = NeighborBuffer::new();
        neighbors.extend(owners.iter().copied());
        assert_eq!(neighbors.len(), 2);
    }
}
