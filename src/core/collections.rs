//! Collection aliases used throughout the mesh tables.
//!
//! Entity storage goes through [`StorageMap`] (a `slotmap::SlotMap`), so every
//! vertex, edge and triangle is addressed by a stable, typed key. Lookup indices
//! use [`FastHashMap`] / [`FastHashSet`], and short per-entity lists (the one or
//! two triangles owning an edge, the neighbors of a triangle) use
//! [`SmallBuffer`] to stay off the heap.

mod aliases;
mod helpers;

pub use aliases::*;
pub use helpers::*;
