//! Geometric utility functions.
//!
//! Currently this is the random sampling used both to place vertices and to
//! pick the neighborhood where edge thinning starts.

pub mod point_generation;

pub use point_generation::*;
