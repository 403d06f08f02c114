//! Validation helpers for meshes.

pub mod mesh_validation;

pub use mesh_validation::*;
