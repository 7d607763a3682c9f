//! Core data structures and traits for meshview
//!
//! This crate provides the types shared by every part of the preview:
//! mesh geometry with per-submesh material names, preview material
//! descriptions, and the [`RenderBackend`] seam the scene drives.

pub mod error;
pub mod material;
pub mod mesh;
pub mod render;

pub use error::*;
pub use material::*;
pub use mesh::*;
pub use render::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Matrix4, Point3, UnitQuaternion, Vector3};

/// A 3D point with floating point coordinates
pub type Point3f = Point3<f32>;

/// A 3D vector with floating point components
pub type Vector3f = Vector3<f32>;
