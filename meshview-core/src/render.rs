//! The seam between the scene model and a concrete rendering engine
//!
//! The preview never talks to a graphics API directly. It owns a
//! [`RenderBackend`] obtained from a [`BackendBootstrap`] and pushes
//! geometry, materials and per-frame parameters through it.

use crate::{Colour, MeshData, PreviewMaterial, Result, TextureImage};
use nalgebra::{Matrix4, Point3, Vector3};

/// Identification of the backend that was selected at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendInfo {
    /// Graphics API, e.g. "Vulkan"
    pub api: String,
    /// Adapter (device) name
    pub adapter: String,
}

/// A light with parallel rays
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    /// Direction the light travels, normalized
    pub direction: Vector3<f32>,
    pub diffuse: Colour,
}

impl DirectionalLight {
    pub fn new(direction: Vector3<f32>, diffuse: Colour) -> Self {
        Self {
            direction: direction.try_normalize(f32::EPSILON).unwrap_or_else(|| -Vector3::y()),
            diffuse,
        }
    }
}

/// Fixed scene lighting: ambient term plus a key and a fill light
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneLighting {
    pub ambient: Colour,
    pub key: DirectionalLight,
    pub fill: DirectionalLight,
    /// Viewport clear colour
    pub background: Colour,
}

impl Default for SceneLighting {
    fn default() -> Self {
        Self {
            ambient: [0.4, 0.4, 0.4, 1.0],
            key: DirectionalLight::new(Vector3::new(-1.0, -1.5, -1.0), [1.0, 1.0, 1.0, 1.0]),
            fill: DirectionalLight::new(Vector3::new(1.0, 0.5, 1.0), [0.25, 0.25, 0.35, 1.0]),
            background: [0.08, 0.08, 0.10, 1.0],
        }
    }
}

/// Everything the backend needs to draw one frame
#[derive(Debug, Clone, Copy)]
pub struct FrameParams {
    pub view: Matrix4<f32>,
    pub projection: Matrix4<f32>,
    /// World transform of the mesh node
    pub model: Matrix4<f32>,
    pub camera_position: Point3<f32>,
    pub lighting: SceneLighting,
}

/// Engine operations driven by the render context.
///
/// All calls happen on the host UI thread.
pub trait RenderBackend {
    /// Describe the selected API and adapter
    fn info(&self) -> BackendInfo;

    /// Resize the render surface to the given pixel size
    fn resize(&mut self, width: u32, height: u32) -> Result<()>;

    /// Register the scene with the shader generator so lit variants exist
    fn register_scene(&mut self, lighting: &SceneLighting) -> Result<()>;

    /// Upload decoded texture pixels under `image.name`
    fn upload_texture(&mut self, image: &TextureImage) -> Result<()>;

    /// Build the GPU side of a material (shader variant, bindings)
    fn register_material(&mut self, material: &PreviewMaterial) -> Result<()>;

    /// Upload geometry; `materials[i]` is the material used for submesh `i`
    fn upload_mesh(&mut self, mesh: &MeshData, materials: &[String]) -> Result<()>;

    /// Drop uploaded geometry
    fn release_mesh(&mut self);

    /// Drop every texture and material registered since the last clear
    fn clear_group_resources(&mut self);

    /// Encode and submit one frame
    fn render_one_frame(&mut self, frame: &FrameParams) -> Result<()>;

    /// Present the frame submitted by [`RenderBackend::render_one_frame`]
    fn present(&mut self) -> Result<()>;

    /// Release engine resources. Must be safe to call more than once.
    fn shutdown(&mut self);
}

/// Creates a backend bound to a render surface.
///
/// Implementations decide where the surface comes from: an externally
/// owned window handle or a window the bootstrap creates itself.
pub trait BackendBootstrap {
    type Backend: RenderBackend;

    /// Select an API, bind the surface and return a ready backend
    fn start(&self, width: u32, height: u32) -> Result<Self::Backend>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_lights_are_normalized() {
        let lighting = SceneLighting::default();
        assert_relative_eq!(lighting.key.direction.norm(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(lighting.fill.direction.norm(), 1.0, epsilon = 1e-6);
        assert!(lighting.fill.diffuse[0] < lighting.key.diffuse[0]);
    }

    #[test]
    fn test_zero_direction_falls_back_to_down() {
        let light = DirectionalLight::new(Vector3::zeros(), [1.0; 4]);
        assert_eq!(light.direction, -Vector3::y());
    }
}
