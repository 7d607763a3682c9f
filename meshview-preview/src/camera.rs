//! Perspective camera for the preview scene

use nalgebra::{Matrix4, Perspective3, Point3, Vector3};

/// A look-at camera with an optional automatic aspect ratio
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    /// Vertical field of view in radians
    pub fov: f32,
    pub aspect_ratio: f32,
    /// Follow the viewport's aspect ratio on resize
    pub auto_aspect_ratio: bool,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(
        position: Point3<f32>,
        target: Point3<f32>,
        up: Vector3<f32>,
        fov: f32,
        aspect_ratio: f32,
        near: f32,
        far: f32,
    ) -> Self {
        Self {
            position,
            target,
            up,
            fov,
            aspect_ratio,
            auto_aspect_ratio: true,
            near,
            far,
        }
    }

    /// Get the view matrix
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Get the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        let perspective = Perspective3::new(self.aspect_ratio, self.fov, self.near, self.far);
        perspective.into_inner()
    }

    pub fn set_position(&mut self, position: Point3<f32>) {
        self.position = position;
    }

    pub fn look_at(&mut self, target: Point3<f32>) {
        self.target = target;
    }

    /// Near clip distance; kept strictly positive and below the far plane
    pub fn set_near_clip_distance(&mut self, near: f32) {
        self.near = near.max(f32::EPSILON);
        if self.far <= self.near {
            self.far = self.near * 2.0;
        }
    }

    pub fn set_far_clip_distance(&mut self, far: f32) {
        self.far = far.max(self.near * 2.0);
    }

    /// Track the viewport size when the aspect ratio is automatic
    pub fn set_viewport_size(&mut self, width: u32, height: u32) {
        if self.auto_aspect_ratio && width > 0 && height > 0 {
            self.aspect_ratio = width as f32 / height as f32;
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(
            Point3::new(0.0, 0.0, 500.0),
            Point3::origin(),
            Vector3::y(),
            std::f32::consts::FRAC_PI_4,
            4.0 / 3.0,
            0.1,
            100_000.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_auto_aspect_follows_viewport() {
        let mut camera = Camera::default();
        camera.set_viewport_size(800, 400);
        assert_relative_eq!(camera.aspect_ratio, 2.0);

        camera.auto_aspect_ratio = false;
        camera.set_viewport_size(400, 400);
        assert_relative_eq!(camera.aspect_ratio, 2.0);
    }

    #[test]
    fn test_clip_planes_stay_ordered() {
        let mut camera = Camera::default();
        camera.set_far_clip_distance(0.0);
        assert!(camera.far > camera.near);

        camera.set_near_clip_distance(-1.0);
        assert!(camera.near > 0.0);
    }

    #[test]
    fn test_view_matrix_maps_target_in_front() {
        let camera = Camera::default();
        let target = camera.view_matrix().transform_point(&camera.target);
        assert_relative_eq!(target.z, -500.0, epsilon = 1e-3);
    }
}
