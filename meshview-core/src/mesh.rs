//! Mesh data structures and functionality

use crate::{Point3f, Vector3f};
use serde::{Deserialize, Serialize};

/// One drawable part of a mesh, rendered with a single material
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubMesh {
    /// Material name as declared by the mesh file
    pub material_name: String,
    pub positions: Vec<Point3f>,
    pub normals: Option<Vec<Vector3f>>,
    pub uvs: Option<Vec<[f32; 2]>>,
    /// Triangle list indices into `positions`
    pub indices: Vec<u32>,
}

impl SubMesh {
    /// Create an empty submesh using the given material
    pub fn new(material_name: impl Into<String>) -> Self {
        Self {
            material_name: material_name.into(),
            positions: Vec::new(),
            normals: None,
            uvs: None,
            indices: Vec::new(),
        }
    }

    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Get the number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check if the submesh has nothing to draw
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() || self.indices.len() < 3
    }

    /// Compute area-weighted vertex normals from triangle winding
    pub fn compute_smooth_normals(&mut self) {
        let mut normals = vec![Vector3f::zeros(); self.positions.len()];

        for tri in self.indices.chunks_exact(3) {
            let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            if a >= normals.len() || b >= normals.len() || c >= normals.len() {
                continue;
            }
            let v0 = self.positions[a];
            let v1 = self.positions[b];
            let v2 = self.positions[c];
            let face = (v1 - v0).cross(&(v2 - v0));
            normals[a] += face;
            normals[b] += face;
            normals[c] += face;
        }

        for n in &mut normals {
            *n = n.try_normalize(f32::EPSILON).unwrap_or_else(Vector3f::y);
        }

        self.normals = Some(normals);
    }

    /// Bounding box of this submesh's vertices
    pub fn bounding_box(&self) -> Aabb {
        let mut aabb = Aabb::empty();
        for p in &self.positions {
            aabb.extend(p);
        }
        aabb
    }
}

/// A mesh loaded from disk: a named list of submeshes
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MeshData {
    pub name: String,
    pub submeshes: Vec<SubMesh>,
}

impl MeshData {
    /// Create a new empty mesh
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            submeshes: Vec::new(),
        }
    }

    /// Total vertex count across submeshes
    pub fn vertex_count(&self) -> usize {
        self.submeshes.iter().map(SubMesh::vertex_count).sum()
    }

    /// Total triangle count across submeshes
    pub fn triangle_count(&self) -> usize {
        self.submeshes.iter().map(SubMesh::triangle_count).sum()
    }

    /// Check if the mesh has no drawable geometry
    pub fn is_empty(&self) -> bool {
        self.submeshes.iter().all(SubMesh::is_empty)
    }

    /// Axis-aligned bounding box over every submesh
    pub fn bounding_box(&self) -> Aabb {
        self.submeshes
            .iter()
            .fold(Aabb::empty(), |acc, sub| acc.merged(&sub.bounding_box()))
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Point3f,
    pub max: Point3f,
}

impl Aabb {
    /// An inverted box that any point will grow
    pub fn empty() -> Self {
        Self {
            min: Point3f::new(f32::INFINITY, f32::INFINITY, f32::INFINITY),
            max: Point3f::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
        }
    }

    pub fn from_min_max(min: Point3f, max: Point3f) -> Self {
        Self { min, max }
    }

    /// Whether the box contains at least one point
    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
    }

    /// Grow the box to include `p`
    pub fn extend(&mut self, p: &Point3f) {
        self.min = self.min.inf(p);
        self.max = self.max.sup(p);
    }

    /// Union of two boxes
    pub fn merged(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    pub fn center(&self) -> Point3f {
        if !self.is_valid() {
            return Point3f::origin();
        }
        nalgebra::center(&self.min, &self.max)
    }

    pub fn size(&self) -> Vector3f {
        if !self.is_valid() {
            return Vector3f::zeros();
        }
        self.max - self.min
    }

    /// Length of the box diagonal
    pub fn diameter(&self) -> f64 {
        let s = self.size();
        let (x, y, z) = (s.x as f64, s.y as f64, s.z as f64);
        (x * x + y * y + z * z).sqrt()
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_quad(material: &str) -> SubMesh {
        let mut sub = SubMesh::new(material);
        sub.positions = vec![
            Point3f::new(0.0, 0.0, 0.0),
            Point3f::new(1.0, 0.0, 0.0),
            Point3f::new(1.0, 1.0, 0.0),
            Point3f::new(0.0, 1.0, 0.0),
        ];
        sub.indices = vec![0, 1, 2, 2, 3, 0];
        sub
    }

    #[test]
    fn test_empty_box_has_zero_diameter() {
        let aabb = Aabb::empty();
        assert!(!aabb.is_valid());
        assert_eq!(aabb.diameter(), 0.0);
        assert_eq!(aabb.center(), Point3f::origin());
    }

    #[test]
    fn test_mesh_bounding_box_spans_submeshes() {
        let mut mesh = MeshData::new("two");
        let mut far = unit_quad("b");
        for p in &mut far.positions {
            p.z = 2.0;
        }
        mesh.submeshes.push(unit_quad("a"));
        mesh.submeshes.push(far);

        let aabb = mesh.bounding_box();
        assert_eq!(aabb.min, Point3f::new(0.0, 0.0, 0.0));
        assert_eq!(aabb.max, Point3f::new(1.0, 1.0, 2.0));
        assert_relative_eq!(aabb.diameter(), 6.0f64.sqrt(), epsilon = 1e-6);
        assert_eq!(aabb.center(), Point3f::new(0.5, 0.5, 1.0));
    }

    #[test]
    fn test_smooth_normals_follow_winding() {
        let mut sub = unit_quad("a");
        sub.compute_smooth_normals();
        let normals = sub.normals.unwrap();
        assert_eq!(normals.len(), 4);
        for n in normals {
            assert_relative_eq!(n.z, 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_counts() {
        let mut mesh = MeshData::new("q");
        mesh.submeshes.push(unit_quad("a"));
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        assert!(!mesh.is_empty());
    }
}
