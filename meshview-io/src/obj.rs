//! OBJ format support
//!
//! Each distinct `usemtl` name becomes one submesh, in first-seen order,
//! so the declared material names survive even when the `.mtl` library
//! is missing.

use crate::{IoError, MeshReader};
use meshview_core::{MeshData, Point3f, Result, SubMesh, Vector3f};
use obj::{IndexTuple, ObjData, ObjMaterial};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Material name used for faces that precede any `usemtl`
pub const DEFAULT_MATERIAL: &str = "BaseWhite";

pub struct ObjReader;

impl MeshReader for ObjReader {
    fn read_mesh(&self, path: &Path) -> Result<MeshData> {
        let file = File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => IoError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => IoError::Io(e),
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        read_obj_from(BufReader::new(file), &name, &path.display().to_string())
    }

    fn format_name(&self) -> &'static str {
        "Wavefront OBJ"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["obj"]
    }
}

/// Parse OBJ text from any reader
pub fn read_obj_from<R: Read>(input: R, name: &str, origin: &str) -> Result<MeshData> {
    let data = ObjData::load_buf(input).map_err(|e| IoError::ParseError {
        path: origin.to_string(),
        message: e.to_string(),
    })?;
    Ok(obj_data_to_mesh(&data, name))
}

/// Per-submesh builder that welds identical index tuples
struct SubMeshBuilder {
    sub: SubMesh,
    uvs: Vec<[f32; 2]>,
    normals: Vec<Vector3f>,
    has_uvs: bool,
    has_normals: bool,
    welded: HashMap<(usize, Option<usize>, Option<usize>), u32>,
}

impl SubMeshBuilder {
    fn new(material: &str) -> Self {
        Self {
            sub: SubMesh::new(material),
            uvs: Vec::new(),
            normals: Vec::new(),
            has_uvs: true,
            has_normals: true,
            welded: HashMap::new(),
        }
    }

    fn vertex(&mut self, data: &ObjData, tuple: &IndexTuple) -> Option<u32> {
        let IndexTuple(p, t, n) = tuple;
        let (p, t, n) = (*p, *t, *n);
        let key = (p, t, n);
        if let Some(&index) = self.welded.get(&key) {
            return Some(index);
        }

        let position = data.position.get(p)?;
        let index = self.sub.positions.len() as u32;
        self.sub.positions.push(Point3f::new(position[0], position[1], position[2]));

        match t.and_then(|t| data.texture.get(t)) {
            // OBJ has its texture origin bottom-left
            Some(uv) => self.uvs.push([uv[0], 1.0 - uv[1]]),
            None => {
                self.has_uvs = false;
                self.uvs.push([0.0, 0.0]);
            }
        }
        match n.and_then(|n| data.normal.get(n)) {
            Some(nrm) => self.normals.push(Vector3f::new(nrm[0], nrm[1], nrm[2])),
            None => {
                self.has_normals = false;
                self.normals.push(Vector3f::zeros());
            }
        }

        self.welded.insert(key, index);
        Some(index)
    }

    fn finish(mut self) -> SubMesh {
        if self.has_uvs {
            self.sub.uvs = Some(self.uvs);
        }
        if self.has_normals {
            self.sub.normals = Some(self.normals);
        } else {
            self.sub.compute_smooth_normals();
        }
        self.sub
    }
}

fn material_name(material: &Option<ObjMaterial>) -> String {
    match material {
        Some(ObjMaterial::Ref(name)) => name.clone(),
        Some(ObjMaterial::Mtl(mtl)) => mtl.name.clone(),
        None => DEFAULT_MATERIAL.to_string(),
    }
}

/// Convert parsed OBJ data into submeshes keyed by material name
pub fn obj_data_to_mesh(data: &ObjData, name: &str) -> MeshData {
    let mut order: Vec<String> = Vec::new();
    let mut builders: HashMap<String, SubMeshBuilder> = HashMap::new();
    let mut skipped = 0usize;

    for object in &data.objects {
        for group in &object.groups {
            let material = material_name(&group.material);
            if !builders.contains_key(&material) {
                order.push(material.clone());
                builders.insert(material.clone(), SubMeshBuilder::new(&material));
            }
            let Some(builder) = builders.get_mut(&material) else {
                continue;
            };

            for poly in &group.polys {
                let corners: Vec<u32> = poly
                    .0
                    .iter()
                    .filter_map(|tuple| builder.vertex(data, tuple))
                    .collect();
                if corners.len() != poly.0.len() || corners.len() < 3 {
                    skipped += 1;
                    continue;
                }
                // Fan triangulation
                for i in 1..corners.len() - 1 {
                    builder.sub.indices.extend_from_slice(&[corners[0], corners[i], corners[i + 1]]);
                }
            }
        }
    }

    if skipped > 0 {
        tracing::warn!("{}: skipped {} degenerate or out-of-range face(s)", name, skipped);
    }

    let mut mesh = MeshData::new(name);
    for material in order {
        if let Some(builder) = builders.remove(&material) {
            let sub = builder.finish();
            if !sub.is_empty() {
                mesh.submeshes.push(sub);
            }
        }
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const TWO_MATERIALS: &str = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1
usemtl avtank03
f 1/1 2/2 3/3
usemtl avtank_tread
f 1/1 3/3 4/4
usemtl avtank03
f 3/3 4/4 1/1
";

    #[test]
    fn test_submeshes_follow_declared_materials() {
        let mesh = read_obj_from(TWO_MATERIALS.as_bytes(), "tank.obj", "tank.obj").unwrap();
        let names: Vec<_> = mesh.submeshes.iter().map(|s| s.material_name.as_str()).collect();
        assert_eq!(names, vec!["avtank03", "avtank_tread"]);
        assert_eq!(mesh.submeshes[0].triangle_count(), 2);
        assert_eq!(mesh.submeshes[1].triangle_count(), 1);
    }

    #[test]
    fn test_missing_normals_are_generated() {
        let mesh = read_obj_from(TWO_MATERIALS.as_bytes(), "tank.obj", "tank.obj").unwrap();
        let normals = mesh.submeshes[0].normals.as_ref().unwrap();
        assert_relative_eq!(normals[0].z, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_texture_v_is_flipped() {
        let mesh = read_obj_from(TWO_MATERIALS.as_bytes(), "tank.obj", "tank.obj").unwrap();
        let uvs = mesh.submeshes[0].uvs.as_ref().unwrap();
        assert_eq!(uvs[0], [0.0, 1.0]);
    }

    #[test]
    fn test_quads_are_triangulated() {
        let src = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n";
        let mesh = read_obj_from(src.as_bytes(), "quad.obj", "quad.obj").unwrap();
        assert_eq!(mesh.submeshes.len(), 1);
        assert_eq!(mesh.submeshes[0].material_name, DEFAULT_MATERIAL);
        assert_eq!(mesh.submeshes[0].indices, vec![0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = ObjReader.read_mesh(Path::new("/definitely/not/here.obj")).unwrap_err();
        assert!(matches!(err, meshview_core::Error::Io(_)));
    }
}
