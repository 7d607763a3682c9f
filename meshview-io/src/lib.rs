//! Mesh readers for the preview
//!
//! Format parsing is pluggable: the preview asks a [`ReaderRegistry`] for a
//! reader by file extension, and hosts can register readers for formats
//! this crate does not ship (binary engine meshes, XML meshes, ...).

pub mod error;
pub mod obj;

pub use error::*;
pub use obj::ObjReader;

use meshview_core::{MeshData, Result};
use std::collections::HashMap;
use std::path::Path;

/// Trait for reading meshes from files
pub trait MeshReader {
    /// Read a mesh from the given path
    fn read_mesh(&self, path: &Path) -> Result<MeshData>;

    /// Get the format name this reader handles
    fn format_name(&self) -> &'static str;

    /// Lowercase file extensions this reader accepts
    fn extensions(&self) -> &'static [&'static str];
}

/// Extension-keyed collection of mesh readers
pub struct ReaderRegistry {
    readers: Vec<Box<dyn MeshReader>>,
    by_extension: HashMap<String, usize>,
}

impl ReaderRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            readers: Vec::new(),
            by_extension: HashMap::new(),
        }
    }

    /// Registry with every reader this crate ships
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(ObjReader));
        registry
    }

    /// Register a reader for each of its extensions, replacing older entries
    pub fn register(&mut self, reader: Box<dyn MeshReader>) {
        let slot = self.readers.len();
        for ext in reader.extensions() {
            self.by_extension.insert(ext.to_lowercase(), slot);
        }
        self.readers.push(reader);
    }

    /// Whether a reader exists for the path's extension
    pub fn supports(&self, path: &Path) -> bool {
        extension_of(path).is_some_and(|ext| self.by_extension.contains_key(&ext))
    }

    /// Read a mesh, picking the reader by extension
    pub fn read(&self, path: &Path) -> Result<MeshData> {
        let ext = extension_of(path).unwrap_or_default();
        let reader = self
            .by_extension
            .get(&ext)
            .and_then(|&slot| self.readers.get(slot))
            .ok_or_else(|| {
                meshview_core::Error::UnsupportedFormat(format!("no mesh reader for '.{}' files", ext))
            })?;

        tracing::debug!("Reading {} as {}", path.display(), reader.format_name());
        let mesh = reader.read_mesh(path)?;
        if mesh.is_empty() {
            return Err(IoError::InvalidFormat {
                format: format!("{} contains no drawable geometry", path.display()),
            }
            .into());
        }
        Ok(mesh)
    }
}

impl Default for ReaderRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase())
}

/// Auto-detect format and read mesh
pub fn read_mesh<P: AsRef<Path>>(path: P) -> Result<MeshData> {
    ReaderRegistry::with_defaults().read(path.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    struct FixedReader;

    impl MeshReader for FixedReader {
        fn read_mesh(&self, _path: &Path) -> Result<MeshData> {
            let mut mesh = MeshData::new("fixed");
            let mut sub = meshview_core::SubMesh::new("m");
            sub.positions = vec![
                meshview_core::Point3f::new(0.0, 0.0, 0.0),
                meshview_core::Point3f::new(1.0, 0.0, 0.0),
                meshview_core::Point3f::new(0.0, 1.0, 0.0),
            ];
            sub.indices = vec![0, 1, 2];
            mesh.submeshes.push(sub);
            Ok(mesh)
        }

        fn format_name(&self) -> &'static str {
            "fixed"
        }

        fn extensions(&self) -> &'static [&'static str] {
            &["mesh", "xml"]
        }
    }

    #[test]
    fn test_extension_lookup_is_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Tri.OBJ");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3").unwrap();

        let mesh = read_mesh(&path).unwrap();
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.name, "Tri.OBJ");
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let err = read_mesh("model.fbx").unwrap_err();
        assert!(matches!(err, meshview_core::Error::UnsupportedFormat(_)));
    }

    #[test]
    fn test_registered_reader_serves_all_extensions() {
        let mut registry = ReaderRegistry::with_defaults();
        registry.register(Box::new(FixedReader));
        assert!(registry.supports(Path::new("a.mesh")));
        assert!(registry.supports(Path::new("a.XML")));
        assert_eq!(registry.read(Path::new("a.mesh")).unwrap().name, "fixed");
    }

    #[test]
    fn test_empty_geometry_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.obj");
        std::fs::write(&path, "# nothing here\n").unwrap();
        assert!(read_mesh(&path).is_err());
    }
}
