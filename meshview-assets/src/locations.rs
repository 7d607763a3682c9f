//! Resource location discovery
//!
//! Asset trees rarely keep materials and textures next to the mesh. A
//! typical layout looks like
//!
//! ```text
//! assets/common/models/tank.obj
//! assets/common/materials/
//! assets/common/textures/
//! assets/pc/materials/
//! assets/pc/textures/
//! ```
//!
//! [`collect_locations`] walks up from the mesh directory a bounded number
//! of levels and picks up resource-named folders at each level, including
//! ones nested inside a platform folder such as `pc/`.

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// How many ancestors of the mesh directory are visited
pub const MAX_ANCESTOR_LEVELS: usize = 6;

/// Directory names treated as resource folders, compared case-insensitively
pub const RESOURCE_DIR_NAMES: [&str; 7] = [
    "materials",
    "textures",
    "programs",
    "shaders",
    "fonts",
    "overlays",
    "packs",
];

/// Ordered, case-insensitively deduplicated list of directories.
///
/// Earlier entries win when several directories hold a matching texture.
#[derive(Debug, Clone, Default)]
pub struct ResourceLocationSet {
    paths: Vec<PathBuf>,
    seen: HashSet<String>,
}

impl ResourceLocationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `path` unless an equivalent entry exists. Returns whether it was added.
    pub fn push(&mut self, path: impl Into<PathBuf>) -> bool {
        let path = path.into();
        if self.seen.insert(location_key(&path)) {
            self.paths.push(path);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.seen.contains(&location_key(path))
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathBuf> {
        self.paths.iter()
    }

    pub fn as_slice(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn clear(&mut self) {
        self.paths.clear();
        self.seen.clear();
    }
}

impl<'a> IntoIterator for &'a ResourceLocationSet {
    type Item = &'a PathBuf;
    type IntoIter = std::slice::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.iter()
    }
}

/// Normalized comparison key: lowercase, one separator style, no trailing separator
fn location_key(path: &Path) -> String {
    let raw = path.to_string_lossy().replace('\\', "/").to_lowercase();
    let trimmed = raw.trim_end_matches('/');
    if trimmed.is_empty() {
        raw
    } else {
        trimmed.to_string()
    }
}

fn is_resource_dir_name(name: &str) -> bool {
    RESOURCE_DIR_NAMES
        .iter()
        .any(|known| known.eq_ignore_ascii_case(name))
}

/// Immediate subdirectories of `dir`, sorted by name. Unreadable directories yield nothing.
fn subdirectories(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_dir())
        .map(|e| e.into_path())
        .collect()
}

fn dir_name(path: &Path) -> &str {
    path.file_name().and_then(|n| n.to_str()).unwrap_or("")
}

/// Scan the children of one ancestor directory
fn scan_ancestor(ancestor: &Path, out: &mut ResourceLocationSet) {
    for child in subdirectories(ancestor) {
        if is_resource_dir_name(dir_name(&child)) {
            out.push(child.clone());
            for sub in subdirectories(&child) {
                out.push(sub);
            }
        } else {
            // Possible platform folder: look one level in for resource folders
            for sub in subdirectories(&child) {
                if is_resource_dir_name(dir_name(&sub)) {
                    out.push(sub.clone());
                    for nested in subdirectories(&sub) {
                        out.push(nested);
                    }
                }
            }
        }
    }
}

/// Compute search directories for a mesh stored in `mesh_dir`.
///
/// The mesh directory always comes first. Then each of up to
/// [`MAX_ANCESTOR_LEVELS`] ancestors is added, followed by the resource
/// folders found under it.
pub fn collect_locations(mesh_dir: &Path) -> ResourceLocationSet {
    collect_locations_with_hints(mesh_dir, &[])
}

/// Like [`collect_locations`], with caller-supplied hint directories placed
/// right after the mesh directory.
pub fn collect_locations_with_hints(mesh_dir: &Path, hints: &[PathBuf]) -> ResourceLocationSet {
    let mesh_dir = normalize(mesh_dir);
    let mut out = ResourceLocationSet::new();
    out.push(mesh_dir.clone());

    for hint in hints {
        if hint.is_dir() {
            out.push(normalize(hint));
        } else {
            tracing::debug!("Ignoring hint that is not a directory: {}", hint.display());
        }
    }

    for ancestor in mesh_dir.ancestors().skip(1).take(MAX_ANCESTOR_LEVELS) {
        out.push(ancestor.to_path_buf());
        scan_ancestor(ancestor, &mut out);
    }

    tracing::debug!(
        "Collected {} resource location(s) for {}",
        out.len(),
        mesh_dir.display()
    );
    out
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path.to_path_buf(),
    }
}

/// Absolute path with `.` and `..` folded away lexically
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in absolute(path).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(out.components().next_back(), Some(Component::Normal(_))) {
                    out.pop();
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn make_tree(root: &Path, dirs: &[&str]) {
        for dir in dirs {
            fs::create_dir_all(root.join(dir)).unwrap();
        }
    }

    #[test]
    fn test_finds_shared_and_platform_materials() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("assets");
        make_tree(
            &root,
            &[
                "common/models",
                "common/materials/tanks",
                "common/textures",
                "pc/materials",
                "pc/textures/DIFF",
            ],
        );

        let set = collect_locations(&root.join("common/models"));
        let paths = set.as_slice();

        assert_eq!(paths[0], root.join("common/models"));
        assert!(set.contains(&root.join("common/materials")));
        assert!(set.contains(&root.join("common/materials/tanks")));
        assert!(set.contains(&root.join("common/textures")));
        assert!(set.contains(&root.join("pc/materials")));
        assert!(set.contains(&root.join("pc/textures/DIFF")));

        let keys: HashSet<String> = paths.iter().map(|p| location_key(p)).collect();
        assert_eq!(keys.len(), paths.len());
    }

    #[test]
    fn test_resource_names_match_case_insensitively() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("game");
        make_tree(&root, &["meshes", "Textures", "PC/MATERIALS"]);

        let set = collect_locations(&root.join("meshes"));
        assert!(set.contains(&root.join("Textures")));
        assert!(set.contains(&root.join("PC/MATERIALS")));
    }

    #[test]
    fn test_unrelated_folders_are_not_descended() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("proj");
        make_tree(&root, &["models", "docs/images/screens"]);

        let set = collect_locations(&root.join("models"));
        assert!(!set.contains(&root.join("docs")));
        assert!(!set.contains(&root.join("docs/images")));
    }

    #[test]
    fn test_hints_follow_mesh_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("work");
        make_tree(&root, &["models", "elsewhere/tex"]);
        let hint = root.join("elsewhere/tex");

        let set = collect_locations_with_hints(&root.join("models"), &[hint.clone(), hint.clone()]);
        assert_eq!(set.as_slice()[1], hint);
        assert_eq!(set.iter().filter(|p| **p == hint).count(), 1);
    }

    #[test]
    fn test_parent_components_are_folded() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("r");
        make_tree(&root, &["a/b/x/materials", "a/common/models", "a/common/textures"]);

        let set = collect_locations(&root.join("a/b/../common/models"));
        let paths = set.as_slice();

        assert_eq!(paths[0], root.join("a/common/models"));
        assert_eq!(paths[1], root.join("a/common"));
        assert_eq!(paths[2], root.join("a/common/textures"));
        assert!(set.contains(&root.join("a")));
        assert!(!set.contains(&root.join("a/b")));
        assert!(!set.contains(&root.join("a/b/x/materials")));
        assert!(paths.iter().all(|p| !p.components().any(|c| c == Component::ParentDir)));
    }

    #[test]
    fn test_normalize_drops_dot_components() {
        assert_eq!(normalize(Path::new("/x/./y/../z")), PathBuf::from("/x/z"));
        assert_eq!(normalize(Path::new("/../x")), PathBuf::from("/x"));
    }

    #[test]
    fn test_dedup_ignores_case_and_trailing_separator() {
        let mut set = ResourceLocationSet::new();
        assert!(set.push("/data/Materials"));
        assert!(!set.push("/data/materials/"));
        assert_eq!(set.len(), 1);
    }
}
