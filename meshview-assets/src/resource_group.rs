//! Named, clearable namespaces of search locations and resolved assets

use crate::locations::ResourceLocationSet;
use crate::textures::decode_texture;
use meshview_core::{PreviewMaterial, Result, TextureImage, TextureLayer};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Group holding everything resolved for the mesh currently on screen
pub const PREVIEW_GROUP: &str = "MeshPreview";

/// Group holding built-in engine media
pub const GENERAL_GROUP: &str = "General";

/// Environment variable naming an engine media directory
pub const MEDIA_DIR_ENV: &str = "MESHVIEW_MEDIA";

/// A resource group: search locations plus the materials and textures
/// created from them. Clearing the group drops all of it.
#[derive(Debug)]
pub struct ResourceGroup {
    name: String,
    locations: ResourceLocationSet,
    materials: HashMap<String, PreviewMaterial>,
    textures: HashMap<String, TextureImage>,
    initialised: bool,
}

impl ResourceGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            locations: ResourceLocationSet::new(),
            materials: HashMap::new(),
            textures: HashMap::new(),
            initialised: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register a search directory. Returns false for duplicates.
    pub fn add_location(&mut self, path: impl Into<PathBuf>) -> bool {
        let path = path.into();
        let added = self.locations.push(path.clone());
        if added {
            tracing::info!("  + {}", path.display());
        }
        added
    }

    pub fn locations(&self) -> &[PathBuf] {
        self.locations.as_slice()
    }

    /// Mark the group ready. Locations that no longer exist are reported
    /// but kept, since the tree may be restored before the next lookup.
    pub fn initialise(&mut self) {
        let missing = self.locations.iter().filter(|p| !p.is_dir()).count();
        if missing > 0 {
            tracing::warn!(
                "Resource group '{}': {} of {} location(s) are missing",
                self.name,
                missing,
                self.locations.len()
            );
        }
        tracing::debug!(
            "Initialised resource group '{}' with {} location(s)",
            self.name,
            self.locations.len()
        );
        self.initialised = true;
    }

    pub fn is_initialised(&self) -> bool {
        self.initialised
    }

    /// Drop every location, material and texture
    pub fn clear(&mut self) {
        if !self.materials.is_empty() || !self.textures.is_empty() {
            tracing::debug!(
                "Clearing resource group '{}' ({} material(s), {} texture(s))",
                self.name,
                self.materials.len(),
                self.textures.len()
            );
        }
        self.locations.clear();
        self.materials.clear();
        self.textures.clear();
        self.initialised = false;
    }

    pub fn contains_material(&self, name: &str) -> bool {
        self.materials.contains_key(name)
    }

    /// Store a material, replacing any previous one with the same name
    pub fn insert_material(&mut self, material: PreviewMaterial) {
        self.materials.insert(material.name.clone(), material);
    }

    pub fn material(&self, name: &str) -> Option<&PreviewMaterial> {
        self.materials.get(name)
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    /// Decode the texture behind `layer`, caching by texture name
    pub fn load_texture(&mut self, layer: &TextureLayer) -> Result<&TextureImage> {
        match self.textures.entry(layer.texture_name.clone()) {
            Entry::Occupied(cached) => Ok(cached.into_mut()),
            Entry::Vacant(slot) => {
                let image = decode_texture(&layer.path, &layer.texture_name)?;
                tracing::debug!(
                    "Decoded {} ({}x{})",
                    layer.texture_name,
                    image.width,
                    image.height
                );
                Ok(slot.insert(image))
            }
        }
    }

    /// The built-in media group: `media_dir` and every directory below it
    pub fn general(media_dir: Option<&Path>) -> Self {
        let mut group = Self::new(GENERAL_GROUP);
        match media_dir {
            Some(dir) if dir.is_dir() => {
                tracing::info!("Registering engine media from {}", dir.display());
                add_recursive(&mut group, dir);
            }
            Some(dir) => tracing::warn!("Engine media directory not found: {}", dir.display()),
            None => tracing::debug!("No engine media directory configured"),
        }
        group.initialise();
        group
    }
}

fn add_recursive(group: &mut ResourceGroup, dir: &Path) {
    let dirs = WalkDir::new(dir)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_dir());
    for entry in dirs {
        group.locations.push(entry.into_path());
    }
}

/// Locate optional engine media: `MESHVIEW_MEDIA`, then `media/` next to the executable
pub fn locate_engine_media() -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os(MEDIA_DIR_ENV) {
        let dir = PathBuf::from(dir);
        if dir.is_dir() {
            return Some(dir);
        }
        tracing::warn!("{} points at a missing directory: {}", MEDIA_DIR_ENV, dir.display());
    }

    let exe = std::env::current_exe().ok()?;
    let candidate = exe.parent()?.join("media");
    candidate.is_dir().then_some(candidate)
}
