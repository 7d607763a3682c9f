//! Runtime material synthesis
//!
//! Authored material scripts are frequently missing or reference import
//! chains that do not resolve outside the game. Instead of parsing them,
//! every declared material name is mapped to a simple lit material with
//! a diffuse texture discovered by naming convention.

use crate::resource_group::ResourceGroup;
use crate::textures::find_diffuse_texture;
use meshview_core::{AddressMode, Colour, PreviewMaterial, TextureLayer};
use std::path::PathBuf;

/// Prefix that keeps preview materials apart from authored ones
pub const PREVIEW_MATERIAL_PREFIX: &str = "__preview__";

/// Name of the synthesized material standing in for `declared`
pub fn preview_material_name(declared: &str) -> String {
    format!("{}{}", PREVIEW_MATERIAL_PREFIX, declared)
}

/// Result of binding one submesh
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterialBinding {
    /// Material name declared by the mesh file
    pub declared: String,
    /// Preview material assigned to the submesh
    pub synthesized: String,
    /// Texture file name, when one was discovered
    pub texture: Option<String>,
    /// False when the material was already in the group
    pub created: bool,
}

/// Lighting coefficients used for every synthesized material
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialSynthesizer {
    pub ambient: Colour,
    pub diffuse: Colour,
    pub specular: Colour,
    pub shininess: f32,
    /// Diffuse colour used when no texture is found
    pub fallback_diffuse: Colour,
}

impl Default for MaterialSynthesizer {
    fn default() -> Self {
        Self {
            ambient: [0.4, 0.4, 0.4, 1.0],
            diffuse: [1.0, 1.0, 1.0, 1.0],
            specular: [0.4, 0.4, 0.4, 1.0],
            shininess: 32.0,
            fallback_diffuse: [0.6, 0.6, 0.65, 1.0],
        }
    }
}

impl MaterialSynthesizer {
    /// Bind a preview material to each submesh material name.
    ///
    /// `declared` holds one entry per submesh. Lookups search `locations`
    /// in order. Materials are stored in `group`, so a name seen twice is
    /// only built once. Never fails: a missing texture yields a flat material.
    pub fn apply<S: AsRef<str>>(
        &self,
        declared: &[S],
        locations: &[PathBuf],
        group: &mut ResourceGroup,
    ) -> Vec<MaterialBinding> {
        declared
            .iter()
            .map(|name| self.bind(name.as_ref(), locations, group))
            .collect()
    }

    fn bind(&self, declared: &str, locations: &[PathBuf], group: &mut ResourceGroup) -> MaterialBinding {
        let synthesized = preview_material_name(declared);

        if let Some(existing) = group.material(&synthesized) {
            return MaterialBinding {
                declared: declared.to_string(),
                synthesized,
                texture: existing.texture.as_ref().map(|t| t.texture_name.clone()),
                created: false,
            };
        }

        let layer = find_diffuse_texture(declared, locations).map(|found| {
            if let Some(subdir) = found.found_in_subdir {
                group.add_location(subdir);
            }
            TextureLayer {
                texture_name: found.file_name,
                path: found.path,
                address_mode: AddressMode::Wrap,
            }
        });

        let material = match layer {
            Some(layer) => {
                tracing::info!("{} -> {}", declared, layer.texture_name);
                self.textured(&synthesized, group.name(), layer)
            }
            None => {
                tracing::info!("{} -> no texture found (flat)", declared);
                self.flat(&synthesized, group.name())
            }
        };
        let texture = material.texture.as_ref().map(|t| t.texture_name.clone());
        group.insert_material(material);

        MaterialBinding {
            declared: declared.to_string(),
            synthesized,
            texture,
            created: true,
        }
    }

    fn textured(&self, name: &str, group: &str, layer: TextureLayer) -> PreviewMaterial {
        PreviewMaterial {
            diffuse: self.diffuse,
            texture: Some(layer),
            ..self.flat(name, group)
        }
    }

    /// Untextured material with the fallback diffuse colour
    pub fn flat(&self, name: &str, group: &str) -> PreviewMaterial {
        PreviewMaterial {
            name: name.to_string(),
            group: group.to_string(),
            ambient: self.ambient,
            diffuse: self.fallback_diffuse,
            specular: self.specular,
            shininess: self.shininess,
            receive_shadows: true,
            texture: None,
        }
    }
}
