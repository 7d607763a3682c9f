//! Preview material descriptions shared between the synthesizer and the backend

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Linear RGBA colour
pub type Colour = [f32; 4];

/// How texture coordinates outside [0, 1] are resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AddressMode {
    /// Tile the texture
    Wrap,
    Clamp,
}

/// A texture bound to a material pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureLayer {
    /// File name as it exists on disk (original case preserved)
    pub texture_name: String,
    /// Full path the texture was discovered at
    pub path: PathBuf,
    pub address_mode: AddressMode,
}

/// A single-pass material built at runtime for preview rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewMaterial {
    pub name: String,
    /// Resource group that owns the material
    pub group: String,
    pub ambient: Colour,
    pub diffuse: Colour,
    pub specular: Colour,
    pub shininess: f32,
    pub receive_shadows: bool,
    pub texture: Option<TextureLayer>,
}

impl PreviewMaterial {
    /// Whether the material samples a diffuse texture
    pub fn is_textured(&self) -> bool {
        self.texture.is_some()
    }
}

/// Decoded RGBA8 texture pixels, ready for upload
#[derive(Debug, Clone, PartialEq)]
pub struct TextureImage {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl TextureImage {
    /// A single white texel, bound where a material has no texture
    pub fn white() -> Self {
        Self {
            name: "__white__".to_string(),
            width: 1,
            height: 1,
            rgba: vec![255, 255, 255, 255],
        }
    }
}
