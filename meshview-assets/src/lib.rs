//! Asset discovery for the mesh preview
//!
//! This crate resolves where a mesh's materials and textures live and
//! turns declared material names into preview materials:
//! - [`locations`]: bounded walk of the asset tree around a mesh
//! - [`textures`]: diffuse map lookup by naming convention
//! - [`materials`]: the material synthesizer
//! - [`resource_group`]: clearable namespaces holding the results

pub mod locations;
pub mod materials;
pub mod resource_group;
pub mod textures;

pub use locations::{collect_locations, collect_locations_with_hints, normalize, ResourceLocationSet};
pub use materials::{preview_material_name, MaterialBinding, MaterialSynthesizer};
pub use resource_group::{locate_engine_media, ResourceGroup, GENERAL_GROUP, MEDIA_DIR_ENV, PREVIEW_GROUP};
pub use textures::{candidate_bases, decode_texture, find_diffuse_texture, find_texture, TextureMatch};
