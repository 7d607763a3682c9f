//! Shader variant generation
//!
//! One WGSL template covers every preview material. Feature blocks are
//! delimited by `//#if NAME` / `//#else` / `//#endif` comment lines and
//! resolved per [`ShaderVariant`]. Generated sources are cached.

use meshview_core::{Error, PreviewMaterial, Result};
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Template every preview material is generated from
pub const PREVIEW_TEMPLATE: &str = include_str!("shaders/preview.wgsl");

/// Feature set a material needs from the shader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderVariant {
    pub textured: bool,
}

impl ShaderVariant {
    pub fn for_material(material: &PreviewMaterial) -> Self {
        Self {
            textured: material.is_textured(),
        }
    }

    fn is_defined(&self, name: &str) -> bool {
        match name {
            "TEXTURED" => self.textured,
            _ => false,
        }
    }

    pub fn label(&self) -> &'static str {
        if self.textured {
            "preview_textured"
        } else {
            "preview_flat"
        }
    }
}

/// Resolve the conditional blocks of `template` for `variant`
pub fn generate(template: &str, variant: ShaderVariant) -> Result<String> {
    // One entry per open block: (block is active, an else was seen)
    let mut stack: Vec<(bool, bool)> = Vec::new();
    let mut out = String::with_capacity(template.len());

    for (line_no, line) in template.lines().enumerate() {
        let directive = line.trim();
        let enclosing = stack.iter().all(|(active, _)| *active);

        if let Some(name) = directive.strip_prefix("//#if ") {
            stack.push((variant.is_defined(name.trim()), false));
            continue;
        }
        if directive == "//#else" {
            let Some(top) = stack.last_mut() else {
                return Err(Error::InvalidData(format!("line {}: #else without #if", line_no + 1)));
            };
            if top.1 {
                return Err(Error::InvalidData(format!("line {}: duplicate #else", line_no + 1)));
            }
            *top = (!top.0, true);
            continue;
        }
        if directive == "//#endif" {
            if stack.pop().is_none() {
                return Err(Error::InvalidData(format!("line {}: #endif without #if", line_no + 1)));
            }
            continue;
        }

        if enclosing {
            out.push_str(line);
            out.push('\n');
        }
    }

    if !stack.is_empty() {
        return Err(Error::InvalidData(format!("{} unterminated #if block(s)", stack.len())));
    }
    Ok(out)
}

/// Produces and caches shader sources per variant
#[derive(Debug, Default)]
pub struct ShaderGenerator {
    sources: HashMap<ShaderVariant, String>,
}

impl ShaderGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Source for `variant`, generated on first use
    pub fn source(&mut self, variant: ShaderVariant) -> Result<&str> {
        match self.sources.entry(variant) {
            Entry::Occupied(cached) => Ok(cached.into_mut().as_str()),
            Entry::Vacant(slot) => {
                let source = generate(PREVIEW_TEMPLATE, variant)?;
                tracing::debug!("Generated shader variant {}", variant.label());
                Ok(slot.insert(source).as_str())
            }
        }
    }
}
