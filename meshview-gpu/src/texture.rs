//! Texture uploads and render targets

use crate::device::GpuContext;
use meshview_core::{AddressMode, Error, Result, TextureImage};

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// A sampled texture living on the GPU
pub struct GpuTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
}

impl GpuTexture {
    /// Upload RGBA8 pixels as an sRGB texture
    pub fn from_image(ctx: &GpuContext, image: &TextureImage) -> Self {
        let size = wgpu::Extent3d {
            width: image.width,
            height: image.height,
            depth_or_array_layers: 1,
        };
        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(&image.name),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        ctx.queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &image.rgba,
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(4 * image.width),
                rows_per_image: Some(image.height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self { texture, view }
    }
}

/// Reject 2D extents the device cannot hold
pub fn check_extent(label: &str, width: u32, height: u32, max_dimension: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidData(format!("{} is empty", label)));
    }
    if width > max_dimension || height > max_dimension {
        return Err(Error::Gpu(format!(
            "{} is {}x{}, device limit is {}",
            label, width, height, max_dimension
        )));
    }
    Ok(())
}

/// Check an image against the device limit and its own pixel buffer
pub fn check_image(image: &TextureImage, max_dimension: u32) -> Result<()> {
    check_extent(&image.name, image.width, image.height, max_dimension)?;
    let expected = 4 * image.width as usize * image.height as usize;
    if image.rgba.len() != expected {
        return Err(Error::InvalidData(format!(
            "{} has {} bytes of pixels, expected {}",
            image.name,
            image.rgba.len(),
            expected
        )));
    }
    Ok(())
}

/// Sampler for a material's texture addressing mode
pub fn create_sampler(ctx: &GpuContext, mode: AddressMode) -> wgpu::Sampler {
    let address_mode = match mode {
        AddressMode::Wrap => wgpu::AddressMode::Repeat,
        AddressMode::Clamp => wgpu::AddressMode::ClampToEdge,
    };
    ctx.device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("Preview Sampler"),
        address_mode_u: address_mode,
        address_mode_v: address_mode,
        address_mode_w: address_mode,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Nearest,
        ..Default::default()
    })
}

/// Size-dependent attachments, rebuilt on every resize
pub struct RenderTargets {
    pub depth_view: wgpu::TextureView,
    pub msaa_view: Option<wgpu::TextureView>,
}

impl RenderTargets {
    pub fn new(ctx: &GpuContext, format: wgpu::TextureFormat, width: u32, height: u32, sample_count: u32) -> Self {
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let depth = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size,
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });

        let msaa_view = (sample_count > 1).then(|| {
            ctx.device
                .create_texture(&wgpu::TextureDescriptor {
                    label: Some("MSAA Texture"),
                    size,
                    mip_level_count: 1,
                    sample_count,
                    dimension: wgpu::TextureDimension::D2,
                    format,
                    usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                    view_formats: &[],
                })
                .create_view(&wgpu::TextureViewDescriptor::default())
        });

        Self {
            depth_view: depth.create_view(&wgpu::TextureViewDescriptor::default()),
            msaa_view,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(width: u32, height: u32, bytes: usize) -> TextureImage {
        TextureImage {
            name: "hull_d.dds".to_string(),
            width,
            height,
            rgba: vec![255; bytes],
        }
    }

    #[test]
    fn test_oversized_texture_is_rejected() {
        let huge = TextureImage {
            rgba: Vec::new(),
            ..image(32768, 32768, 0)
        };
        assert!(matches!(check_image(&huge, 8192), Err(Error::Gpu(_))));
        assert!(check_image(&image(2, 2, 16), 8192).is_ok());
    }

    #[test]
    fn test_pixel_buffer_must_match_extent() {
        assert!(matches!(check_image(&image(2, 2, 12), 8192), Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_surface_extent_limits() {
        assert!(check_extent("render surface", 800, 600, 8192).is_ok());
        assert!(check_extent("render surface", 9000, 600, 8192).is_err());
        assert!(check_extent("render surface", 0, 600, 8192).is_err());
    }
}
