//! The wgpu implementation of the render backend

use crate::device::{BackendPreference, GpuContext};
use crate::shader_gen::{ShaderGenerator, ShaderVariant};
use crate::surface::{SurfaceOptions, WindowStrategy};
use crate::texture::{check_extent, check_image, create_sampler, GpuTexture, RenderTargets, DEPTH_FORMAT};
use bytemuck::{Pod, Zeroable};
use meshview_core::{
    AddressMode, BackendBootstrap, BackendInfo, Error, FrameParams, MeshData, PreviewMaterial,
    RenderBackend, Result, SceneLighting, SubMesh, TextureImage,
};
use std::collections::HashMap;

/// Vertex layout shared by every preview pipeline
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct PreviewVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl PreviewVertex {
    /// Vertex buffer layout descriptor
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<PreviewVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                // Position
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                // Normal
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                // UV
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 6]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

/// Interleave a submesh's attributes. Missing normals point up, missing UVs are zero.
pub fn submesh_vertices(sub: &SubMesh) -> Vec<PreviewVertex> {
    sub.positions
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let normal = sub
                .normals
                .as_ref()
                .and_then(|n| n.get(i))
                .map(|n| [n.x, n.y, n.z])
                .unwrap_or([0.0, 1.0, 0.0]);
            let uv = sub
                .uvs
                .as_ref()
                .and_then(|uv| uv.get(i))
                .copied()
                .unwrap_or([0.0, 0.0]);
            PreviewVertex {
                position: [p.x, p.y, p.z],
                normal,
                uv,
            }
        })
        .collect()
}

/// Per-frame uniform block (group 0)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct FrameUniform {
    pub view_proj: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub camera_pos: [f32; 4],
    pub ambient: [f32; 4],
    pub key_dir: [f32; 4],
    pub key_color: [f32; 4],
    pub fill_dir: [f32; 4],
    pub fill_color: [f32; 4],
}

impl FrameUniform {
    pub fn new(frame: &FrameParams) -> Self {
        let lighting = &frame.lighting;
        let dir = |v: nalgebra::Vector3<f32>| [v.x, v.y, v.z, 0.0];
        Self {
            view_proj: (frame.projection * frame.view).into(),
            model: frame.model.into(),
            camera_pos: [
                frame.camera_position.x,
                frame.camera_position.y,
                frame.camera_position.z,
                1.0,
            ],
            ambient: lighting.ambient,
            key_dir: dir(lighting.key.direction),
            key_color: lighting.key.diffuse,
            fill_dir: dir(lighting.fill.direction),
            fill_color: lighting.fill.diffuse,
        }
    }
}

/// Per-material uniform block (group 1, binding 0)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct MaterialUniform {
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    /// rgb specular colour, w shininess
    pub specular: [f32; 4],
}

impl From<&PreviewMaterial> for MaterialUniform {
    fn from(material: &PreviewMaterial) -> Self {
        let [r, g, b, _] = material.specular;
        Self {
            ambient: material.ambient,
            diffuse: material.diffuse,
            specular: [r, g, b, material.shininess],
        }
    }
}

/// Material used for submeshes whose material was never registered
fn default_material() -> PreviewMaterial {
    PreviewMaterial {
        name: "__default__".to_string(),
        group: String::new(),
        ambient: [0.4, 0.4, 0.4, 1.0],
        diffuse: [0.6, 0.6, 0.65, 1.0],
        specular: [0.4, 0.4, 0.4, 1.0],
        shininess: 32.0,
        receive_shadows: true,
        texture: None,
    }
}

struct GpuMaterial {
    variant: ShaderVariant,
    _uniform: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

struct SubmeshDraw {
    first_index: u32,
    index_count: u32,
    base_vertex: i32,
    material: String,
}

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    draws: Vec<SubmeshDraw>,
}

struct GpuState {
    ctx: GpuContext,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    sample_count: u32,
    targets: RenderTargets,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    material_layout: wgpu::BindGroupLayout,
    pipeline_layout: wgpu::PipelineLayout,
    shaders: ShaderGenerator,
    pipelines: HashMap<ShaderVariant, wgpu::RenderPipeline>,
    wrap_sampler: wgpu::Sampler,
    clamp_sampler: wgpu::Sampler,
    white: GpuTexture,
    fallback: GpuMaterial,
    textures: HashMap<String, GpuTexture>,
    materials: HashMap<String, GpuMaterial>,
    mesh: Option<GpuMesh>,
    pending: Option<wgpu::SurfaceTexture>,
}

impl GpuState {
    fn sampler(&self, mode: AddressMode) -> &wgpu::Sampler {
        match mode {
            AddressMode::Wrap => &self.wrap_sampler,
            AddressMode::Clamp => &self.clamp_sampler,
        }
    }

    fn ensure_pipeline(&mut self, variant: ShaderVariant) -> Result<()> {
        if self.pipelines.contains_key(&variant) {
            return Ok(());
        }
        let source = self.shaders.source(variant)?;
        let module = self.ctx.create_shader_module(variant.label(), source)?;
        let pipeline = create_render_pipeline(
            &self.ctx.device,
            &self.pipeline_layout,
            &module,
            self.surface_config.format,
            self.sample_count,
            variant.label(),
        );
        tracing::debug!("Built pipeline {}", variant.label());
        self.pipelines.insert(variant, pipeline);
        Ok(())
    }

    fn build_material(&self, material: &PreviewMaterial) -> GpuMaterial {
        let (view, address_mode) = match &material.texture {
            Some(layer) => match self.textures.get(&layer.texture_name) {
                Some(texture) => (&texture.view, layer.address_mode),
                None => {
                    tracing::warn!(
                        "{}: texture {} was not uploaded, sampling white",
                        material.name,
                        layer.texture_name
                    );
                    (&self.white.view, layer.address_mode)
                }
            },
            None => (&self.white.view, AddressMode::Wrap),
        };

        let uniform = self.ctx.create_buffer_init(
            &format!("{} Uniform", material.name),
            &[MaterialUniform::from(material)],
            wgpu::BufferUsages::UNIFORM,
        );
        let bind_group = self.ctx.create_bind_group(
            &material.name,
            &self.material_layout,
            &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(self.sampler(address_mode)),
                },
            ],
        );

        GpuMaterial {
            variant: ShaderVariant::for_material(material),
            _uniform: uniform,
            bind_group,
        }
    }
}

/// Create a render pipeline for preview materials
fn create_render_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    surface_format: wgpu::TextureFormat,
    sample_count: u32,
    label: &str,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: "vs_main",
            buffers: &[PreviewVertex::desc()],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: "fs_main",
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            // Game assets mix winding orders
            cull_mode: None,
            unclipped_depth: false,
            polygon_mode: wgpu::PolygonMode::Fill,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: sample_count,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
    })
}

/// Renders the preview scene with wgpu into one surface
pub struct WgpuBackend {
    state: Option<GpuState>,
    info: BackendInfo,
    options: SurfaceOptions,
}

impl WgpuBackend {
    /// Configure `surface` and build the fixed GPU objects
    pub fn new(
        ctx: GpuContext,
        surface: wgpu::Surface<'static>,
        width: u32,
        height: u32,
        options: SurfaceOptions,
    ) -> Result<Self> {
        let info = ctx.info();
        let (width, height) = options.clamp_size(width, height);

        let caps = surface.get_capabilities(&ctx.adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| Error::Surface("surface is not supported by the adapter".to_string()))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: options.present_mode(),
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&ctx.device, &surface_config);

        let sample_count = options.sample_count();
        let targets = RenderTargets::new(&ctx, format, width, height, sample_count);

        let frame_layout = ctx.create_bind_group_layout(
            "frame_bind_group_layout",
            &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        );
        let material_layout = ctx.create_bind_group_layout(
            "material_bind_group_layout",
            &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        );

        let frame_buffer = ctx.create_buffer_init(
            "Frame Buffer",
            &[FrameUniform::zeroed()],
            wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        );
        let frame_bind_group = ctx.create_bind_group(
            "frame_bind_group",
            &frame_layout,
            &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        );

        let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Preview Pipeline Layout"),
            bind_group_layouts: &[&frame_layout, &material_layout],
            push_constant_ranges: &[],
        });

        let white = GpuTexture::from_image(&ctx, &TextureImage::white());
        let wrap_sampler = create_sampler(&ctx, AddressMode::Wrap);
        let clamp_sampler = create_sampler(&ctx, AddressMode::Clamp);

        let fallback_uniform = ctx.create_buffer_init(
            "Fallback Uniform",
            &[MaterialUniform::from(&default_material())],
            wgpu::BufferUsages::UNIFORM,
        );
        let fallback_group = ctx.create_bind_group(
            "__default__",
            &material_layout,
            &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: fallback_uniform.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&white.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&wrap_sampler),
                },
            ],
        );

        tracing::info!(
            "Render surface {}x{} {:?}, {:?}, {} sample(s)",
            width,
            height,
            format,
            surface_config.present_mode,
            sample_count
        );

        Ok(Self {
            state: Some(GpuState {
                ctx,
                surface,
                surface_config,
                sample_count,
                targets,
                frame_buffer,
                frame_bind_group,
                material_layout,
                pipeline_layout,
                shaders: ShaderGenerator::new(),
                pipelines: HashMap::new(),
                wrap_sampler,
                clamp_sampler,
                white,
                fallback: GpuMaterial {
                    variant: ShaderVariant { textured: false },
                    _uniform: fallback_uniform,
                    bind_group: fallback_group,
                },
                textures: HashMap::new(),
                materials: HashMap::new(),
                mesh: None,
                pending: None,
            }),
            info,
            options,
        })
    }

    fn state_mut(&mut self) -> Result<&mut GpuState> {
        self.state.as_mut().ok_or(Error::NotInitialized)
    }

    pub fn options(&self) -> &SurfaceOptions {
        &self.options
    }
}

impl RenderBackend for WgpuBackend {
    fn info(&self) -> BackendInfo {
        self.info.clone()
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        let state = self.state_mut()?;
        state.pending = None;
        check_extent(
            "render surface",
            width,
            height,
            state.ctx.device.limits().max_texture_dimension_2d,
        )?;

        let mut config = state.surface_config.clone();
        config.width = width;
        config.height = height;
        let targets = state.ctx.validated("surface resize", || {
            state.surface.configure(&state.ctx.device, &config);
            RenderTargets::new(&state.ctx, config.format, width, height, state.sample_count)
        })?;
        state.surface_config = config;
        state.targets = targets;
        Ok(())
    }

    fn register_scene(&mut self, _lighting: &SceneLighting) -> Result<()> {
        let state = self.state_mut()?;
        for textured in [false, true] {
            state.ensure_pipeline(ShaderVariant { textured })?;
        }
        Ok(())
    }

    fn upload_texture(&mut self, image: &TextureImage) -> Result<()> {
        let state = self.state_mut()?;
        if !state.textures.contains_key(&image.name) {
            check_image(image, state.ctx.device.limits().max_texture_dimension_2d)?;
            let label = format!("texture upload {}", image.name);
            let texture = state.ctx.validated(&label, || GpuTexture::from_image(&state.ctx, image))?;
            state.textures.insert(image.name.clone(), texture);
        }
        Ok(())
    }

    fn register_material(&mut self, material: &PreviewMaterial) -> Result<()> {
        let state = self.state_mut()?;
        state.ensure_pipeline(ShaderVariant::for_material(material))?;
        let gpu_material = state.build_material(material);
        state.materials.insert(material.name.clone(), gpu_material);
        Ok(())
    }

    fn upload_mesh(&mut self, mesh: &MeshData, materials: &[String]) -> Result<()> {
        let state = self.state_mut()?;
        let mut vertices: Vec<PreviewVertex> = Vec::new();
        let mut indices: Vec<u32> = Vec::new();
        let mut draws = Vec::new();

        for (i, sub) in mesh.submeshes.iter().enumerate() {
            if sub.is_empty() {
                continue;
            }
            draws.push(SubmeshDraw {
                first_index: indices.len() as u32,
                index_count: sub.indices.len() as u32,
                base_vertex: vertices.len() as i32,
                material: materials.get(i).cloned().unwrap_or_default(),
            });
            vertices.extend(submesh_vertices(sub));
            indices.extend_from_slice(&sub.indices);
        }

        if draws.is_empty() {
            return Err(Error::InvalidData(format!("{} has no triangles", mesh.name)));
        }

        let max_buffer = state.ctx.device.limits().max_buffer_size;
        let vertex_bytes = std::mem::size_of_val(vertices.as_slice()) as u64;
        if vertex_bytes > max_buffer {
            return Err(Error::Gpu(format!(
                "{} needs a {} byte vertex buffer, device limit is {}",
                mesh.name, vertex_bytes, max_buffer
            )));
        }

        let (vertex_buffer, index_buffer) = state.ctx.validated("mesh upload", || {
            (
                state.ctx.create_buffer_init("Mesh Vertex Buffer", &vertices, wgpu::BufferUsages::VERTEX),
                state.ctx.create_buffer_init("Mesh Index Buffer", &indices, wgpu::BufferUsages::INDEX),
            )
        })?;
        state.mesh = Some(GpuMesh {
            vertex_buffer,
            index_buffer,
            draws,
        });
        Ok(())
    }

    fn release_mesh(&mut self) {
        if let Some(state) = self.state.as_mut() {
            state.mesh = None;
        }
    }

    fn clear_group_resources(&mut self) {
        if let Some(state) = self.state.as_mut() {
            state.materials.clear();
            state.textures.clear();
        }
    }

    fn render_one_frame(&mut self, frame: &FrameParams) -> Result<()> {
        let auto_update = self.options.auto_update;
        let state = self.state_mut()?;

        // Pipelines for every variant the mesh draws with
        let mut variants = vec![state.fallback.variant];
        if let Some(mesh) = &state.mesh {
            for draw in &mesh.draws {
                if let Some(material) = state.materials.get(&draw.material) {
                    variants.push(material.variant);
                }
            }
        }
        for variant in variants {
            state.ensure_pipeline(variant)?;
        }

        let output = match state.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost) | Err(wgpu::SurfaceError::Outdated) => {
                tracing::debug!("Surface lost or outdated, reconfiguring");
                state.surface.configure(&state.ctx.device, &state.surface_config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                tracing::debug!("Timed out acquiring a frame");
                return Ok(());
            }
            Err(e) => return Err(Error::Gpu(format!("Failed to acquire frame: {}", e))),
        };
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        state
            .ctx
            .queue
            .write_buffer(&state.frame_buffer, 0, bytemuck::bytes_of(&FrameUniform::new(frame)));

        let mut encoder = state.ctx.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Preview Render Encoder"),
        });

        // Determine render target
        let (color_attachment, resolve_target) = match &state.targets.msaa_view {
            Some(msaa_view) => (msaa_view, Some(&view)),
            None => (&view, None),
        };
        let [r, g, b, a] = frame.lighting.background;

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Preview Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: color_attachment,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: a as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &state.targets.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if let Some(mesh) = &state.mesh {
                render_pass.set_bind_group(0, &state.frame_bind_group, &[]);
                render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);

                for draw in &mesh.draws {
                    let material = state.materials.get(&draw.material).unwrap_or(&state.fallback);
                    let Some(pipeline) = state.pipelines.get(&material.variant) else {
                        continue;
                    };
                    render_pass.set_pipeline(pipeline);
                    render_pass.set_bind_group(1, &material.bind_group, &[]);
                    render_pass.draw_indexed(
                        draw.first_index..draw.first_index + draw.index_count,
                        draw.base_vertex,
                        0..1,
                    );
                }
            }
        }

        state.ctx.queue.submit(std::iter::once(encoder.finish()));

        if auto_update {
            output.present();
        } else {
            state.pending = Some(output);
        }
        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        let state = self.state_mut()?;
        if let Some(output) = state.pending.take() {
            output.present();
        }
        Ok(())
    }

    fn shutdown(&mut self) {
        let Some(mut state) = self.state.take() else {
            return;
        };
        // Reverse order of creation: frame in flight, geometry, materials, device
        state.pending = None;
        state.mesh = None;
        state.materials.clear();
        state.textures.clear();
        let _ = state.ctx.device.poll(wgpu::Maintain::Wait);
        drop(state);
        tracing::info!("Render backend shut down");
    }
}

impl Drop for WgpuBackend {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Starts a [`WgpuBackend`] on the surface supplied by a [`WindowStrategy`]
pub struct WgpuBootstrap<S: WindowStrategy> {
    strategy: S,
    preference: BackendPreference,
    options: SurfaceOptions,
}

impl<S: WindowStrategy> WgpuBootstrap<S> {
    /// Bootstrap with the environment-adjusted backend order and default surface options
    pub fn new(strategy: S) -> Self {
        Self {
            strategy,
            preference: BackendPreference::from_env(),
            options: SurfaceOptions::default(),
        }
    }

    pub fn with_preference(mut self, preference: BackendPreference) -> Self {
        self.preference = preference;
        self
    }

    pub fn with_options(mut self, options: SurfaceOptions) -> Self {
        self.options = options;
        self
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }
}

impl<S: WindowStrategy> BackendBootstrap for WgpuBootstrap<S> {
    type Backend = WgpuBackend;

    fn start(&self, width: u32, height: u32) -> Result<WgpuBackend> {
        tracing::info!("Starting render backend on {}", self.strategy.describe());
        let (ctx, surface) = pollster::block_on(GpuContext::for_surface(&self.strategy, &self.preference))?;
        WgpuBackend::new(ctx, surface, width, height, self.options.clone())
    }
}
