//! GPU device management and backend selection

use crate::surface::WindowStrategy;
use meshview_core::{BackendInfo, Error, Result};
use serde::{Deserialize, Serialize};
use wgpu::util::DeviceExt;

/// Environment variable that moves one backend to the front of the preference list
pub const BACKEND_ENV: &str = "MESHVIEW_BACKEND";

/// Graphics APIs the preview knows how to ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BackendKind {
    Dx12,
    Vulkan,
    Metal,
    Gl,
}

impl BackendKind {
    pub fn backends(self) -> wgpu::Backends {
        match self {
            BackendKind::Dx12 => wgpu::Backends::DX12,
            BackendKind::Vulkan => wgpu::Backends::VULKAN,
            BackendKind::Metal => wgpu::Backends::METAL,
            BackendKind::Gl => wgpu::Backends::GL,
        }
    }

    /// Parse names such as `vulkan`, `VK`, `dx12`, `opengl`
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "dx12" | "d3d12" => Some(BackendKind::Dx12),
            "vulkan" | "vk" => Some(BackendKind::Vulkan),
            "metal" | "mtl" => Some(BackendKind::Metal),
            "gl" | "opengl" | "gles" => Some(BackendKind::Gl),
            _ => None,
        }
    }
}

/// Ordered list of backends to try before falling back to any available one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendPreference {
    pub order: Vec<BackendKind>,
}

impl Default for BackendPreference {
    fn default() -> Self {
        Self {
            order: vec![
                BackendKind::Dx12,
                BackendKind::Vulkan,
                BackendKind::Metal,
                BackendKind::Gl,
            ],
        }
    }
}

impl BackendPreference {
    /// Default order adjusted by [`BACKEND_ENV`]
    pub fn from_env() -> Self {
        Self::default().with_override(std::env::var(BACKEND_ENV).ok().as_deref())
    }

    /// Move the named backend to the front. Unknown names are logged and ignored.
    pub fn with_override(mut self, name: Option<&str>) -> Self {
        let Some(name) = name else {
            return self;
        };
        match BackendKind::from_name(name) {
            Some(kind) => {
                self.order.retain(|k| *k != kind);
                self.order.insert(0, kind);
            }
            None => tracing::warn!("Ignoring unknown backend '{}' in {}", name, BACKEND_ENV),
        }
        self
    }

    /// Backend masks in the order they are attempted, ending with a catch-all
    pub fn candidates(&self) -> Vec<wgpu::Backends> {
        let mut masks: Vec<wgpu::Backends> = self.order.iter().map(|k| k.backends()).collect();
        masks.push(wgpu::Backends::all());
        masks
    }
}

/// GPU context for rendering into one surface
pub struct GpuContext {
    pub instance: wgpu::Instance,
    pub adapter: wgpu::Adapter,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
}

impl GpuContext {
    /// Walk the preference list until an adapter can drive a surface from `strategy`.
    ///
    /// Each candidate gets a fresh instance and surface. Fails with
    /// [`Error::NoBackend`] when no candidate yields an adapter.
    pub async fn for_surface<S: WindowStrategy>(
        strategy: &S,
        preference: &BackendPreference,
    ) -> Result<(Self, wgpu::Surface<'static>)> {
        for backends in preference.candidates() {
            let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
                backends,
                flags: wgpu::InstanceFlags::default(),
                ..Default::default()
            });

            let surface = match strategy.create_surface(&instance) {
                Ok(surface) => surface,
                Err(e) => {
                    tracing::debug!("No surface for {:?}: {}", backends, e);
                    continue;
                }
            };

            let Some(adapter) = instance
                .request_adapter(&wgpu::RequestAdapterOptions {
                    power_preference: wgpu::PowerPreference::HighPerformance,
                    compatible_surface: Some(&surface),
                    force_fallback_adapter: false,
                })
                .await
            else {
                tracing::debug!("No adapter for {:?}", backends);
                continue;
            };

            let (device, queue) = adapter
                .request_device(
                    &wgpu::DeviceDescriptor {
                        label: Some("MeshView Device"),
                        required_features: wgpu::Features::empty(),
                        required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                            .using_resolution(adapter.limits()),
                    },
                    None,
                )
                .await
                .map_err(|e| Error::Gpu(format!("Failed to create device: {}", e)))?;

            let context = Self {
                instance,
                adapter,
                device,
                queue,
            };
            let info = context.info();
            tracing::info!("Selected {} on {}", info.api, info.adapter);
            return Ok((context, surface));
        }

        tracing::error!("No rendering backend could drive the surface");
        Err(Error::NoBackend)
    }

    pub fn info(&self) -> BackendInfo {
        let info = self.adapter.get_info();
        BackendInfo {
            api: format!("{:?}", info.backend),
            adapter: info.name,
        }
    }

    /// Create a buffer from data
    pub fn create_buffer_init<T: bytemuck::Pod>(&self, label: &str, data: &[T], usage: wgpu::BufferUsages) -> wgpu::Buffer {
        self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(data),
            usage,
        })
    }

    /// Create a shader module from WGSL source, reporting validation errors
    pub fn create_shader_module(&self, label: &str, source: &str) -> Result<wgpu::ShaderModule> {
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let module = self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });
        match pollster::block_on(self.device.pop_error_scope()) {
            Some(e) => Err(Error::Gpu(format!("{} failed validation: {}", label, e))),
            None => Ok(module),
        }
    }

    /// Run `f` inside validation and out-of-memory error scopes, turning any
    /// captured error into `Err` instead of the device's panicking handler
    pub fn validated<T>(&self, label: &str, f: impl FnOnce() -> T) -> Result<T> {
        self.device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let value = f();
        let validation = pollster::block_on(self.device.pop_error_scope());
        let out_of_memory = pollster::block_on(self.device.pop_error_scope());
        match validation.or(out_of_memory) {
            Some(e) => Err(Error::Gpu(format!("{} failed: {}", label, e))),
            None => Ok(value),
        }
    }

    /// Create a bind group layout
    pub fn create_bind_group_layout(&self, label: &str, entries: &[wgpu::BindGroupLayoutEntry]) -> wgpu::BindGroupLayout {
        self.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(label),
            entries,
        })
    }

    /// Create a bind group
    pub fn create_bind_group(&self, label: &str, layout: &wgpu::BindGroupLayout, entries: &[wgpu::BindGroupEntry]) -> wgpu::BindGroup {
        self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries,
        })
    }
}
