//! # MeshView GPU
//!
//! wgpu rendering engine for the mesh preview.
//!
//! The engine never opens a window on its own. A [`WindowStrategy`]
//! supplies the surface: [`ExternalWindow`] attaches to a native handle
//! owned by the host, [`OwnedWindow`] wraps a winit window.
//!
//! ```rust,no_run
//! use meshview_core::{BackendBootstrap, RenderBackend};
//! use meshview_gpu::{ExternalWindow, HostWindow, WgpuBootstrap};
//!
//! fn attach(hwnd: isize) -> meshview_core::Result<()> {
//!     let host = HostWindow::win32(hwnd)?;
//!     // SAFETY: the host keeps the window alive until the backend is shut down
//!     let strategy = unsafe { ExternalWindow::new(host) };
//!     let mut backend = WgpuBootstrap::new(strategy).start(640, 480)?;
//!     println!("{:?}", backend.info());
//!     backend.shutdown();
//!     Ok(())
//! }
//! ```

pub mod device;
pub mod renderer;
pub mod shader_gen;
pub mod surface;
pub mod texture;

// Re-export commonly used items
pub use device::{BackendKind, BackendPreference, GpuContext, BACKEND_ENV};
pub use renderer::{FrameUniform, MaterialUniform, PreviewVertex, WgpuBackend, WgpuBootstrap};
pub use shader_gen::{ShaderGenerator, ShaderVariant};
pub use surface::{ExternalWindow, HostWindow, OwnedWindow, SurfaceOptions, WindowStrategy};
