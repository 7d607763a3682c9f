//! # MeshView
//!
//! An embeddable real-time 3D mesh preview.
//!
//! This is the umbrella crate that provides convenient access to all MeshView functionality.
//! Hosts that only need part of the stack (a mesh reader, the texture resolver) can depend
//! on the individual crates instead.
//!
//! ## Features
//!
//! - **Core**: Mesh geometry, preview materials and the render backend seam
//! - **I/O**: Mesh readers keyed by file extension (OBJ built in)
//! - **Assets**: Resource location discovery, texture lookup and material synthesis
//! - **GPU**: wgpu renderer that draws into a window owned by the host
//! - **Preview**: Render context, orbit camera, render loop and the host-facing widget
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use meshview::prelude::*;
//! use std::path::Path;
//! use std::time::Instant;
//!
//! # fn hwnd() -> isize { 0 }
//! let window = HostWindow::win32(hwnd())?;
//! // SAFETY: the host keeps the window alive until `destroy`.
//! let mut widget = unsafe {
//!     PreviewWidget::attach(window, TimerQueue::new(Instant::now()), 640, 480, PreviewConfig::default())
//! };
//! widget.load_mesh(Path::new("assets/models/tank.obj"))?;
//! # Ok::<(), meshview::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `default`: Enables preview and everything it needs
//! - `io`: Mesh readers
//! - `assets`: Texture resolution and material synthesis
//! - `gpu`: The wgpu renderer
//! - `preview`: The embeddable preview (implies `io`, `assets` and `gpu`)

// Re-export core functionality
pub use meshview_core::*;

// Re-export sub-crates
#[cfg(feature = "io")]
pub use meshview_io as io;

#[cfg(feature = "assets")]
pub use meshview_assets as assets;

#[cfg(feature = "gpu")]
pub use meshview_gpu as gpu;

#[cfg(feature = "preview")]
pub use meshview_preview as preview;

/// Convenient imports for common use cases
pub mod prelude {
    pub use meshview_core::*;

    #[cfg(feature = "io")]
    pub use meshview_io::{MeshReader, ObjReader, ReaderRegistry};

    #[cfg(feature = "assets")]
    pub use meshview_assets::{collect_locations_with_hints, MaterialSynthesizer, ResourceGroup};

    #[cfg(feature = "gpu")]
    pub use meshview_gpu::{ExternalWindow, HostWindow, OwnedWindow, SurfaceOptions, WgpuBackend, WgpuBootstrap};

    #[cfg(feature = "preview")]
    pub use meshview_preview::{
        HostScheduler, OrbitController, PointerButton, PreviewConfig, PreviewWidget, RenderContext, TimerId,
        TimerQueue, ViewState,
    };
}
