//! Embeddable mesh preview
//!
//! This crate drives a rendering backend from inside a host application's
//! UI loop:
//!
//! - [`RenderContext`] starts the engine on a host surface and owns the
//!   scene, the camera and the mesh on screen
//! - [`OrbitController`] turns pointer drags into orbit, zoom and pan
//! - [`RenderLoop`] redraws on timers the host provides through
//!   [`HostScheduler`]
//! - [`PreviewWidget`] bundles the three behind host-facing calls
//!
//! Logging goes through `tracing`; [`diagnostics::install`] routes it.
//!
//! ```no_run
//! use meshview_gpu::HostWindow;
//! use meshview_preview::{PreviewConfig, PreviewWidget, TimerQueue};
//! use std::path::Path;
//! use std::time::Instant;
//!
//! # fn hwnd() -> isize { 0 }
//! let window = HostWindow::win32(hwnd()).unwrap();
//! // SAFETY: the host keeps the window alive until `destroy`.
//! let mut widget = unsafe {
//!     PreviewWidget::attach(window, TimerQueue::new(Instant::now()), 640, 480, PreviewConfig::default())
//! };
//! match widget.load_mesh(Path::new("assets/models/tank.obj")) {
//!     Ok(diameter) => println!("framed at {:.1}", diameter),
//!     Err(_) => println!("{}", widget.status_text()),
//! }
//! for id in widget.host_mut().due(Instant::now()) {
//!     widget.on_timer(id);
//! }
//! widget.destroy();
//! ```

pub mod camera;
pub mod config;
pub mod context;
pub mod diagnostics;
pub mod orbit;
pub mod scene;
pub mod scheduler;
pub mod viewer;

pub use camera::Camera;
pub use config::{OrbitSettings, PreviewConfig, SchedulerSettings};
pub use context::{RenderContext, FALLBACK_DIAMETER};
pub use diagnostics::{DiagnosticsConfig, HostLogLayer, HostSink};
pub use orbit::{CameraPose, DragMode, OrbitController, OrbitState, PointerButton};
pub use scene::{Attachment, Entity, EntityId, NodeId, Scene, SceneNode};
pub use scheduler::{HostScheduler, RenderLoop, TimerId, TimerQueue};
pub use viewer::{PreviewWidget, ViewState, CONTROLS_HINT, PLACEHOLDER_TEXT};
