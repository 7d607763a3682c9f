//! Embedded Preview Example
//!
//! The host creates and owns the window; the preview only receives its
//! native handle, exactly as a level editor or asset browser would embed it.
//!
//! Usage: embedded_preview [path/to/mesh.obj]

mod host;

use meshview_gpu::HostWindow;
use meshview_preview::{PreviewConfig, PreviewWidget, TimerQueue};
use std::sync::Arc;
use std::time::Instant;
use winit::event_loop::EventLoop;
use winit::window::WindowBuilder;

fn main() -> anyhow::Result<()> {
    host::init_logging()?;

    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title("MeshView")
            .with_inner_size(winit::dpi::PhysicalSize::new(host::WINDOW_WIDTH, host::WINDOW_HEIGHT))
            .build(&event_loop)?,
    );

    let handle = HostWindow::from_window(&*window)?;
    let size = window.inner_size();
    // SAFETY: `host::run` keeps `window` alive and destroys the widget before the loop exits.
    let widget = unsafe {
        PreviewWidget::attach(
            handle,
            TimerQueue::new(Instant::now()),
            size.width,
            size.height,
            PreviewConfig::default(),
        )
    };

    host::run(event_loop, window, widget, host::mesh_argument())
}
