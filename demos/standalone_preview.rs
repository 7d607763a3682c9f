//! Standalone Preview Example
//!
//! The preview opens its own winit window and renders into it through the
//! same widget an embedding host would use.
//!
//! Usage: standalone_preview [path/to/mesh.obj]

mod host;

use meshview_gpu::{OwnedWindow, SurfaceOptions, WgpuBootstrap};
use meshview_preview::{PreviewConfig, PreviewWidget, TimerQueue};
use std::time::Instant;
use winit::event_loop::EventLoop;

fn main() -> anyhow::Result<()> {
    host::init_logging()?;

    let event_loop = EventLoop::new()?;
    let owned = OwnedWindow::create(&event_loop, "MeshView", host::WINDOW_WIDTH, host::WINDOW_HEIGHT)?;
    let window = owned.window().clone();

    let config = PreviewConfig {
        surface: SurfaceOptions {
            vsync: true,
            msaa_samples: 4,
            ..SurfaceOptions::default()
        },
        ..PreviewConfig::default()
    };
    let bootstrap = WgpuBootstrap::new(owned).with_options(config.surface.clone());
    let size = window.inner_size();
    let widget = PreviewWidget::create(&bootstrap, TimerQueue::new(Instant::now()), size.width, size.height, config);

    host::run(event_loop, window, widget, host::mesh_argument())
}
