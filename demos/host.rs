//! A minimal winit host shared by the demos.
//!
//! It plays the part of the application that embeds the preview: it owns
//! the window, forwards pointer and resize events, and fires the preview's
//! timers from its own event loop.

use meshview_core::RenderBackend;
use meshview_preview::diagnostics::{self, session_log_path, DiagnosticsConfig};
use meshview_preview::{PointerButton, PreviewWidget, TimerQueue};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use winit::event::{ElementState, Event, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::Window;

pub const WINDOW_WIDTH: u32 = 960;
pub const WINDOW_HEIGHT: u32 = 640;

/// Route logs to stderr and a session file in the temp directory
pub fn init_logging() -> anyhow::Result<()> {
    let config = DiagnosticsConfig {
        log_file: Some(session_log_path(&std::env::temp_dir())),
        ..DiagnosticsConfig::default()
    };
    diagnostics::install(&config, None)?;
    Ok(())
}

/// Mesh path from the first command line argument
pub fn mesh_argument() -> Option<PathBuf> {
    std::env::args().nth(1).map(PathBuf::from)
}

fn pointer_button(button: MouseButton) -> Option<PointerButton> {
    match button {
        MouseButton::Left => Some(PointerButton::Left),
        MouseButton::Right => Some(PointerButton::Right),
        MouseButton::Middle => Some(PointerButton::Middle),
        _ => None,
    }
}

fn load<B: RenderBackend>(widget: &mut PreviewWidget<B, TimerQueue>, path: &Path) {
    match widget.load_mesh(path) {
        Ok(diameter) => tracing::info!("Previewing {} (diameter {:.2})", path.display(), diameter),
        Err(e) => tracing::warn!("Could not preview {}: {}", path.display(), e),
    }
}

/// Drive `widget` from the winit event loop until the window closes.
/// Files dropped on the window are loaded like the initial `mesh`.
pub fn run<B: RenderBackend>(
    event_loop: EventLoop<()>,
    window: Arc<Window>,
    mut widget: PreviewWidget<B, TimerQueue>,
    mesh: Option<PathBuf>,
) -> anyhow::Result<()> {
    if let Some(path) = &mesh {
        load(&mut widget, path);
    }

    println!("Controls:");
    println!("  Left drag:   orbit");
    println!("  Right drag:  zoom");
    println!("  Middle drag: pan");
    println!("  Wheel:       zoom");
    println!("  Drop a mesh file on the window to preview it");

    let mut cursor = (0.0, 0.0);
    let mut shown_status = String::new();

    event_loop.run(move |event, target| {
        match event {
            Event::WindowEvent { event, window_id } if window_id == window.id() => match event {
                WindowEvent::CloseRequested => {
                    widget.destroy();
                    target.exit();
                }
                WindowEvent::Resized(size) => {
                    widget.resize(size.width, size.height);
                }
                WindowEvent::MouseInput { state, button, .. } => {
                    if let Some(button) = pointer_button(button) {
                        match state {
                            ElementState::Pressed => widget.press(button, cursor.0, cursor.1),
                            ElementState::Released => widget.release(button),
                        }
                    }
                }
                WindowEvent::CursorMoved { position, .. } => {
                    cursor = (position.x, position.y);
                    widget.motion(position.x, position.y);
                }
                WindowEvent::MouseWheel { delta, .. } => {
                    let steps = match delta {
                        MouseScrollDelta::LineDelta(_, y) => y as f64,
                        MouseScrollDelta::PixelDelta(pos) => pos.y / 100.0,
                    };
                    widget.wheel(steps);
                }
                WindowEvent::DroppedFile(path) => {
                    load(&mut widget, &path);
                }
                _ => {}
            },
            Event::AboutToWait => {
                for id in widget.host_mut().due(Instant::now()) {
                    widget.on_timer(id);
                }
                match widget.host().next_deadline() {
                    Some(deadline) => target.set_control_flow(ControlFlow::WaitUntil(deadline)),
                    None => target.set_control_flow(ControlFlow::Wait),
                }
            }
            Event::LoopExiting => {
                widget.destroy();
            }
            _ => {}
        }

        let status = widget.status_text();
        if status != shown_status {
            window.set_title(&format!("MeshView - {}", status.replace('\n', " ")));
            shown_status = status;
        }
    })?;

    Ok(())
}
