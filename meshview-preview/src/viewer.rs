//! Host-facing preview widget
//!
//! [`PreviewWidget`] ties a [`RenderContext`], an [`OrbitController`] and a
//! [`RenderLoop`] together behind the calls a host UI makes: create, load,
//! resize, pointer input, timer callbacks and destroy. Failures never panic;
//! they become a [`ViewState`] the host renders as text.

use crate::config::PreviewConfig;
use crate::context::RenderContext;
use crate::orbit::{OrbitController, PointerButton};
use crate::scheduler::{HostScheduler, RenderLoop, TimerId};
use meshview_core::{BackendBootstrap, Error, RenderBackend, Result};
use meshview_gpu::{ExternalWindow, HostWindow, WgpuBackend, WgpuBootstrap};
use std::path::{Path, PathBuf};

/// Shown before the first mesh is loaded
pub const PLACEHOLDER_TEXT: &str = "Select a mesh file\nand click PREVIEW";

/// Shown under an active preview
pub const CONTROLS_HINT: &str = "LMB: Orbit   RMB: Zoom   MMB: Pan";

/// Hosts ignore resize events at or below this many pixels
pub const MIN_RESIZE_EXTENT: u32 = 10;

/// What the widget currently shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    /// No mesh loaded yet
    Placeholder,
    /// A mesh is on screen
    Active,
    /// Loading or rendering failed; another load may succeed
    Error(String),
    /// The engine could not start; the preview is off for this session
    Disabled(String),
}

/// An embeddable mesh preview
pub struct PreviewWidget<B: RenderBackend, H: HostScheduler> {
    context: Option<RenderContext<B>>,
    orbit: OrbitController,
    render_loop: RenderLoop,
    host: H,
    state: ViewState,
    /// Set by a failed frame; the loop stays stopped for the rest of the session
    render_error: Option<String>,
}

impl<B: RenderBackend, H: HostScheduler> PreviewWidget<B, H> {
    /// Start the engine on the surface `bootstrap` provides.
    ///
    /// Never fails: if the engine cannot start, the widget is created in
    /// [`ViewState::Disabled`] and every later call is a no-op.
    pub fn create<S>(bootstrap: &S, host: H, width: u32, height: u32, config: PreviewConfig) -> Self
    where
        S: BackendBootstrap<Backend = B>,
    {
        let orbit = OrbitController::new(config.orbit.clone());
        let render_loop = RenderLoop::new(config.scheduler.interval());

        let (context, state) = match RenderContext::initialize(bootstrap, width, height, config.surface) {
            Ok(mut context) => {
                context.apply_camera(&orbit.camera_pose());
                (Some(context), ViewState::Placeholder)
            }
            Err(e) => {
                tracing::error!("Preview initialization failed: {}", e);
                (None, ViewState::Disabled(e.to_string()))
            }
        };

        Self {
            context,
            orbit,
            render_loop,
            host,
            state,
            render_error: None,
        }
    }

    pub fn view_state(&self) -> &ViewState {
        &self.state
    }

    /// Text the host should display over or under the viewport
    pub fn status_text(&self) -> String {
        match &self.state {
            ViewState::Placeholder => PLACEHOLDER_TEXT.to_string(),
            ViewState::Active => CONTROLS_HINT.to_string(),
            ViewState::Error(message) => format!("Preview error:\n{}", message),
            ViewState::Disabled(message) => format!("Preview unavailable:\n{}", message),
        }
    }

    pub fn context(&self) -> Option<&RenderContext<B>> {
        self.context.as_ref()
    }

    pub fn orbit(&self) -> &OrbitController {
        &self.orbit
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn is_rendering(&self) -> bool {
        self.render_loop.is_running()
    }

    /// Show the mesh at `path`; returns its bounding diameter
    pub fn load_mesh(&mut self, path: &Path) -> Result<f64> {
        self.load_mesh_with_hints(path, &[])
    }

    /// Show the mesh at `path`, also searching `hints` for textures
    pub fn load_mesh_with_hints(&mut self, path: &Path, hints: &[PathBuf]) -> Result<f64> {
        let Some(context) = self.context.as_mut() else {
            return Err(match &self.state {
                ViewState::Disabled(message) => Error::Disabled(message.clone()),
                _ => Error::NotInitialized,
            });
        };

        match context.load_mesh(path, hints) {
            Ok(diameter) => {
                self.orbit.reset_to_frame(diameter);
                context.apply_camera(&self.orbit.camera_pose());
                match &self.render_error {
                    Some(message) => {
                        tracing::warn!("Mesh loaded but rendering stays stopped after: {}", message);
                        self.state = ViewState::Error(message.clone());
                    }
                    None => {
                        self.state = ViewState::Active;
                        self.render_loop.start(&mut self.host);
                    }
                }
                Ok(diameter)
            }
            Err(e) => {
                self.render_loop.cancel(&mut self.host);
                self.state = ViewState::Error(e.to_string());
                Err(e)
            }
        }
    }

    /// Forward a host resize; tiny sizes from layout passes are ignored
    pub fn resize(&mut self, width: u32, height: u32) {
        if width <= MIN_RESIZE_EXTENT || height <= MIN_RESIZE_EXTENT {
            return;
        }
        if let Some(context) = self.context.as_mut() {
            context.resize(width, height);
        }
    }

    pub fn press(&mut self, button: PointerButton, x: f64, y: f64) {
        if self.context.is_some() {
            self.orbit.press(button, x, y);
        }
    }

    pub fn release(&mut self, button: PointerButton) {
        self.orbit.release(button);
    }

    /// Pointer moved to `(x, y)` in surface pixels
    pub fn motion(&mut self, x: f64, y: f64) {
        if self.orbit.pointer_moved(x, y) {
            self.apply_camera();
        }
    }

    /// A wheel step; positive zooms in
    pub fn wheel(&mut self, delta: f64) {
        if self.context.is_some() && self.orbit.wheel(delta) {
            self.apply_camera();
        }
    }

    fn apply_camera(&mut self) {
        if let Some(context) = self.context.as_mut() {
            context.apply_camera(&self.orbit.camera_pose());
        }
    }

    /// Timer callback from the host. Returns true if a frame was rendered.
    pub fn on_timer(&mut self, id: TimerId) -> bool {
        let Some(context) = self.context.as_mut() else {
            return false;
        };
        match self.render_loop.on_timer(id, &mut self.host, || context.render_frame()) {
            Ok(rendered) => rendered,
            Err(e) => {
                let message = e.to_string();
                self.render_error = Some(message.clone());
                self.state = ViewState::Error(message);
                false
            }
        }
    }

    /// Stop rendering and release the engine. Safe to call more than once.
    pub fn destroy(&mut self) {
        self.render_loop.cancel(&mut self.host);
        if let Some(mut context) = self.context.take() {
            context.shutdown();
        }
    }
}

impl<B: RenderBackend, H: HostScheduler> Drop for PreviewWidget<B, H> {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl<H: HostScheduler> PreviewWidget<WgpuBackend, H> {
    /// Attach a wgpu preview to a window owned by the host.
    ///
    /// # Safety
    ///
    /// The window behind `window` must outlive the widget, or at least the
    /// call to [`PreviewWidget::destroy`].
    pub unsafe fn attach(window: HostWindow, host: H, width: u32, height: u32, config: PreviewConfig) -> Self {
        // SAFETY: forwarded to the caller.
        let strategy = unsafe { ExternalWindow::new(window) };
        let bootstrap = WgpuBootstrap::new(strategy).with_options(config.surface.clone());
        Self::create(&bootstrap, host, width, height, config)
    }
}
