//! Render surface sources
//!
//! A [`WindowStrategy`] decides where the surface comes from. Embedding
//! hosts use [`ExternalWindow`], which draws into a window the host owns
//! and never closes. [`OwnedWindow`] wraps a winit window for standalone use.

use meshview_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::ffi::{c_int, c_ulong, c_void};
use std::num::NonZeroIsize;
use std::ptr::NonNull;
use std::sync::Arc;
use wgpu::rwh::{
    HasDisplayHandle, HasWindowHandle, RawDisplayHandle, RawWindowHandle, Win32WindowHandle,
    WindowsDisplayHandle, XlibDisplayHandle, XlibWindowHandle,
};

/// Render surface configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceOptions {
    pub vsync: bool,
    /// 1 disables multisampling
    pub msaa_samples: u32,
    /// Present as soon as a frame is rendered instead of waiting for an explicit present
    pub auto_update: bool,
    pub min_width: u32,
    pub min_height: u32,
    pub background: [f32; 4],
}

impl Default for SurfaceOptions {
    fn default() -> Self {
        Self {
            vsync: false,
            msaa_samples: 1,
            auto_update: false,
            min_width: 100,
            min_height: 100,
            background: [0.08, 0.08, 0.10, 1.0],
        }
    }
}

impl SurfaceOptions {
    /// Clamp a requested size to the configured minimum
    pub fn clamp_size(&self, width: u32, height: u32) -> (u32, u32) {
        (width.max(self.min_width), height.max(self.min_height))
    }

    pub fn present_mode(&self) -> wgpu::PresentMode {
        if self.vsync {
            wgpu::PresentMode::AutoVsync
        } else {
            wgpu::PresentMode::AutoNoVsync
        }
    }

    /// Sample count actually used; anything other than 4 falls back to 1
    pub fn sample_count(&self) -> u32 {
        if self.msaa_samples == 4 {
            4
        } else {
            1
        }
    }
}

/// Supplies the surface a backend renders into
pub trait WindowStrategy {
    /// Create a surface for `instance`
    fn create_surface(&self, instance: &wgpu::Instance) -> Result<wgpu::Surface<'static>>;

    /// Short description for logs
    fn describe(&self) -> String;
}

/// Raw native handles of a window owned by the host application
#[derive(Debug, Clone, Copy)]
pub struct HostWindow {
    window: RawWindowHandle,
    display: RawDisplayHandle,
}

impl HostWindow {
    pub fn from_raw(window: RawWindowHandle, display: RawDisplayHandle) -> Self {
        Self { window, display }
    }

    /// A Win32 `HWND`
    pub fn win32(hwnd: isize) -> Result<Self> {
        let hwnd = NonZeroIsize::new(hwnd)
            .ok_or_else(|| Error::Surface("window handle is null".to_string()))?;
        Ok(Self::from_raw(
            RawWindowHandle::Win32(Win32WindowHandle::new(hwnd)),
            RawDisplayHandle::Windows(WindowsDisplayHandle::new()),
        ))
    }

    /// An X11 window on an Xlib display connection
    pub fn xlib(window: c_ulong, display: *mut c_void, screen: c_int) -> Result<Self> {
        if window == 0 {
            return Err(Error::Surface("window handle is null".to_string()));
        }
        Ok(Self::from_raw(
            RawWindowHandle::Xlib(XlibWindowHandle::new(window)),
            RawDisplayHandle::Xlib(XlibDisplayHandle::new(NonNull::new(display), screen)),
        ))
    }

    /// Capture the handles of any window that exposes them
    pub fn from_window<W: HasWindowHandle + HasDisplayHandle>(window: &W) -> Result<Self> {
        let window_handle = window
            .window_handle()
            .map_err(|e| Error::Surface(format!("window handle unavailable: {}", e)))?;
        let display_handle = window
            .display_handle()
            .map_err(|e| Error::Surface(format!("display handle unavailable: {}", e)))?;
        Ok(Self::from_raw(window_handle.as_raw(), display_handle.as_raw()))
    }
}

/// Attach to a window owned by someone else. The window is never created,
/// resized or destroyed from this side.
pub struct ExternalWindow {
    host: HostWindow,
}

impl ExternalWindow {
    /// # Safety
    ///
    /// The window behind `host` must stay alive, and keep the same handle,
    /// until every surface created from this strategy has been dropped.
    pub unsafe fn new(host: HostWindow) -> Self {
        Self { host }
    }
}

impl WindowStrategy for ExternalWindow {
    fn create_surface(&self, instance: &wgpu::Instance) -> Result<wgpu::Surface<'static>> {
        // SAFETY: the caller of `ExternalWindow::new` guarantees the handle outlives the surface.
        unsafe {
            instance.create_surface_unsafe(wgpu::SurfaceTargetUnsafe::RawHandle {
                raw_display_handle: self.host.display,
                raw_window_handle: self.host.window,
            })
        }
        .map_err(|e| Error::Surface(format!("cannot attach to host window: {}", e)))
    }

    fn describe(&self) -> String {
        format!("external window {:?}", self.host.window)
    }
}

/// Render into a winit window created for the preview
pub struct OwnedWindow {
    window: Arc<winit::window::Window>,
}

impl OwnedWindow {
    pub fn new(window: Arc<winit::window::Window>) -> Self {
        Self { window }
    }

    /// Build a top-level window on `target`
    pub fn create<T: 'static>(
        target: &winit::event_loop::EventLoopWindowTarget<T>,
        title: &str,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        let window = winit::window::WindowBuilder::new()
            .with_title(title)
            .with_inner_size(winit::dpi::PhysicalSize::new(width, height))
            .build(target)
            .map_err(|e| Error::Surface(format!("cannot create window: {}", e)))?;
        Ok(Self::new(Arc::new(window)))
    }

    pub fn window(&self) -> &Arc<winit::window::Window> {
        &self.window
    }
}

impl WindowStrategy for OwnedWindow {
    fn create_surface(&self, instance: &wgpu::Instance) -> Result<wgpu::Surface<'static>> {
        instance
            .create_surface(self.window.clone())
            .map_err(|e| Error::Surface(format!("cannot create surface: {}", e)))
    }

    fn describe(&self) -> String {
        format!("owned window {:?}", self.window.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_is_clamped_to_minimum() {
        let options = SurfaceOptions::default();
        assert_eq!(options.clamp_size(40, 600), (100, 600));
        assert_eq!(options.clamp_size(0, 0), (100, 100));
    }

    #[test]
    fn test_defaults_favor_latency() {
        let options = SurfaceOptions::default();
        assert_eq!(options.present_mode(), wgpu::PresentMode::AutoNoVsync);
        assert_eq!(options.sample_count(), 1);
        assert!(!options.auto_update);
    }

    #[test]
    fn test_null_handles_are_rejected() {
        assert!(HostWindow::win32(0).is_err());
        assert!(HostWindow::xlib(0, std::ptr::null_mut(), 0).is_err());
        assert!(HostWindow::win32(0x1234).is_ok());
    }
}
