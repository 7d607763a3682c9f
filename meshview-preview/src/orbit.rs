//! Orbit, zoom and pan camera control driven by pointer drags
//!
//! The controller is an explicit state machine over [`DragMode`]. A button
//! press starts a drag only from [`DragMode::Idle`], and only the release of
//! the button that started it ends it, so two drags never overlap.

use crate::config::OrbitSettings;
use nalgebra::{Point3, Vector3};

/// Pointer buttons the host reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Left,
    Right,
    Middle,
}

/// What a pointer drag currently does to the camera
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragMode {
    #[default]
    Idle,
    Orbiting,
    Zooming,
    Panning,
}

impl DragMode {
    /// Drag started by `button`
    pub fn for_button(button: PointerButton) -> Self {
        match button {
            PointerButton::Left => DragMode::Orbiting,
            PointerButton::Right => DragMode::Zooming,
            PointerButton::Middle => DragMode::Panning,
        }
    }

    /// Button that ends this drag
    pub fn button(self) -> Option<PointerButton> {
        match self {
            DragMode::Idle => None,
            DragMode::Orbiting => Some(PointerButton::Left),
            DragMode::Zooming => Some(PointerButton::Right),
            DragMode::Panning => Some(PointerButton::Middle),
        }
    }
}

/// Spherical camera coordinates around a target point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitState {
    /// Degrees around the Y axis, unbounded
    pub yaw: f64,
    /// Degrees above the horizon, within [-89, 89]
    pub pitch: f64,
    pub distance: f64,
    pub target: Point3<f64>,
}

impl Default for OrbitState {
    fn default() -> Self {
        Self {
            yaw: 30.0,
            pitch: 25.0,
            distance: 200.0,
            target: Point3::origin(),
        }
    }
}

impl OrbitState {
    pub const PITCH_LIMIT: f64 = 89.0;

    /// Offset from the target to the camera
    pub fn offset(&self) -> Vector3<f64> {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        Vector3::new(
            yaw.sin() * pitch.cos(),
            pitch.sin(),
            yaw.cos() * pitch.cos(),
        ) * self.distance
    }

    /// Camera-local right and up axes
    fn view_axes(&self) -> (Vector3<f64>, Vector3<f64>) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        let right = Vector3::new(yaw.cos(), 0.0, -yaw.sin());
        let up = Vector3::new(
            -pitch.sin() * yaw.sin(),
            pitch.cos(),
            -pitch.sin() * yaw.cos(),
        );
        (right, up)
    }
}

/// Camera placement derived from an [`OrbitState`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub near_clip: f32,
}

/// Turns pointer input into orbit state changes
#[derive(Debug, Clone)]
pub struct OrbitController {
    settings: OrbitSettings,
    state: OrbitState,
    mode: DragMode,
    last_pointer: Option<(f64, f64)>,
}

impl Default for OrbitController {
    fn default() -> Self {
        Self::new(OrbitSettings::default())
    }
}

impl OrbitController {
    pub fn new(settings: OrbitSettings) -> Self {
        Self {
            settings,
            state: OrbitState::default(),
            mode: DragMode::Idle,
            last_pointer: None,
        }
    }

    pub fn settings(&self) -> &OrbitSettings {
        &self.settings
    }

    pub fn state(&self) -> &OrbitState {
        &self.state
    }

    pub fn mode(&self) -> DragMode {
        self.mode
    }

    /// Start a drag. Returns false when another drag is in progress.
    pub fn press(&mut self, button: PointerButton, x: f64, y: f64) -> bool {
        if self.mode != DragMode::Idle {
            return false;
        }
        self.mode = DragMode::for_button(button);
        self.last_pointer = Some((x, y));
        true
    }

    /// End the drag started by `button`
    pub fn release(&mut self, button: PointerButton) -> bool {
        if self.mode.button() != Some(button) {
            return false;
        }
        self.mode = DragMode::Idle;
        self.last_pointer = None;
        true
    }

    /// Feed an absolute pointer position. Returns true if the orbit changed.
    pub fn pointer_moved(&mut self, x: f64, y: f64) -> bool {
        let Some((last_x, last_y)) = self.last_pointer else {
            return false;
        };
        self.last_pointer = Some((x, y));

        let (dx, dy) = (x - last_x, y - last_y);
        if !dx.is_finite() || !dy.is_finite() || (dx == 0.0 && dy == 0.0) {
            return false;
        }

        match self.mode {
            DragMode::Idle => false,
            DragMode::Orbiting => {
                self.orbit(dx, dy);
                true
            }
            DragMode::Zooming => {
                self.scale_distance(1.0 + dy * self.settings.zoom_sensitivity);
                true
            }
            DragMode::Panning => {
                self.pan(dx, dy);
                true
            }
        }
    }

    /// A discrete wheel step; positive moves towards the target
    pub fn wheel(&mut self, delta: f64) -> bool {
        if delta == 0.0 || delta.is_nan() {
            return false;
        }
        let factor = if delta > 0.0 {
            self.settings.wheel_in
        } else {
            self.settings.wheel_out
        };
        self.scale_distance(factor);
        true
    }

    /// Frame a mesh of the given bounding diameter centred on the origin
    pub fn reset_to_frame(&mut self, diameter: f64) {
        let distance = diameter * self.settings.frame_factor;
        self.state = OrbitState {
            yaw: self.settings.default_yaw,
            pitch: self
                .settings
                .default_pitch
                .clamp(-OrbitState::PITCH_LIMIT, OrbitState::PITCH_LIMIT),
            distance: if distance.is_finite() {
                distance.max(self.settings.min_distance)
            } else {
                OrbitState::default().distance
            },
            target: Point3::origin(),
        };
    }

    /// Where the camera sits and what it looks at
    pub fn camera_pose(&self) -> CameraPose {
        let position = self.state.target + self.state.offset();
        CameraPose {
            position: position.cast::<f32>(),
            target: self.state.target.cast::<f32>(),
            near_clip: (self.state.distance * 0.001).max(0.01) as f32,
        }
    }

    fn orbit(&mut self, dx: f64, dy: f64) {
        let k = self.settings.orbit_sensitivity;
        let yaw = self.state.yaw - dx * k;
        if yaw.is_finite() {
            self.state.yaw = yaw;
        }
        self.state.pitch = (self.state.pitch + dy * k)
            .clamp(-OrbitState::PITCH_LIMIT, OrbitState::PITCH_LIMIT);
    }

    fn scale_distance(&mut self, factor: f64) {
        let distance = (self.state.distance * factor).max(self.settings.min_distance);
        if distance.is_finite() {
            self.state.distance = distance;
        }
    }

    fn pan(&mut self, dx: f64, dy: f64) {
        let scale = self.state.distance * self.settings.pan_sensitivity;
        let (right, up) = self.state.view_axes();
        // Grab-style: the scene follows the pointer
        let target = self.state.target + (up * dy - right * dx) * scale;
        if target.iter().all(|c| c.is_finite()) {
            self.state.target = target;
        }
    }
}
