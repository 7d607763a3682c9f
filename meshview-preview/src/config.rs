//! In-process configuration for the preview widget

use meshview_gpu::SurfaceOptions;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Pointer-to-camera response of the orbit controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitSettings {
    /// Degrees per pixel while orbiting
    pub orbit_sensitivity: f64,
    /// Relative distance change per pixel while zooming
    pub zoom_sensitivity: f64,
    /// Pan offset per pixel, as a fraction of the orbit distance
    pub pan_sensitivity: f64,
    /// Distance factor for a wheel step towards the target
    pub wheel_in: f64,
    /// Distance factor for a wheel step away from the target
    pub wheel_out: f64,
    pub min_distance: f64,
    pub default_yaw: f64,
    pub default_pitch: f64,
    /// Orbit distance after a load, as a multiple of the bounding diameter
    pub frame_factor: f64,
}

impl Default for OrbitSettings {
    fn default() -> Self {
        Self {
            orbit_sensitivity: 0.5,
            zoom_sensitivity: 0.005,
            pan_sensitivity: 0.002,
            wheel_in: 0.9,
            wheel_out: 1.1,
            min_distance: 0.01,
            default_yaw: 30.0,
            default_pitch: 20.0,
            frame_factor: 1.8,
        }
    }
}

/// Redraw pacing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerSettings {
    pub interval_ms: u64,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self { interval_ms: 16 }
    }
}

impl SchedulerSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms.max(1))
    }
}

/// Everything a host can tune about the preview
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    pub surface: SurfaceOptions,
    pub orbit: OrbitSettings,
    pub scheduler: SchedulerSettings,
}
