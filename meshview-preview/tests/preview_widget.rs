mod common;

use approx::assert_relative_eq;
use common::*;
use meshview_core::Error;
use meshview_preview::{
    DragMode, PointerButton, PreviewConfig, PreviewWidget, TimerQueue, ViewState, CONTROLS_HINT, PLACEHOLDER_TEXT,
};
use nalgebra::Point3;
use std::path::PathBuf;
use std::time::{Duration, Instant};

const TICK: Duration = Duration::from_millis(16);

/// Bounding diagonal of exactly 100
const PANEL_OBJ: &str = "v 0 0 0\nv 60 0 0\nv 60 80 0\nusemtl panel\nf 1 2 3\n";

struct Fixture {
    _tmp: tempfile::TempDir,
    mesh: PathBuf,
    bootstrap: RecordingBootstrap,
    t0: Instant,
}

impl Fixture {
    fn new() -> Self {
        let tmp = tempfile::tempdir().unwrap();
        let mesh = write_mesh(&asset_root(tmp.path()).join("models"), "panel.obj", PANEL_OBJ);
        Self {
            _tmp: tmp,
            mesh,
            bootstrap: RecordingBootstrap::new(),
            t0: Instant::now(),
        }
    }

    fn widget(&self) -> PreviewWidget<RecordingBackend, TimerQueue> {
        PreviewWidget::create(
            &self.bootstrap,
            TimerQueue::new(self.t0),
            640,
            480,
            PreviewConfig::default(),
        )
    }
}

#[test]
fn test_new_widget_shows_placeholder() {
    let fx = Fixture::new();
    let widget = fx.widget();

    assert_eq!(widget.view_state(), &ViewState::Placeholder);
    assert_eq!(widget.status_text(), PLACEHOLDER_TEXT);
    assert!(!widget.is_rendering());

    let state = widget.orbit().state();
    assert_eq!((state.yaw, state.pitch, state.distance), (30.0, 25.0, 200.0));
}

#[test]
fn test_failed_startup_disables_preview() {
    let bootstrap = RecordingBootstrap::failing();
    let mut widget = PreviewWidget::create(
        &bootstrap,
        TimerQueue::new(Instant::now()),
        640,
        480,
        PreviewConfig::default(),
    );

    assert!(matches!(widget.view_state(), ViewState::Disabled(_)));
    assert!(widget.status_text().starts_with("Preview unavailable"));
    assert!(matches!(
        widget.load_mesh(&PathBuf::from("tank.obj")),
        Err(Error::Disabled(_))
    ));

    widget.press(PointerButton::Left, 0.0, 0.0);
    widget.motion(50.0, 50.0);
    widget.resize(800, 600);
    assert_eq!(widget.orbit().mode(), DragMode::Idle);
    assert!(widget.host().is_empty());
}

#[test]
fn test_load_frames_mesh_and_starts_rendering() {
    let fx = Fixture::new();
    let mut widget = fx.widget();

    let diameter = widget.load_mesh(&fx.mesh).unwrap();
    assert_relative_eq!(diameter, 100.0, epsilon = 1e-9);

    let state = widget.orbit().state();
    assert_relative_eq!(state.distance, 180.0, epsilon = 1e-9);
    assert_eq!(state.target, Point3::origin());
    assert_eq!(widget.view_state(), &ViewState::Active);
    assert_eq!(widget.status_text(), CONTROLS_HINT);
    assert!(widget.is_rendering());
    assert_eq!(widget.host().len(), 1);

    let camera = widget.context().unwrap().camera();
    assert_relative_eq!((camera.position - camera.target).norm(), 180.0, epsilon = 1e-3);
}

#[test]
fn test_horizontal_orbit_changes_only_yaw() {
    let fx = Fixture::new();
    let mut widget = fx.widget();
    widget.load_mesh(&fx.mesh).unwrap();
    let before = *widget.orbit().state();
    let position_before = widget.context().unwrap().camera().position;

    widget.press(PointerButton::Left, 10.0, 10.0);
    widget.motion(110.0, 10.0);
    widget.release(PointerButton::Left);

    let after = widget.orbit().state();
    assert_relative_eq!(after.yaw, before.yaw - 100.0 * 0.5);
    assert_eq!(after.pitch, before.pitch);
    assert_eq!(after.distance, before.distance);
    assert_ne!(widget.context().unwrap().camera().position, position_before);
}

#[test]
fn test_wheel_zooms_camera() {
    let fx = Fixture::new();
    let mut widget = fx.widget();
    widget.load_mesh(&fx.mesh).unwrap();

    widget.wheel(1.0);
    assert_relative_eq!(widget.orbit().state().distance, 162.0, epsilon = 1e-9);
    widget.wheel(-1.0);
    assert_relative_eq!(widget.orbit().state().distance, 178.2, epsilon = 1e-9);

    let near = widget.context().unwrap().camera().near;
    assert_relative_eq!(near, 0.1782, epsilon = 1e-6);
}

#[test]
fn test_timers_render_frames() {
    let fx = Fixture::new();
    let mut widget = fx.widget();
    widget.load_mesh(&fx.mesh).unwrap();

    for frame in 1..=3u32 {
        let ids = widget.host_mut().due(fx.t0 + TICK * frame);
        assert_eq!(ids.len(), 1);
        assert!(widget.on_timer(ids[0]));
    }
    let log = fx.bootstrap.log.borrow();
    assert_eq!(log.frames.len(), 3);
    assert_eq!(log.presents, 3);
}

#[test]
fn test_render_error_stops_loop() {
    let fx = Fixture::new();
    let mut widget = fx.widget();
    widget.load_mesh(&fx.mesh).unwrap();
    fx.bootstrap.log.borrow_mut().fail_frames_from = Some(0);

    let id = widget.host_mut().due(fx.t0 + TICK)[0];
    assert!(!widget.on_timer(id));
    assert_eq!(widget.view_state(), &ViewState::Error("GPU error: device lost".to_string()));
    assert!(!widget.is_rendering());
    assert!(widget.host().is_empty());
    // Not torn down
    assert!(widget.context().unwrap().is_initialized());
}

#[test]
fn test_reload_after_render_error_keeps_loop_stopped() {
    let fx = Fixture::new();
    let mut widget = fx.widget();
    widget.load_mesh(&fx.mesh).unwrap();
    fx.bootstrap.log.borrow_mut().fail_frames_from = Some(0);
    let id = widget.host_mut().due(fx.t0 + TICK)[0];
    assert!(!widget.on_timer(id));

    fx.bootstrap.log.borrow_mut().fail_frames_from = None;
    let diameter = widget.load_mesh(&fx.mesh).unwrap();
    assert_relative_eq!(diameter, 100.0, epsilon = 1e-9);
    assert!(!widget.is_rendering());
    assert!(widget.host().is_empty());
    assert_eq!(widget.view_state(), &ViewState::Error("GPU error: device lost".to_string()));
    assert_relative_eq!(widget.orbit().state().distance, 180.0, epsilon = 1e-9);
}

#[test]
fn test_destroy_with_frame_in_flight() {
    let fx = Fixture::new();
    let mut widget = fx.widget();
    widget.load_mesh(&fx.mesh).unwrap();

    let id = widget.host_mut().due(fx.t0 + TICK)[0];
    widget.destroy();
    assert!(!widget.on_timer(id));
    widget.destroy();

    let log = fx.bootstrap.log.borrow();
    assert_eq!(log.shutdowns, 1);
    assert!(log.frames.is_empty());
    drop(log);
    drop(widget);
    assert_eq!(fx.bootstrap.log.borrow().shutdowns, 1);
}

#[test]
fn test_small_resizes_are_ignored() {
    let fx = Fixture::new();
    let mut widget = fx.widget();

    widget.resize(8, 400);
    widget.resize(400, 10);
    assert!(fx.bootstrap.log.borrow().resizes.is_empty());

    widget.resize(800, 600);
    assert_eq!(fx.bootstrap.log.borrow().resizes, vec![(800, 600)]);
}

#[test]
fn test_load_error_is_shown_inline_and_recoverable() {
    let fx = Fixture::new();
    let mut widget = fx.widget();
    widget.load_mesh(&fx.mesh).unwrap();

    let missing = fx.mesh.with_file_name("missing.obj");
    assert!(widget.load_mesh(&missing).is_err());
    assert!(widget.status_text().starts_with("Preview error:\n"));
    assert!(!widget.is_rendering());
    assert!(widget.host().is_empty());

    widget.load_mesh(&fx.mesh).unwrap();
    assert_eq!(widget.view_state(), &ViewState::Active);
    assert!(widget.is_rendering());
}
