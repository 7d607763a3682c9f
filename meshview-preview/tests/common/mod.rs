//! Shared fixtures: a backend that records calls instead of drawing, and
//! throwaway asset trees.

#![allow(dead_code)]

use meshview_core::{
    BackendBootstrap, BackendInfo, Error, FrameParams, MeshData, PreviewMaterial, RenderBackend, Result,
    SceneLighting, TextureImage,
};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Everything the recording backend saw
#[derive(Debug, Default)]
pub struct CallLog {
    /// Surface size the backend was started with
    pub started: Option<(u32, u32)>,
    pub scene_registered: bool,
    pub textures: Vec<String>,
    pub materials: Vec<PreviewMaterial>,
    pub meshes_uploaded: usize,
    /// Materials of the mesh currently uploaded
    pub live_mesh: Option<Vec<String>>,
    pub releases: usize,
    pub group_clears: usize,
    pub resizes: Vec<(u32, u32)>,
    pub frames: Vec<FrameParams>,
    pub presents: usize,
    pub shutdowns: usize,
    /// Fail `render_one_frame` from this frame number on
    pub fail_frames_from: Option<usize>,
    pub fail_resize: bool,
    pub fail_register_scene: bool,
    pub fail_texture_upload: bool,
}

pub type SharedLog = Rc<RefCell<CallLog>>;

pub struct RecordingBackend {
    log: SharedLog,
    running: bool,
}

impl RenderBackend for RecordingBackend {
    fn info(&self) -> BackendInfo {
        BackendInfo {
            api: "Recording".to_string(),
            adapter: "none".to_string(),
        }
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        let mut log = self.log.borrow_mut();
        if log.fail_resize {
            return Err(Error::Surface("resize rejected".to_string()));
        }
        log.resizes.push((width, height));
        Ok(())
    }

    fn register_scene(&mut self, _lighting: &SceneLighting) -> Result<()> {
        let mut log = self.log.borrow_mut();
        if log.fail_register_scene {
            return Err(Error::Gpu("no shader generator".to_string()));
        }
        log.scene_registered = true;
        Ok(())
    }

    fn upload_texture(&mut self, image: &TextureImage) -> Result<()> {
        let mut log = self.log.borrow_mut();
        if log.fail_texture_upload {
            return Err(Error::Gpu(format!("{} exceeds the device texture limit", image.name)));
        }
        log.textures.push(image.name.clone());
        Ok(())
    }

    fn register_material(&mut self, material: &PreviewMaterial) -> Result<()> {
        self.log.borrow_mut().materials.push(material.clone());
        Ok(())
    }

    fn upload_mesh(&mut self, _mesh: &MeshData, materials: &[String]) -> Result<()> {
        let mut log = self.log.borrow_mut();
        log.meshes_uploaded += 1;
        log.live_mesh = Some(materials.to_vec());
        Ok(())
    }

    fn release_mesh(&mut self) {
        let mut log = self.log.borrow_mut();
        log.releases += 1;
        log.live_mesh = None;
    }

    fn clear_group_resources(&mut self) {
        let mut log = self.log.borrow_mut();
        log.group_clears += 1;
        log.textures.clear();
        log.materials.clear();
    }

    fn render_one_frame(&mut self, frame: &FrameParams) -> Result<()> {
        let mut log = self.log.borrow_mut();
        if log.fail_frames_from.is_some_and(|n| log.frames.len() >= n) {
            return Err(Error::Gpu("device lost".to_string()));
        }
        log.frames.push(*frame);
        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        self.log.borrow_mut().presents += 1;
        Ok(())
    }

    fn shutdown(&mut self) {
        if self.running {
            self.running = false;
            self.log.borrow_mut().shutdowns += 1;
        }
    }
}

/// Hands out recording backends sharing one log
pub struct RecordingBootstrap {
    pub log: SharedLog,
    pub fail: bool,
}

impl RecordingBootstrap {
    pub fn new() -> Self {
        Self {
            log: SharedLog::default(),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }
}

impl BackendBootstrap for RecordingBootstrap {
    type Backend = RecordingBackend;

    fn start(&self, width: u32, height: u32) -> Result<RecordingBackend> {
        if self.fail {
            return Err(Error::NoBackend);
        }
        self.log.borrow_mut().started = Some((width, height));
        Ok(RecordingBackend {
            log: Rc::clone(&self.log),
            running: true,
        })
    }
}

/// Two materials, one quad each, spanning 10 units on X
pub const TANK_OBJ: &str = "\
v 0 0 0
v 10 0 0
v 10 4 0
v 0 4 0
v 0 0 -3
v 10 0 -3
vt 0 0
vt 1 0
vt 1 1
vt 0 1
usemtl avtank03
f 1/1 2/2 3/3
f 1/1 3/3 4/4
usemtl avtank_tread
f 1/1 2/2 6/3
f 1/1 6/3 5/4
";

/// A unit triangle with one material
pub const ROCK_OBJ: &str = "\
v 0 0 0
v 1 0 0
v 0 1 0
usemtl rock
f 1 2 3
";

/// Deep enough that the ancestor walk never leaves the temp directory
pub fn asset_root(tmp: &Path) -> PathBuf {
    tmp.join("sandbox").join("a").join("b").join("depot").join("game").join("assets")
}

pub fn write_mesh(dir: &Path, name: &str, contents: &str) -> PathBuf {
    fs::create_dir_all(dir).unwrap();
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

/// A valid 2x2 PNG
pub fn write_png(path: &Path) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let image = image::RgbaImage::from_pixel(2, 2, image::Rgba([200, 120, 40, 255]));
    image.save(path).unwrap();
}
