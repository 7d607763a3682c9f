//! Render context: engine bootstrap plus scene, camera and mesh lifecycle
//!
//! A [`RenderContext`] owns one backend bound to one render surface, the
//! scene graph, the camera and at most one loaded mesh. Every mutation of
//! that state goes through its methods.

use crate::camera::Camera;
use crate::orbit::CameraPose;
use crate::scene::{Attachment, Entity, EntityId, NodeId, Scene};
use meshview_assets::{
    collect_locations_with_hints, locate_engine_media, MaterialSynthesizer, ResourceGroup, PREVIEW_GROUP,
};
use meshview_core::{BackendBootstrap, BackendInfo, Error, FrameParams, RenderBackend, Result, SceneLighting};
use meshview_gpu::SurfaceOptions;
use meshview_io::ReaderRegistry;
use nalgebra::{Matrix4, Point3};
use std::path::{Path, PathBuf};

/// Bounding diameter assumed for meshes without extent
pub const FALLBACK_DIAMETER: f64 = 100.0;

#[derive(Debug, Clone, Copy)]
struct LoadedMesh {
    entity: EntityId,
    node: NodeId,
}

/// Engine state for one preview surface
pub struct RenderContext<B: RenderBackend> {
    backend: Option<B>,
    info: BackendInfo,
    options: SurfaceOptions,
    size: (u32, u32),
    scene: Scene,
    camera: Camera,
    camera_node: NodeId,
    mesh: Option<LoadedMesh>,
    general_group: ResourceGroup,
    preview_group: ResourceGroup,
    synthesizer: MaterialSynthesizer,
    readers: ReaderRegistry,
}

impl<B: RenderBackend> RenderContext<B> {
    /// Start the engine on the surface `bootstrap` provides and build the scene.
    ///
    /// Fails only if no backend can be started; the caller should treat
    /// that as fatal for the session.
    pub fn initialize<S>(bootstrap: &S, width: u32, height: u32, options: SurfaceOptions) -> Result<Self>
    where
        S: BackendBootstrap<Backend = B>,
    {
        let (width, height) = options.clamp_size(width, height);
        let mut backend = bootstrap.start(width, height)?;
        let info = backend.info();
        tracing::info!("Render system: {} on {}", info.api, info.adapter);

        let general_group = ResourceGroup::general(locate_engine_media().as_deref());

        let lighting = SceneLighting {
            background: options.background,
            ..SceneLighting::default()
        };
        let (scene, camera_node) = match build_scene(lighting) {
            Ok(built) => built,
            Err(e) => {
                backend.shutdown();
                return Err(e);
            }
        };

        if let Err(e) = backend.register_scene(scene.lighting()) {
            tracing::warn!("Shader generator registration failed: {}", e);
        }

        let mut camera = Camera::default();
        camera.set_viewport_size(width, height);

        tracing::info!("Render context ready ({}x{})", width, height);
        Ok(Self {
            backend: Some(backend),
            info,
            options,
            size: (width, height),
            scene,
            camera,
            camera_node,
            mesh: None,
            general_group,
            preview_group: ResourceGroup::new(PREVIEW_GROUP),
            synthesizer: MaterialSynthesizer::default(),
            readers: ReaderRegistry::with_defaults(),
        })
    }

    pub fn is_initialized(&self) -> bool {
        self.backend.is_some()
    }

    pub fn info(&self) -> &BackendInfo {
        &self.info
    }

    pub fn options(&self) -> &SurfaceOptions {
        &self.options
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_node(&self) -> NodeId {
        self.camera_node
    }

    pub fn backend(&self) -> Option<&B> {
        self.backend.as_ref()
    }

    /// Built-in engine media, searched for textures after the mesh's own locations
    pub fn general_group(&self) -> &ResourceGroup {
        &self.general_group
    }

    /// The dedicated group for the mesh on screen
    pub fn preview_group(&self) -> &ResourceGroup {
        &self.preview_group
    }

    /// Register additional mesh readers here
    pub fn readers_mut(&mut self) -> &mut ReaderRegistry {
        &mut self.readers
    }

    pub fn synthesizer_mut(&mut self) -> &mut MaterialSynthesizer {
        &mut self.synthesizer
    }

    /// The entity currently on screen
    pub fn entity(&self) -> Option<&Entity> {
        self.mesh.and_then(|m| self.scene.entity(m.entity))
    }

    pub fn mesh_node(&self) -> Option<NodeId> {
        self.mesh.map(|m| m.node)
    }

    /// Replace the mesh on screen with the one at `path`.
    ///
    /// `hints` are extra texture search directories the caller already knows.
    /// Returns the bounding diameter. On error the context stays usable and
    /// shows no mesh.
    pub fn load_mesh(&mut self, path: &Path, hints: &[PathBuf]) -> Result<f64> {
        if self.backend.is_none() {
            return Err(Error::NotInitialized);
        }
        self.unload_mesh();

        let mesh_dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let locations = collect_locations_with_hints(&mesh_dir, hints);
        tracing::info!("Adding {} resource location(s):", locations.len());
        for location in &locations {
            self.preview_group.add_location(location.clone());
        }
        self.preview_group.initialise();

        let mesh = self.readers.read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| mesh.name.clone());

        let entity = self.scene.create_entity(name.clone(), mesh);
        let node = self.scene.create_child_node(self.scene.root(), format!("{}Node", name))?;
        self.scene.attach(node, Attachment::Entity(entity))?;
        self.mesh = Some(LoadedMesh { entity, node });

        match self.bind_and_upload(entity, node) {
            Ok(diameter) => Ok(diameter),
            Err(e) => {
                tracing::error!("Failed to load {}: {}", path.display(), e);
                self.unload_mesh();
                Err(e)
            }
        }
    }

    fn bind_and_upload(&mut self, entity_id: EntityId, node: NodeId) -> Result<f64> {
        let backend = self.backend.as_mut().ok_or(Error::NotInitialized)?;
        let entity = self
            .scene
            .entity_mut(entity_id)
            .ok_or_else(|| Error::InvalidData("mesh entity vanished".to_string()))?;

        // Engine media is the last resort after everything found for this mesh
        let search: Vec<PathBuf> = self
            .preview_group
            .locations()
            .iter()
            .chain(self.general_group.locations())
            .cloned()
            .collect();
        let bindings = self
            .synthesizer
            .apply(&entity.materials, &search, &mut self.preview_group);

        for binding in bindings.iter().filter(|b| b.created) {
            let Some(mut material) = self.preview_group.material(&binding.synthesized).cloned() else {
                continue;
            };

            if let Some(layer) = material.texture.clone() {
                let uploaded = self
                    .preview_group
                    .load_texture(&layer)
                    .and_then(|image| backend.upload_texture(image));
                if let Err(e) = uploaded {
                    tracing::warn!("{}: {} unusable ({}), using flat colour", binding.declared, layer.texture_name, e);
                    material = self.synthesizer.flat(&material.name, &material.group);
                    self.preview_group.insert_material(material.clone());
                }
            }

            if let Err(e) = backend.register_material(&material) {
                tracing::warn!("Shader generation failed for {}: {}", material.name, e);
            }
        }

        entity.materials = bindings.into_iter().map(|b| b.synthesized).collect();
        backend.upload_mesh(&entity.mesh, &entity.materials)?;

        let mut diameter = entity.bounds.diameter();
        if !(diameter.is_finite() && diameter > 0.0) {
            diameter = FALLBACK_DIAMETER;
        }
        let center = entity.bounds.center();
        tracing::info!(
            "Loaded {}: {} submesh(es), diameter {:.3}",
            entity.name,
            entity.submesh_count(),
            diameter
        );

        self.scene.set_position(node, Point3::from(-center.coords))?;
        self.camera.set_far_clip_distance((diameter * 500.0) as f32);
        self.camera.set_near_clip_distance((diameter * 0.005).max(0.01) as f32);
        Ok(diameter)
    }

    /// Detach and destroy the current mesh and clear the dedicated group
    pub fn unload_mesh(&mut self) {
        if let Some(loaded) = self.mesh.take() {
            self.scene.detach_all(loaded.node);
            if let Err(e) = self.scene.remove_and_destroy_child(self.scene.root(), loaded.node) {
                tracing::warn!("Mesh node cleanup: {}", e);
            }
            self.scene.destroy_entity(loaded.entity);
        }
        if let Some(backend) = self.backend.as_mut() {
            backend.release_mesh();
            backend.clear_group_resources();
        }
        self.preview_group.clear();
    }

    /// Place the camera
    pub fn apply_camera(&mut self, pose: &CameraPose) {
        self.camera.set_position(pose.position);
        self.camera.look_at(pose.target);
        self.camera.set_near_clip_distance(pose.near_clip);
        if let Err(e) = self
            .scene
            .set_position(self.camera_node, pose.position)
            .and_then(|_| self.scene.look_at(self.camera_node, pose.target))
        {
            tracing::warn!("Camera node update failed: {}", e);
        }
    }

    /// Resize the render surface. Backend failures are logged, never returned.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.size = (width, height);
        self.camera.set_viewport_size(width, height);
        if let Some(backend) = self.backend.as_mut() {
            if let Err(e) = backend.resize(width, height) {
                tracing::warn!("Resize to {}x{} failed: {}", width, height, e);
            }
        }
    }

    /// Draw one frame and present it
    pub fn render_frame(&mut self) -> Result<()> {
        let backend = self.backend.as_mut().ok_or(Error::NotInitialized)?;
        let model = self
            .mesh
            .map(|m| self.scene.world_transform(m.node))
            .unwrap_or_else(Matrix4::identity);
        let frame = FrameParams {
            view: self.camera.view_matrix(),
            projection: self.camera.projection_matrix(),
            model,
            camera_position: self.camera.position,
            lighting: *self.scene.lighting(),
        };
        backend.render_one_frame(&frame)?;
        backend.present()
    }

    /// Release engine resources. Safe to call repeatedly.
    pub fn shutdown(&mut self) {
        if self.backend.is_none() {
            return;
        }
        self.unload_mesh();
        if let Some(mut backend) = self.backend.take() {
            backend.shutdown();
        }
        tracing::info!("Render context shut down");
    }
}

impl<B: RenderBackend> Drop for RenderContext<B> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn build_scene(lighting: SceneLighting) -> Result<(Scene, NodeId)> {
    let mut scene = Scene::new(lighting);
    scene.set_ambient_light(lighting.ambient);
    scene.create_light("KeyLight", lighting.key)?;
    scene.create_light("FillLight", lighting.fill)?;

    let camera_node = scene.create_child_node(scene.root(), "PreviewCameraNode")?;
    scene.attach(camera_node, Attachment::Camera)?;
    scene.set_position(camera_node, Point3::new(0.0, 0.0, 500.0))?;
    scene.look_at(camera_node, Point3::origin())?;
    Ok((scene, camera_node))
}
