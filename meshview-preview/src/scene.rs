//! Minimal scene graph for the preview
//!
//! Nodes form a tree under a single root and carry a local position and
//! orientation. Cameras, lights and mesh entities are attached to nodes.
//! World transforms are composed on demand; the preview scene is a handful
//! of nodes, so nothing is cached.

use meshview_core::{Aabb, DirectionalLight, Error, MeshData, Result, SceneLighting};
use nalgebra::{Isometry3, Matrix4, Point3, Translation3, UnitQuaternion, Vector3};
use std::collections::HashMap;

/// Unique identifier for a scene node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Unique identifier for a mesh entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(usize);

/// Something a node carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attachment {
    Camera,
    /// Index into the scene's light list
    Light(usize),
    Entity(EntityId),
}

/// A node in the scene tree
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub id: NodeId,
    pub name: String,
    /// Position relative to the parent node
    pub position: Point3<f32>,
    /// Orientation relative to the parent node
    pub orientation: UnitQuaternion<f32>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub attached: Vec<Attachment>,
}

impl SceneNode {
    fn new(id: NodeId, name: String, parent: Option<NodeId>) -> Self {
        Self {
            id,
            name,
            position: Point3::origin(),
            orientation: UnitQuaternion::identity(),
            parent,
            children: Vec::new(),
            attached: Vec::new(),
        }
    }

    fn local_isometry(&self) -> Isometry3<f32> {
        Isometry3::from_parts(Translation3::from(self.position.coords), self.orientation)
    }
}

/// An instantiated mesh
#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    pub mesh: MeshData,
    /// Material used by each submesh, in submesh order
    pub materials: Vec<String>,
    pub bounds: Aabb,
}

impl Entity {
    pub fn submesh_count(&self) -> usize {
        self.mesh.submeshes.len()
    }
}

/// Scene tree plus the entities and lights it references
#[derive(Debug)]
pub struct Scene {
    nodes: HashMap<NodeId, SceneNode>,
    entities: HashMap<EntityId, Entity>,
    lights: Vec<(String, DirectionalLight)>,
    lighting: SceneLighting,
    root: NodeId,
    next_node: usize,
    next_entity: usize,
}

impl Scene {
    /// Empty scene with a root node
    pub fn new(lighting: SceneLighting) -> Self {
        let root = NodeId(0);
        let mut nodes = HashMap::new();
        nodes.insert(root, SceneNode::new(root, "root".to_string(), None));
        Self {
            nodes,
            entities: HashMap::new(),
            lights: Vec::new(),
            lighting,
            root,
            next_node: 1,
            next_entity: 0,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn lighting(&self) -> &SceneLighting {
        &self.lighting
    }

    pub fn set_ambient_light(&mut self, ambient: meshview_core::Colour) {
        self.lighting.ambient = ambient;
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(&id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Create a node under `parent`
    pub fn create_child_node(&mut self, parent: NodeId, name: impl Into<String>) -> Result<NodeId> {
        let id = NodeId(self.next_node);
        let parent_node = self
            .nodes
            .get_mut(&parent)
            .ok_or_else(|| Error::InvalidData(format!("parent node {:?} not found", parent)))?;
        parent_node.children.push(id);
        self.next_node += 1;
        self.nodes.insert(id, SceneNode::new(id, name.into(), Some(parent)));
        Ok(id)
    }

    /// Create a detached entity for `mesh`
    pub fn create_entity(&mut self, name: impl Into<String>, mesh: MeshData) -> EntityId {
        let id = EntityId(self.next_entity);
        self.next_entity += 1;
        let materials = mesh.submeshes.iter().map(|s| s.material_name.clone()).collect();
        let bounds = mesh.bounding_box();
        self.entities.insert(
            id,
            Entity {
                id,
                name: name.into(),
                mesh,
                materials,
                bounds,
            },
        );
        id
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Drop an entity. It must already be detached.
    pub fn destroy_entity(&mut self, id: EntityId) -> Option<Entity> {
        self.entities.remove(&id)
    }

    /// Number of live entities, attached or not
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Add a directional light and attach it to a new child of the root
    pub fn create_light(&mut self, name: impl Into<String>, light: DirectionalLight) -> Result<NodeId> {
        let name = name.into();
        let node = self.create_child_node(self.root, format!("{}Node", name))?;
        let index = self.lights.len();
        self.lights.push((name, light));
        self.attach(node, Attachment::Light(index))?;
        Ok(node)
    }

    pub fn lights(&self) -> impl Iterator<Item = (&str, &DirectionalLight)> {
        self.lights.iter().map(|(name, light)| (name.as_str(), light))
    }

    /// Attach an object to a node
    pub fn attach(&mut self, node: NodeId, attachment: Attachment) -> Result<()> {
        if let Attachment::Entity(entity) = attachment {
            if !self.entities.contains_key(&entity) {
                return Err(Error::InvalidData(format!("entity {:?} not found", entity)));
            }
        }
        let node = self
            .nodes
            .get_mut(&node)
            .ok_or_else(|| Error::InvalidData(format!("node {:?} not found", node)))?;
        if !node.attached.contains(&attachment) {
            node.attached.push(attachment);
        }
        Ok(())
    }

    /// Detach everything from a node, returning what was attached
    pub fn detach_all(&mut self, node: NodeId) -> Vec<Attachment> {
        self.nodes
            .get_mut(&node)
            .map(|n| std::mem::take(&mut n.attached))
            .unwrap_or_default()
    }

    /// Remove `child` and its whole subtree from `parent`
    pub fn remove_and_destroy_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        match self.nodes.get(&child) {
            Some(node) if node.parent == Some(parent) => {}
            _ => {
                return Err(Error::InvalidData(format!(
                    "node {:?} is not a child of {:?}",
                    child, parent
                )))
            }
        }

        if let Some(parent_node) = self.nodes.get_mut(&parent) {
            parent_node.children.retain(|&id| id != child);
        }

        let mut pending = vec![child];
        while let Some(id) = pending.pop() {
            if let Some(node) = self.nodes.remove(&id) {
                pending.extend(node.children);
            }
        }
        Ok(())
    }

    /// Entities attached to nodes that are reachable from the root
    pub fn attached_entities(&self) -> Vec<EntityId> {
        let mut found = Vec::new();
        let mut pending = vec![self.root];
        while let Some(id) = pending.pop() {
            let Some(node) = self.nodes.get(&id) else { continue };
            found.extend(node.attached.iter().filter_map(|a| match a {
                Attachment::Entity(entity) => Some(*entity),
                _ => None,
            }));
            pending.extend(node.children.iter().copied());
        }
        found.sort();
        found
    }

    pub fn set_position(&mut self, node: NodeId, position: Point3<f32>) -> Result<()> {
        let node = self
            .nodes
            .get_mut(&node)
            .ok_or_else(|| Error::InvalidData(format!("node {:?} not found", node)))?;
        node.position = position;
        Ok(())
    }

    /// Orient a node so its -Z axis points at `target`, Y up
    pub fn look_at(&mut self, node: NodeId, target: Point3<f32>) -> Result<()> {
        let node = self
            .nodes
            .get_mut(&node)
            .ok_or_else(|| Error::InvalidData(format!("node {:?} not found", node)))?;
        let forward = target - node.position;
        if forward.norm_squared() > f32::EPSILON {
            node.orientation = UnitQuaternion::face_towards(&-forward, &Vector3::y());
        }
        Ok(())
    }

    /// Composed transform from `node` to world space
    pub fn world_transform(&self, node: NodeId) -> Matrix4<f32> {
        let mut transform = Isometry3::identity();
        let mut current = Some(node);
        while let Some(id) = current {
            let Some(n) = self.nodes.get(&id) else { break };
            transform = n.local_isometry() * transform;
            current = n.parent;
        }
        transform.to_homogeneous()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use meshview_core::{Point3f, SubMesh};

    fn triangle() -> MeshData {
        let mut sub = SubMesh::new("stone");
        sub.positions = vec![
            Point3f::new(0.0, 0.0, 0.0),
            Point3f::new(2.0, 0.0, 0.0),
            Point3f::new(0.0, 2.0, 0.0),
        ];
        sub.indices = vec![0, 1, 2];
        let mut mesh = MeshData::new("tri");
        mesh.submeshes.push(sub);
        mesh
    }

    #[test]
    fn test_entity_is_attached_through_its_node() {
        let mut scene = Scene::new(SceneLighting::default());
        let node = scene.create_child_node(scene.root(), "mesh").unwrap();
        let entity = scene.create_entity("tri", triangle());
        assert!(scene.attached_entities().is_empty());

        scene.attach(node, Attachment::Entity(entity)).unwrap();
        assert_eq!(scene.attached_entities(), vec![entity]);
        assert_eq!(scene.entity(entity).unwrap().materials, vec!["stone".to_string()]);
    }

    #[test]
    fn test_remove_child_drops_subtree() {
        let mut scene = Scene::new(SceneLighting::default());
        let parent = scene.create_child_node(scene.root(), "a").unwrap();
        let child = scene.create_child_node(parent, "b").unwrap();
        scene.create_child_node(child, "c").unwrap();
        assert_eq!(scene.node_count(), 4);

        scene.remove_and_destroy_child(scene.root(), parent).unwrap();
        assert_eq!(scene.node_count(), 1);
        assert!(scene.node(scene.root()).unwrap().children.is_empty());
    }

    #[test]
    fn test_remove_rejects_wrong_parent() {
        let mut scene = Scene::new(SceneLighting::default());
        let a = scene.create_child_node(scene.root(), "a").unwrap();
        let b = scene.create_child_node(a, "b").unwrap();
        assert!(scene.remove_and_destroy_child(scene.root(), b).is_err());
    }

    #[test]
    fn test_detach_all_returns_attachments() {
        let mut scene = Scene::new(SceneLighting::default());
        let node = scene.create_child_node(scene.root(), "cam").unwrap();
        scene.attach(node, Attachment::Camera).unwrap();
        scene.attach(node, Attachment::Camera).unwrap();
        assert_eq!(scene.detach_all(node), vec![Attachment::Camera]);
        assert!(scene.detach_all(node).is_empty());
    }

    #[test]
    fn test_world_transform_composes_parents() {
        let mut scene = Scene::new(SceneLighting::default());
        let a = scene.create_child_node(scene.root(), "a").unwrap();
        let b = scene.create_child_node(a, "b").unwrap();
        scene.set_position(a, Point3::new(1.0, 0.0, 0.0)).unwrap();
        scene.set_position(b, Point3::new(0.0, 2.0, 0.0)).unwrap();

        let p = scene.world_transform(b).transform_point(&Point3::origin());
        assert_relative_eq!(p, Point3::new(1.0, 2.0, 0.0));
    }

    #[test]
    fn test_look_at_faces_target() {
        let mut scene = Scene::new(SceneLighting::default());
        let cam = scene.create_child_node(scene.root(), "cam").unwrap();
        scene.set_position(cam, Point3::new(0.0, 0.0, 10.0)).unwrap();
        scene.look_at(cam, Point3::origin()).unwrap();

        let forward = scene.node(cam).unwrap().orientation * -Vector3::z();
        assert_relative_eq!(forward, -Vector3::z(), epsilon = 1e-6);
    }

    #[test]
    fn test_lights_get_nodes() {
        let mut scene = Scene::new(SceneLighting::default());
        let key = scene.lighting().key;
        let node = scene.create_light("KeyLight", key).unwrap();
        assert_eq!(scene.node(node).unwrap().attached, vec![Attachment::Light(0)]);
        assert_eq!(scene.lights().count(), 1);
    }
}
