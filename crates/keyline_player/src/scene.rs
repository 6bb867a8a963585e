// SPDX-License-Identifier: MIT OR Apache-2.0
//! In-memory scene used as the playback target.
//!
//! The scene is a flat map of entities with parent/child links. It implements
//! [`ObjectResolver`] (object paths to entity IDs) and [`PropertySink`]
//! (transform channels such as `position.x` or `rotation.z`).

use indexmap::IndexMap;
use keyline_sequencer::binding::{join_path, path_segments};
use keyline_sequencer::{ObjectResolver, PropertyId, PropertySink};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

/// Entity ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    /// Create a new random entity ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

/// Transform component data
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Transform {
    /// Position (x, y, z)
    pub position: [f32; 3],
    /// Rotation in euler angles (degrees)
    pub rotation: [f32; 3],
    /// Scale
    pub scale: [f32; 3],
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            rotation: [0.0, 0.0, 0.0],
            scale: [1.0, 1.0, 1.0],
        }
    }
}

/// Transform component addressed by a property name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformChannel {
    /// Position
    Position,
    /// Euler rotation in degrees
    Rotation,
    /// Local scale
    Scale,
}

impl TransformChannel {
    /// Parse `"position.x"` style names (and the older `"positionX"` spelling)
    /// into a channel and axis index.
    pub fn parse(property: &str) -> Option<(Self, usize)> {
        let (channel, axis) = match property.split_once('.') {
            Some(parts) => parts,
            None => {
                let (idx, _) = property.char_indices().last()?;
                property.split_at(idx)
            }
        };

        let channel = match channel {
            "position" => Self::Position,
            "rotation" => Self::Rotation,
            "scale" => Self::Scale,
            _ => return None,
        };
        let axis = match axis {
            "x" | "X" => 0,
            "y" | "Y" => 1,
            "z" | "Z" => 2,
            _ => return None,
        };
        Some((channel, axis))
    }

    fn component(self, transform: &Transform) -> &[f32; 3] {
        match self {
            Self::Position => &transform.position,
            Self::Rotation => &transform.rotation,
            Self::Scale => &transform.scale,
        }
    }

    fn component_mut(self, transform: &mut Transform) -> &mut [f32; 3] {
        match self {
            Self::Position => &mut transform.position,
            Self::Rotation => &mut transform.rotation,
            Self::Scale => &mut transform.scale,
        }
    }
}

/// Entity data stored in the scene
#[derive(Debug, Clone, PartialEq)]
pub struct EntityData {
    /// Entity name
    pub name: String,
    /// Transform component
    pub transform: Transform,
    /// Parent entity (if any)
    pub parent: Option<EntityId>,
    /// Child entities
    pub children: Vec<EntityId>,
}

impl EntityData {
    /// Create a new entity with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::default(),
            parent: None,
            children: Vec::new(),
        }
    }
}

/// Errors loading a scene description
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    /// File could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File is not a valid scene description
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// One object in a scene description file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneNode {
    /// Object name
    pub name: String,
    /// Initial transform
    #[serde(default)]
    pub transform: Transform,
    /// Child objects
    #[serde(default)]
    pub children: Vec<SceneNode>,
}

/// Scene description file: a list of root objects
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneFile {
    /// Root objects
    #[serde(default)]
    pub objects: Vec<SceneNode>,
}

/// Scene data containing all entities
#[derive(Debug, Clone, Default)]
pub struct SceneData {
    /// All entities in the scene
    entities: IndexMap<EntityId, EntityData>,
}

impl SceneData {
    /// Create a new empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a scene from a RON scene description
    pub fn from_ron(ron_str: &str) -> Result<Self, SceneError> {
        let file: SceneFile = ron::from_str(ron_str)?;
        Ok(Self::from_file(&file))
    }

    /// Load a RON scene description from disk
    pub fn load(path: &Path) -> Result<Self, SceneError> {
        let contents = std::fs::read_to_string(path)?;
        let scene = Self::from_ron(&contents)?;
        if scene.is_empty() {
            tracing::warn!("Scene {:?} has no objects", path);
        }
        tracing::info!("Loaded scene {:?}: {} entities", path, scene.len());
        Ok(scene)
    }

    /// Build a scene from a parsed description
    pub fn from_file(file: &SceneFile) -> Self {
        let mut scene = Self::new();
        for node in &file.objects {
            scene.add_node(node, None);
        }
        scene
    }

    fn add_node(&mut self, node: &SceneNode, parent: Option<EntityId>) {
        let mut data = EntityData::new(node.name.clone());
        data.transform = node.transform;
        let id = self.add_entity(data, parent);
        for child in &node.children {
            self.add_node(child, Some(id));
        }
    }

    /// Add an entity under `parent` (or as a root)
    pub fn add_entity(&mut self, mut data: EntityData, parent: Option<EntityId>) -> EntityId {
        let id = EntityId::new();
        data.parent = parent.filter(|p| self.entities.contains_key(p));
        if let Some(parent_data) = data.parent.and_then(|p| self.entities.get_mut(&p)) {
            parent_data.children.push(id);
        }
        self.entities.insert(id, data);
        id
    }

    /// Get an entity by ID
    pub fn get(&self, id: &EntityId) -> Option<&EntityData> {
        self.entities.get(id)
    }

    /// Number of entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the scene has no entities
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Get all root entities (no parent)
    pub fn root_entities(&self) -> Vec<EntityId> {
        self.entities
            .iter()
            .filter(|(_, data)| data.parent.is_none())
            .map(|(id, _)| *id)
            .collect()
    }

    /// Object path of an entity: ancestor names joined with `/`
    pub fn entity_path(&self, id: &EntityId) -> Option<String> {
        let mut names = Vec::new();
        let mut current = Some(*id);
        while let Some(entity) = current.and_then(|id| self.entities.get(&id)) {
            names.push(entity.name.as_str());
            current = entity.parent;
        }
        if names.is_empty() {
            return None;
        }
        names.reverse();
        Some(join_path(names))
    }

    /// Walk `path` from the scene roots
    pub fn find_by_path(&self, path: &str) -> Option<EntityId> {
        let mut segments = path_segments(path);
        let root_name = segments.next()?;

        let mut current = self
            .root_entities()
            .into_iter()
            .find(|id| self.entities[id].name == root_name)?;

        for name in segments {
            current = self.entities[&current]
                .children
                .iter()
                .copied()
                .find(|child| self.entities.get(child).is_some_and(|c| c.name == name))?;
        }
        Some(current)
    }

    /// First entity with the given name anywhere in the scene
    pub fn find_by_name(&self, name: &str) -> Option<EntityId> {
        self.entities
            .iter()
            .find(|(_, data)| data.name == name)
            .map(|(id, _)| *id)
    }
}

impl ObjectResolver for SceneData {
    type Handle = EntityId;

    fn resolve(&self, path: &str) -> Option<EntityId> {
        if let Some(id) = self.find_by_path(path) {
            return Some(id);
        }

        // Objects may have been re-parented since the timeline was authored.
        let leaf = path_segments(path).last()?;
        let id = self.find_by_name(leaf)?;
        tracing::debug!("Resolved '{path}' by name to {:?}", self.entity_path(&id));
        Some(id)
    }
}

impl PropertySink for SceneData {
    type Handle = EntityId;

    fn apply(&mut self, target: &EntityId, property: &PropertyId, value: f32) {
        let Some((channel, axis)) = TransformChannel::parse(property.as_str()) else {
            tracing::trace!("Ignoring unknown property '{property}'");
            return;
        };
        if let Some(entity) = self.entities.get_mut(target) {
            channel.component_mut(&mut entity.transform)[axis] = value;
        }
    }

    fn read(&self, target: &EntityId, property: &PropertyId) -> Option<f32> {
        let (channel, axis) = TransformChannel::parse(property.as_str())?;
        let entity = self.entities.get(target)?;
        Some(channel.component(&entity.transform)[axis])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENE: &str = r#"(
        objects: [
            (
                name: "Root",
                children: [
                    (name: "Arm", transform: (position: (1.0, 2.0, 3.0)), children: [
                        (name: "Hand"),
                    ]),
                ],
            ),
            (name: "Light", transform: (scale: (2.0, 2.0, 2.0))),
        ],
    )"#;

    #[test]
    fn test_parse_transform_channels() {
        assert_eq!(TransformChannel::parse("position.x"), Some((TransformChannel::Position, 0)));
        assert_eq!(TransformChannel::parse("rotation.z"), Some((TransformChannel::Rotation, 2)));
        assert_eq!(TransformChannel::parse("scaleY"), Some((TransformChannel::Scale, 1)));
        assert_eq!(TransformChannel::parse("color.r"), None);
        assert_eq!(TransformChannel::parse("position.w"), None);
        assert_eq!(TransformChannel::parse("x"), None);
    }

    #[test]
    fn test_load_scene_description() {
        let scene = SceneData::from_ron(SCENE).unwrap();
        assert_eq!(scene.len(), 4);
        assert_eq!(scene.root_entities().len(), 2);

        let arm = scene.find_by_path("Root/Arm").unwrap();
        assert_eq!(scene.get(&arm).unwrap().transform.position, [1.0, 2.0, 3.0]);
        assert_eq!(scene.get(&arm).unwrap().transform.scale, [1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_paths_round_trip() {
        let scene = SceneData::from_ron(SCENE).unwrap();
        let hand = scene.find_by_path("Root/Arm/Hand").unwrap();
        assert_eq!(scene.entity_path(&hand).as_deref(), Some("Root/Arm/Hand"));
        assert!(scene.find_by_path("Root/Hand").is_none());
    }

    #[test]
    fn test_resolver_falls_back_to_name() {
        let scene = SceneData::from_ron(SCENE).unwrap();
        let hand = scene.find_by_path("Root/Arm/Hand");

        assert_eq!(scene.resolve("Old/Parent/Hand"), hand);
        assert_eq!(scene.resolve("Missing"), None);
        assert_eq!(scene.resolve(""), None);
    }

    #[test]
    fn test_sink_reads_and_writes_transform() {
        let mut scene = SceneData::from_ron(SCENE).unwrap();
        let light = scene.find_by_path("Light").unwrap();

        assert_eq!(scene.read(&light, &PropertyId::new("scale.x")), Some(2.0));
        scene.apply(&light, &PropertyId::new("rotation.y"), 90.0);
        scene.apply(&light, &PropertyId::new("positionZ"), -4.0);
        scene.apply(&light, &PropertyId::new("intensity"), 9.0);

        let transform = scene.get(&light).unwrap().transform;
        assert_eq!(transform.rotation, [0.0, 90.0, 0.0]);
        assert_eq!(transform.position, [0.0, 0.0, -4.0]);
        assert_eq!(scene.read(&light, &PropertyId::new("intensity")), None);
    }
}
