//! Object templates and their actions.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use bevy_mapdoc_assets::prelude::{AnimationHandle, ImageHandle};

/// Arena index of an [`ObjectTemplate`] in the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub usize);

/// Index of a pathing algorithm registered in the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PatherId(pub usize);

/// A named behavior carrying one animation per direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    id: String,
    /// Duration in milliseconds, taken from the most recently attached animation.
    pub duration_ms: u32,
    animations: BTreeMap<i32, AnimationHandle>,
}

impl Action {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            duration_ms: 0,
            animations: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn add_animation(&mut self, direction: i32, animation: AnimationHandle) {
        self.animations.insert(direction, animation);
    }

    pub fn animation(&self, direction: i32) -> Option<AnimationHandle> {
        self.animations.get(&direction).copied()
    }

    /// Direction → animation, ordered by direction.
    pub fn animations(&self) -> &BTreeMap<i32, AnimationHandle> {
        &self.animations
    }
}

/// A reusable object definition, shared by every instance that places it.
///
/// Identified by `(id, namespace)`. A derived object keeps its parent's
/// index; lookups that fall back to the parent go through the model.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectTemplate {
    id: String,
    namespace: String,
    parent: Option<ObjectId>,
    pub blocking: bool,
    pub is_static: bool,
    pub pather: Option<PatherId>,
    /// Map-relative document this template was read from.
    pub resource_location: Option<PathBuf>,
    static_images: BTreeMap<i32, ImageHandle>,
    actions: Vec<Action>,
}

impl ObjectTemplate {
    pub fn new(id: impl Into<String>, namespace: impl Into<String>, parent: Option<ObjectId>) -> Self {
        Self {
            id: id.into(),
            namespace: namespace.into(),
            parent,
            blocking: false,
            is_static: false,
            pather: None,
            resource_location: None,
            static_images: BTreeMap::new(),
            actions: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn parent(&self) -> Option<ObjectId> {
        self.parent
    }

    pub fn resource_location(&self) -> Option<&Path> {
        self.resource_location.as_deref()
    }

    pub fn add_static_image(&mut self, angle: i32, image: ImageHandle) {
        self.static_images.insert(angle, image);
    }

    pub fn static_image(&self, angle: i32) -> Option<ImageHandle> {
        self.static_images.get(&angle).copied()
    }

    /// Angles with a static image, ascending. Does not consult the parent.
    pub fn static_image_angles(&self) -> Vec<i32> {
        self.static_images.keys().copied().collect()
    }

    /// Get or create the action with the given id.
    pub fn create_action(&mut self, id: &str) -> &mut Action {
        let index = match self.actions.iter().position(|action| action.id == id) {
            Some(index) => index,
            None => {
                self.actions.push(Action::new(id));
                self.actions.len() - 1
            }
        };
        &mut self.actions[index]
    }

    /// Own action by id. Does not consult the parent.
    pub fn action(&self, id: &str) -> Option<&Action> {
        self.actions.iter().find(|action| action.id == id)
    }

    pub fn action_mut(&mut self, id: &str) -> Option<&mut Action> {
        self.actions.iter_mut().find(|action| action.id == id)
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }
}
