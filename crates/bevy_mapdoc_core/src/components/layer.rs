//! Layers and the instances placed on them.

use bevy::math::DVec3;

use crate::components::grid::{CellGrid, PathingStrategy};
use crate::components::object::ObjectId;

/// Action an instance is currently performing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceAction {
    pub action: String,
    /// Layer the action targets.
    pub target_layer: String,
    pub repeating: bool,
}

/// A placed occurrence of an object template.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    id: Option<String>,
    object: ObjectId,
    location: DVec3,
    /// Rotation in degrees.
    pub rotation: i32,
    /// Draw-order tie breaker, only set when the document gives one.
    pub stack_position: Option<i32>,
    current_action: Option<InstanceAction>,
}

impl Instance {
    pub fn new(object: ObjectId, location: DVec3, id: Option<String>) -> Self {
        Self {
            id,
            object,
            location,
            rotation: 0,
            stack_position: None,
            current_action: None,
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// The template this instance places. Not owned by the instance.
    pub fn object(&self) -> ObjectId {
        self.object
    }

    /// Exact map coordinate.
    pub fn location(&self) -> DVec3 {
        self.location
    }

    /// Start performing `action` against `target_layer`.
    pub fn act(&mut self, action: impl Into<String>, target_layer: impl Into<String>, repeating: bool) {
        self.current_action = Some(InstanceAction {
            action: action.into(),
            target_layer: target_layer.into(),
            repeating,
        });
    }

    pub fn current_action(&self) -> Option<&InstanceAction> {
        self.current_action.as_ref()
    }
}

/// A named, grid-addressed plane of a map.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    id: String,
    grid: CellGrid,
    pub pathing: PathingStrategy,
    instances: Vec<Instance>,
}

impl Layer {
    /// Create a layer; the grid is fixed from here on.
    pub fn new(id: impl Into<String>, grid: CellGrid, pathing: PathingStrategy) -> Self {
        Self {
            id: id.into(),
            grid,
            pathing,
            instances: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn grid(&self) -> &CellGrid {
        &self.grid
    }

    pub fn create_instance(
        &mut self,
        object: ObjectId,
        location: DVec3,
        id: Option<String>,
    ) -> &mut Instance {
        self.instances.push(Instance::new(object, location, id));
        let last = self.instances.len() - 1;
        &mut self.instances[last]
    }

    /// Instances in creation order.
    pub fn instances(&self) -> &[Instance] {
        &self.instances
    }

    pub fn instance(&self, id: &str) -> Option<&Instance> {
        self.instances.iter().find(|instance| instance.id() == Some(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_instance_keeps_order() {
        let mut layer = Layer::new("ground", CellGrid::square(), PathingStrategy::Freeform);
        layer
            .create_instance(ObjectId(0), DVec3::new(1.0, 2.0, 0.0), Some("a".into()))
            .rotation = 90;
        layer.create_instance(ObjectId(1), DVec3::new(3.0, 2.0, 0.0), None);

        assert_eq!(layer.instances().len(), 2);
        assert_eq!(layer.instance("a").unwrap().rotation, 90);
        assert_eq!(layer.instances()[1].object(), ObjectId(1));
        assert_eq!(layer.instances()[1].id(), None);
    }

    #[test]
    fn test_act_records_action() {
        let mut instance = Instance::new(ObjectId(0), DVec3::ZERO, None);
        assert!(instance.current_action().is_none());
        instance.act("default", "ground", true);
        let action = instance.current_action().unwrap();
        assert_eq!(action.action, "default");
        assert_eq!(action.target_layer, "ground");
        assert!(action.repeating);
    }
}
