//! Scene repository: maps, object templates, grid prototypes and pathers.

use bevy::platform::collections::HashMap;
use thiserror::Error;

use crate::components::{Action, CellGrid, MapDocument, MapId, ObjectId, ObjectTemplate, PatherId};

/// Name of the pathing algorithm objects get when their document names none.
pub const DEFAULT_PATHER: &str = "RoutePather";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("A {kind} named '{name}' already exists")]
    NameClash { kind: &'static str, name: String },

    #[error("No {kind} named '{name}'")]
    NotFound { kind: &'static str, name: String },
}

/// Owns every map and object template created by the loaders.
///
/// Object templates live in an arena and are referenced by [`ObjectId`], so
/// any number of instances can share one template.
#[derive(Debug, Clone)]
pub struct Model {
    maps: Vec<Option<MapDocument>>,
    objects: Vec<ObjectTemplate>,
    object_index: HashMap<(String, String), ObjectId>,
    grids: Vec<CellGrid>,
    pathers: Vec<String>,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            maps: Vec::new(),
            objects: Vec::new(),
            object_index: HashMap::default(),
            grids: vec![CellGrid::square(), CellGrid::hexagonal()],
            pathers: vec![DEFAULT_PATHER.to_string()],
        }
    }
}

impl Model {
    /// A model with the `square` and `hexagonal` grids and the default pather.
    pub fn new() -> Self {
        Self::default()
    }

    // ===== MAPS =====

    /// Create an empty map. Map ids are unique across the model.
    pub fn create_map(&mut self, id: &str) -> Result<MapId, ModelError> {
        if self.map_by_name(id).is_some() {
            return Err(ModelError::NameClash {
                kind: "map",
                name: id.to_string(),
            });
        }
        self.maps.push(Some(MapDocument::new(id)));
        Ok(MapId(self.maps.len() - 1))
    }

    pub fn map(&self, id: MapId) -> Option<&MapDocument> {
        self.maps.get(id.0).and_then(Option::as_ref)
    }

    pub fn map_mut(&mut self, id: MapId) -> Option<&mut MapDocument> {
        self.maps.get_mut(id.0).and_then(Option::as_mut)
    }

    pub fn map_by_name(&self, name: &str) -> Option<MapId> {
        self.maps
            .iter()
            .position(|map| map.as_ref().is_some_and(|m| m.id() == name))
            .map(MapId)
    }

    /// Remove a map, freeing its name. Other map ids stay valid.
    pub fn delete_map(&mut self, id: MapId) -> Option<MapDocument> {
        self.maps.get_mut(id.0).and_then(Option::take)
    }

    pub fn maps(&self) -> impl Iterator<Item = (MapId, &MapDocument)> {
        self.maps
            .iter()
            .enumerate()
            .filter_map(|(index, map)| map.as_ref().map(|m| (MapId(index), m)))
    }

    // ===== GRIDS & PATHERS =====

    /// Register a grid prototype, replacing any prototype with the same name.
    pub fn add_cell_grid(&mut self, grid: CellGrid) {
        self.grids.retain(|existing| existing.name() != grid.name());
        self.grids.push(grid);
    }

    /// A fresh copy of the named grid prototype.
    pub fn get_cell_grid(&self, name: &str) -> Option<CellGrid> {
        self.grids.iter().find(|grid| grid.name() == name).cloned()
    }

    pub fn add_pather(&mut self, name: &str) -> PatherId {
        match self.get_pather(name) {
            Some(id) => id,
            None => {
                self.pathers.push(name.to_string());
                PatherId(self.pathers.len() - 1)
            }
        }
    }

    pub fn get_pather(&self, name: &str) -> Option<PatherId> {
        self.pathers.iter().position(|p| p == name).map(PatherId)
    }

    pub fn pather_name(&self, id: PatherId) -> Option<&str> {
        self.pathers.get(id.0).map(String::as_str)
    }

    // ===== OBJECTS =====

    /// Create a template. `(id, namespace)` must not exist yet.
    pub fn create_object(
        &mut self,
        id: &str,
        namespace: &str,
        parent: Option<ObjectId>,
    ) -> Result<ObjectId, ModelError> {
        let key = (id.to_string(), namespace.to_string());
        if self.object_index.contains_key(&key) {
            return Err(ModelError::NameClash {
                kind: "object",
                name: format!("{namespace}:{id}"),
            });
        }
        if let Some(parent) = parent
            && self.object(parent).is_none()
        {
            return Err(ModelError::NotFound {
                kind: "parent object",
                name: format!("#{}", parent.0),
            });
        }

        let object_id = ObjectId(self.objects.len());
        self.objects.push(ObjectTemplate::new(id, namespace, parent));
        self.object_index.insert(key, object_id);
        Ok(object_id)
    }

    pub fn get_object(&self, id: &str, namespace: &str) -> Option<ObjectId> {
        self.object_index
            .get(&(id.to_string(), namespace.to_string()))
            .copied()
    }

    pub fn object(&self, id: ObjectId) -> Option<&ObjectTemplate> {
        self.objects.get(id.0)
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut ObjectTemplate> {
        self.objects.get_mut(id.0)
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// `id` followed by its ancestors.
    pub fn inheritance_chain(&self, id: ObjectId) -> impl Iterator<Item = &ObjectTemplate> {
        std::iter::successors(self.object(id), |object| {
            object.parent().and_then(|parent| self.object(parent))
        })
    }

    /// Action lookup falling back through the parent chain.
    pub fn find_action(&self, id: ObjectId, action: &str) -> Option<&Action> {
        self.inheritance_chain(id)
            .find_map(|object| object.action(action))
    }

    /// Static image angles of the nearest template in the chain that has any.
    pub fn static_image_angles(&self, id: ObjectId) -> Vec<i32> {
        self.inheritance_chain(id)
            .map(ObjectTemplate::static_image_angles)
            .find(|angles| !angles.is_empty())
            .unwrap_or_default()
    }

    /// Pather of the nearest template in the chain that has one.
    pub fn pather_of(&self, id: ObjectId) -> Option<PatherId> {
        self.inheritance_chain(id).find_map(|object| object.pather)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_mapdoc_assets::prelude::{AnimationHandle, ImageHandle};

    #[test]
    fn test_map_names_clash() {
        let mut model = Model::new();
        let town = model.create_map("town").unwrap();
        assert!(matches!(
            model.create_map("town"),
            Err(ModelError::NameClash { kind: "map", .. })
        ));
        assert_eq!(model.map(town).unwrap().id(), "town");

        model.delete_map(town);
        assert!(model.map(town).is_none());
        assert!(model.create_map("town").is_ok());
    }

    #[test]
    fn test_grid_lookup_returns_copies() {
        let model = Model::new();
        assert_eq!(model.get_cell_grid("square").unwrap().name(), "square");
        assert!(model.get_cell_grid("hexagonal").is_some());
        assert!(model.get_cell_grid("triangle").is_none());
    }

    #[test]
    fn test_default_pather_registered() {
        let mut model = Model::new();
        let route = model.get_pather(DEFAULT_PATHER).unwrap();
        assert_eq!(model.pather_name(route), Some(DEFAULT_PATHER));
        assert_eq!(model.add_pather(DEFAULT_PATHER), route);
        assert_ne!(model.add_pather("LinearPather"), route);
    }

    #[test]
    fn test_object_identity_is_id_and_namespace() {
        let mut model = Model::new();
        let a = model.create_object("tree", "nature", None).unwrap();
        let b = model.create_object("tree", "city", None).unwrap();
        assert_ne!(a, b);
        assert!(model.create_object("tree", "nature", None).is_err());
        assert_eq!(model.get_object("tree", "city"), Some(b));
    }

    #[test]
    fn test_lookups_fall_back_to_parent() {
        let mut model = Model::new();
        let base = model.create_object("unit", "units", None).unwrap();
        let route = model.get_pather(DEFAULT_PATHER);
        {
            let unit = model.object_mut(base).unwrap();
            unit.add_static_image(90, ImageHandle(0));
            unit.add_static_image(0, ImageHandle(1));
            unit.create_action("default").add_animation(0, AnimationHandle(0));
            unit.pather = route;
        }
        let knight = model.create_object("knight", "units", Some(base)).unwrap();
        model.object_mut(knight).unwrap().create_action("attack");

        assert!(model.find_action(knight, "default").is_some());
        assert!(model.find_action(knight, "attack").is_some());
        assert!(model.find_action(base, "attack").is_none());
        assert_eq!(model.static_image_angles(knight), vec![0, 90]);
        assert_eq!(model.pather_of(knight), model.get_pather(DEFAULT_PATHER));
        assert_eq!(model.inheritance_chain(knight).count(), 2);
    }
}
