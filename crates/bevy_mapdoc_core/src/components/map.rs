//! Map documents.

use std::path::{Path, PathBuf};

use crate::components::camera::Camera;
use crate::components::layer::Layer;
use crate::model::ModelError;

/// Index of a map in the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MapId(pub usize);

/// Root scene container: ordered layers plus named cameras.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MapDocument {
    id: String,
    /// File the map was loaded from.
    pub resource_location: Option<PathBuf>,
    layers: Vec<Layer>,
    cameras: Vec<Camera>,
}

impl MapDocument {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn resource_location(&self) -> Option<&Path> {
        self.resource_location.as_deref()
    }

    /// Append a layer. Layer ids are unique within a map.
    pub fn add_layer(&mut self, layer: Layer) -> Result<&mut Layer, ModelError> {
        if self.layer(layer.id()).is_some() {
            return Err(ModelError::NameClash {
                kind: "layer",
                name: layer.id().to_string(),
            });
        }
        self.layers.push(layer);
        let last = self.layers.len() - 1;
        Ok(&mut self.layers[last])
    }

    pub fn layer(&self, id: &str) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.id() == id)
    }

    pub fn layer_mut(&mut self, id: &str) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|layer| layer.id() == id)
    }

    /// Layers in document order.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Attach a camera. Its id must be unique and its layer must exist.
    pub fn add_camera(&mut self, camera: Camera) -> Result<&mut Camera, ModelError> {
        if self.layer(camera.layer()).is_none() {
            return Err(ModelError::NotFound {
                kind: "layer",
                name: camera.layer().to_string(),
            });
        }
        if self.camera(camera.id()).is_some() {
            return Err(ModelError::NameClash {
                kind: "camera",
                name: camera.id().to_string(),
            });
        }
        self.cameras.push(camera);
        let last = self.cameras.len() - 1;
        Ok(&mut self.cameras[last])
    }

    pub fn camera(&self, id: &str) -> Option<&Camera> {
        self.cameras.iter().find(|camera| camera.id() == id)
    }

    pub fn cameras(&self) -> &[Camera] {
        &self.cameras
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::camera::Viewport;
    use crate::components::grid::{CellGrid, PathingStrategy};

    #[test]
    fn test_layer_ids_are_unique() {
        let mut map = MapDocument::new("town");
        map.add_layer(Layer::new("ground", CellGrid::square(), PathingStrategy::EdgesOnly))
            .unwrap();
        let clash = map.add_layer(Layer::new("ground", CellGrid::hexagonal(), PathingStrategy::Freeform));
        assert!(matches!(clash, Err(ModelError::NameClash { kind: "layer", .. })));
        assert_eq!(map.layers().len(), 1);
    }

    #[test]
    fn test_camera_requires_existing_layer() {
        let mut map = MapDocument::new("town");
        let missing = map.add_camera(Camera::new("main", "ground", Viewport::default()));
        assert!(matches!(missing, Err(ModelError::NotFound { .. })));

        map.add_layer(Layer::new("ground", CellGrid::square(), PathingStrategy::EdgesOnly))
            .unwrap();
        map.add_camera(Camera::new("main", "ground", Viewport::new(0, 0, 10, 10)))
            .unwrap();
        assert!(map.add_camera(Camera::new("main", "ground", Viewport::default())).is_err());
        assert_eq!(map.camera("main").unwrap().viewport.width, 10);
    }
}
