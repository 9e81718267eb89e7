//! Map document loading.
//!
//! A map document lists object imports, then layers with their instances,
//! then cameras:
//!
//! ```xml
//! <map id="town" loaderName="mygame" elements="42">
//!     <import dir="objects"/>
//!     <import file="units/knight.xml"/>
//!     <layer id="ground" grid_type="square" pathing="cell_edges_only"
//!            x_offset="0" y_offset="0" x_scale="1" y_scale="1" rotation="0">
//!         <instances>
//!             <i o="grass" ns="nature" x="0" y="0"/>
//!             <i o="grass"/>
//!             <i obj="knight" namespace="units" x="4" y="2" r="90" stackpos="1"/>
//!         </instances>
//!     </layer>
//!     <camera id="main" ref_layer_id="ground" ref_cell_width="32" ref_cell_height="16"
//!             viewport="0,0,800,600" zoom="1.5"/>
//! </map>
//! ```

use std::path::{Path, PathBuf};

use bevy::log::{debug, error, info, warn};
use bevy::math::{DVec2, DVec3, IVec2, UVec2};
use bevy::platform::collections::HashSet;
use bevy_mapdoc_assets::prelude::{
    AnimationDocumentLoader, AnimationPool, AttributeResolver, DiskVfs, DocumentError, Element, ImagePool, Vfs,
    load_document, read_root,
};
use thiserror::Error;

use crate::components::{Camera, CellGridConfig, Layer, MapId, PathingStrategy, Viewport};
use crate::config::MapLoaderConfig;
use crate::loaders::{ImportResolver, LoadContext, parse_viewport};
use crate::model::{Model, ModelError};
use crate::progress::{PercentDoneListener, ProgressTracker};

/// Reasons a map load produces no map.
///
/// Problems with individual layers, instances, cameras or object documents
/// never surface here; those elements are skipped and logged.
#[derive(Debug, Error)]
pub enum MapLoadError {
    #[error("Failed to read map {path:?}: {source}")]
    Document {
        path: PathBuf,
        #[source]
        source: DocumentError,
    },

    #[error("Map {path:?} has no '{attribute}' attribute")]
    MissingAttribute { path: PathBuf, attribute: &'static str },

    #[error(transparent)]
    NameClash(#[from] ModelError),
}

/// Loads map documents into a [`Model`].
///
/// Owns the scene repository and the image and animation pools so that every
/// map loaded through it shares object templates and resources.
///
/// # Example
///
/// ```rust,no_run
/// use bevy_mapdoc_core::prelude::*;
///
/// let mut loader = MapLoader::new(MapLoaderConfig::default());
/// loader.add_percent_done_listener(|percent: u32| println!("{percent}%"));
///
/// let town = loader.load_map_file("assets/maps/town.xml")?;
/// let map = loader.model().map(town).unwrap();
/// println!("{} layers", map.layers().len());
/// # Ok::<(), MapLoadError>(())
/// ```
pub struct MapLoader {
    model: Model,
    vfs: Box<dyn Vfs>,
    images: ImagePool,
    animations: AnimationPool,
    config: MapLoaderConfig,
    progress: ProgressTracker,
    loader_name: String,
    import_directories: Vec<PathBuf>,
    registered_directories: HashSet<PathBuf>,
}

impl std::fmt::Debug for MapLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapLoader")
            .field("loader_name", &self.loader_name)
            .field("maps", &self.model.maps().count())
            .field("objects", &self.model.object_count())
            .field("images", &self.images.len())
            .field("animations", &self.animations.len())
            .field("import_directories", &self.import_directories)
            .finish_non_exhaustive()
    }
}

impl MapLoader {
    /// Loader reading from the local file system.
    pub fn new(config: MapLoaderConfig) -> Self {
        Self::with_vfs(config, DiskVfs::new())
    }

    pub fn with_vfs(config: MapLoaderConfig, vfs: impl Vfs + 'static) -> Self {
        Self {
            model: Model::new(),
            vfs: Box::new(vfs),
            images: ImagePool::new(),
            animations: AnimationPool::new(),
            progress: ProgressTracker::new(config.percent_done_interval),
            loader_name: config.loader_name.clone(),
            import_directories: Vec::new(),
            registered_directories: HashSet::default(),
            config,
        }
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut Model {
        &mut self.model
    }

    pub fn images(&self) -> &ImagePool {
        &self.images
    }

    pub fn animations(&self) -> &AnimationPool {
        &self.animations
    }

    pub fn vfs(&self) -> &dyn Vfs {
        self.vfs.as_ref()
    }

    pub fn config(&self) -> &MapLoaderConfig {
        &self.config
    }

    /// Name matched by [`MapLoader::is_loadable`]. A map's `loaderName`
    /// attribute replaces it.
    pub fn loader_name(&self) -> &str {
        &self.loader_name
    }

    /// Directories imported by the most recent load, in directive order.
    pub fn import_directories(&self) -> &[PathBuf] {
        &self.import_directories
    }

    pub fn set_percent_done_interval(&mut self, percent: u32) {
        self.progress.set_interval(percent);
    }

    pub fn add_percent_done_listener(&mut self, listener: impl PercentDoneListener + 'static) {
        self.progress.add_listener(listener);
    }

    /// Whether the document's `loader` attribute names this loader.
    ///
    /// Only the root element is inspected; unreadable documents are not loadable.
    pub fn is_loadable(&self, path: impl AsRef<Path>) -> bool {
        match read_root(self.vfs.as_ref(), path.as_ref()) {
            Ok(root) => root.first_attribute(&["loader", "loaderName"]) == Some(self.loader_name.as_str()),
            Err(_) => false,
        }
    }

    /// Load a map document and everything it imports.
    ///
    /// Fails only when the document cannot be read, has no `id`, or its id is
    /// already taken by another map.
    pub fn load_map_file(&mut self, path: impl AsRef<Path>) -> Result<MapId, MapLoadError> {
        let path = path.as_ref();
        info!("Loading map {}", path.display());

        self.progress.reset();
        self.import_directories.clear();

        let map_directory = path.parent().map(Path::to_path_buf).unwrap_or_default();
        self.register_directory(&map_directory);

        let root = load_document(self.vfs.as_ref(), path).map_err(|source| {
            error!("Failed to read map {}: {}", path.display(), source);
            MapLoadError::Document {
                path: path.to_path_buf(),
                source,
            }
        })?;

        if let Some(loader_name) = root.attribute("loaderName") {
            self.loader_name = loader_name.to_string();
        }
        self.progress.set_total(root.resolve(&["elements"], 0).value);

        let Some(map_name) = root.attribute("id") else {
            error!("Map {} has no id", path.display());
            return Err(MapLoadError::MissingAttribute {
                path: path.to_path_buf(),
                attribute: "id",
            });
        };

        let map_id = self.model.create_map(map_name).map_err(|e| {
            error!("Failed to create map from {}: {}", path.display(), e);
            MapLoadError::NameClash(e)
        })?;
        if let Some(map) = self.model.map_mut(map_id) {
            map.resource_location = Some(path.to_path_buf());
        }

        let screen_size = self.config.screen_size();
        let mut ctx = LoadContext {
            model: &mut self.model,
            vfs: self.vfs.as_ref(),
            images: &mut self.images,
            animations: &mut self.animations,
            progress: &mut self.progress,
            map_directory: &map_directory,
        };

        let mut imports = ImportResolver::new(&self.config);
        for import in root.children_named("import") {
            imports.resolve(&mut ctx, import.attribute("dir"), import.attribute("file"));
        }
        self.import_directories = imports.into_directories();

        // Sticky across every layer of the map.
        let mut namespace = String::new();
        for element in root.children_named("layer") {
            load_layer(&mut ctx, map_id, element, &mut namespace, path);
            ctx.progress.increment();
        }

        for element in root.children_named("camera") {
            load_camera(&mut ctx, map_id, element, screen_size, path);
            ctx.progress.increment();
        }

        if let Some(map) = self.model.map(map_id) {
            info!(
                "Loaded map '{}' from {}: {} layers, {} cameras",
                map.id(),
                path.display(),
                map.layers().len(),
                map.cameras().len()
            );
        }
        Ok(map_id)
    }

    /// Make `directory` a search path and an animation source, once.
    fn register_directory(&mut self, directory: &Path) {
        if !self.registered_directories.insert(directory.to_path_buf()) {
            return;
        }
        if !directory.as_os_str().is_empty() {
            self.vfs.add_search_directory(directory);
        }
        self.animations
            .add_provider(AnimationDocumentLoader::new(directory));
        debug!("Registered map directory {:?}", directory);
    }
}

fn load_layer(ctx: &mut LoadContext, map_id: MapId, element: &Element, namespace: &mut String, document: &Path) {
    let (
        Some(x_offset),
        Some(y_offset),
        Some(x_scale),
        Some(y_scale),
        Some(rotation),
        Some(layer_id),
        Some(pathing),
    ) = (
        element.query::<f64>(&["x_offset"]),
        element.query::<f64>(&["y_offset"]),
        element.query::<f64>(&["x_scale"]),
        element.query::<f64>(&["y_scale"]),
        element.query::<f64>(&["rotation"]),
        element.attribute("id"),
        element.attribute("pathing"),
    )
    else {
        warn!(
            "Skipping layer {:?} in {}: id, pathing, x_offset, y_offset, x_scale, y_scale and rotation are required",
            element.attribute("id"),
            document.display()
        );
        return;
    };

    let grid_type = element.attribute("grid_type").unwrap_or_else(|| {
        debug!("Layer '{}' has no grid_type, using square", layer_id);
        "square"
    });
    let Some(grid) = ctx.model.get_cell_grid(grid_type) else {
        warn!("Skipping layer '{}' in {}: unknown grid '{}'", layer_id, document.display(), grid_type);
        return;
    };

    if ctx.model.map(map_id).is_some_and(|map| map.layer(layer_id).is_some()) {
        warn!("Skipping layer '{}' in {}: duplicate layer id", layer_id, document.display());
        return;
    }

    let grid = grid.with_config(CellGridConfig {
        shift: DVec2::new(x_offset, y_offset),
        scale: DVec2::new(x_scale, y_scale),
        rotation,
    });
    let mut layer = Layer::new(layer_id, grid, PathingStrategy::from_name(pathing));

    // Cursor for omitted coordinates, reset per layer.
    let mut cursor = DVec2::ZERO;
    for instances in element.children_named("instances") {
        for instance in instances.children_named("i") {
            load_instance(ctx.model, &mut layer, instance, &mut cursor, namespace, document);
            ctx.progress.increment();
        }
    }

    let Some(map) = ctx.model.map_mut(map_id) else {
        return;
    };
    if let Err(e) = map.add_layer(layer) {
        warn!("Skipping layer in {}: {}", document.display(), e);
    }
}

fn load_instance(
    model: &Model,
    layer: &mut Layer,
    element: &Element,
    cursor: &mut DVec2,
    namespace: &mut String,
    document: &Path,
) {
    // Omitted x continues from the previous one; omitted y repeats it.
    cursor.x = match element.query::<f64>(&["x"]) {
        Some(x) => x,
        None => cursor.x + 1.0,
    };
    if let Some(y) = element.query::<f64>(&["y"]) {
        cursor.y = y;
    }
    let z = element.resolve(&["z"], 0.0).value;

    let Some(object_name) = element.first_attribute(&["o", "object", "obj"]) else {
        warn!("Skipping instance without object in layer '{}' of {}", layer.id(), document.display());
        return;
    };
    if let Some(ns) = element.first_attribute(&["ns", "namespace"]) {
        *namespace = ns.to_string();
    }

    let Some(object) = model.get_object(object_name, namespace) else {
        warn!(
            "Skipping instance of unknown object {}:{} in layer '{}' of {}",
            namespace,
            object_name,
            layer.id(),
            document.display()
        );
        return;
    };

    let layer_id = layer.id().to_string();
    let instance = layer.create_instance(
        object,
        DVec3::new(cursor.x, cursor.y, z),
        element.attribute("id").map(str::to_string),
    );

    instance.rotation = match element.query(&["r", "rotation"]) {
        Some(rotation) => rotation,
        None => {
            let rotation = model.static_image_angles(object).first().copied().unwrap_or(0);
            debug!("Instance of {}:{} defaults to rotation {}", namespace, object_name, rotation);
            rotation
        }
    };
    instance.stack_position = element.query(&["stackpos"]);

    if model.find_action(object, "default").is_some() {
        debug!("Instance of {}:{} starts its default action", namespace, object_name);
        instance.act("default", layer_id, true);
    }
}

fn load_camera(ctx: &mut LoadContext, map_id: MapId, element: &Element, screen_size: UVec2, document: &Path) {
    let (Some(camera_id), Some(layer_id), Some(cell_width), Some(cell_height)) = (
        element.attribute("id"),
        element.attribute("ref_layer_id"),
        element.query::<i32>(&["ref_cell_width"]),
        element.query::<i32>(&["ref_cell_height"]),
    ) else {
        warn!(
            "Skipping camera {:?} in {}: id, ref_layer_id, ref_cell_width and ref_cell_height are required",
            element.attribute("id"),
            document.display()
        );
        return;
    };

    let viewport = match element.attribute("viewport") {
        Some(raw) => parse_viewport(raw).unwrap_or_else(|| {
            warn!("Camera '{}' has malformed viewport '{}', using the full screen", camera_id, raw);
            Viewport::full_screen(screen_size)
        }),
        None => Viewport::full_screen(screen_size),
    };

    let mut camera = Camera::new(camera_id, layer_id, viewport);
    camera.cell_image_dimensions = IVec2::new(cell_width, cell_height);
    camera.tilt = element.resolve(&["tilt"], 0.0).value;
    camera.zoom = element.resolve(&["zoom"], 1.0).value;
    camera.rotation = element.resolve(&["rotation"], 0.0).value;

    let Some(map) = ctx.model.map_mut(map_id) else {
        return;
    };
    if let Err(e) = map.add_camera(camera) {
        warn!("Skipping camera '{}' in {}: {}", camera_id, document.display(), e);
    }
}
