//! Plugin for `bevy_mapdoc_core`.

use std::path::PathBuf;

use bevy::prelude::*;

use crate::components::MapId;
use crate::config::MapLoaderConfig;
use crate::events::MapdocLoaded;
use crate::loaders::MapLoader;

/// The shared map loader and the model it fills.
#[derive(Resource, Debug, Deref, DerefMut)]
pub struct MapdocLoader(pub MapLoader);

/// Requests loading the map document at `path`.
///
/// Path is handed to the loader unchanged; relative paths resolve against the
/// working directory.
#[derive(Component, Debug, Clone)]
pub struct MapdocMap {
    pub path: PathBuf,
}

impl MapdocMap {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// Added once the requested map is in the model.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadedMapdoc {
    pub map: MapId,
}

/// Added when the requested map could not be loaded. The request is not retried.
#[derive(Component, Debug, Clone)]
pub struct MapdocLoadFailed {
    pub reason: String,
}

/// Plugin loading map documents requested through [`MapdocMap`].
///
/// # Example
///
/// ```rust,no_run
/// use bevy::prelude::*;
/// use bevy_mapdoc_core::prelude::*;
///
/// fn setup(mut commands: Commands) {
///     commands.spawn(MapdocMap::new("assets/maps/town.xml"));
/// }
///
/// App::new()
///     .add_plugins(MapdocPlugin::new(MapLoaderConfig {
///         screen_width: 1280,
///         screen_height: 720,
///         ..default()
///     }))
///     .add_systems(Startup, setup)
///     .run();
/// ```
#[derive(Default)]
pub struct MapdocPlugin {
    config: MapLoaderConfig,
}

impl MapdocPlugin {
    /// Create a new plugin with custom configuration.
    pub fn new(config: MapLoaderConfig) -> Self {
        Self { config }
    }
}

impl Plugin for MapdocPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(MapdocLoader(MapLoader::new(self.config.clone())));

        // Runs before user systems so maps requested at startup are ready in Update
        app.add_systems(PreUpdate, load_requested_maps);
    }
}

/// Loads every requested map that has not been attempted yet.
pub fn load_requested_maps(
    mut loader: ResMut<MapdocLoader>,
    mut commands: Commands,
    requests: Query<(Entity, &MapdocMap), (Without<LoadedMapdoc>, Without<MapdocLoadFailed>)>,
) {
    for (entity, request) in &requests {
        match loader.load_map_file(&request.path) {
            Ok(map) => {
                let map_name = loader
                    .model()
                    .map(map)
                    .map(|document| document.id().to_string())
                    .unwrap_or_default();

                commands
                    .entity(entity)
                    .insert((LoadedMapdoc { map }, Name::new(format!("Map: {}", map_name))));
                commands.trigger(MapdocLoaded {
                    entity,
                    map,
                    map_name,
                });
            }
            Err(e) => {
                error!("Failed to load map {}: {}", request.path.display(), e);
                commands.entity(entity).insert(MapdocLoadFailed {
                    reason: e.to_string(),
                });
            }
        }
    }
}
