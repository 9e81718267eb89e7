//! # `bevy_mapdoc_core`
//!
//! Scene model and map loading backbone for `bevy_mapdoc`. Reads a map
//! document, the object documents it imports and the animations they
//! reference, and resolves them into a populated [`Model`](model::Model).
//!
//! **This crate does NOT render, play animations or run pathing** - it records
//! animation metadata and the pathing strategy a layer asks for.
//!
//! ## Architecture
//!
//! Layer 2 (this crate) builds on **Layer 1** (`bevy_mapdoc_assets`), which
//! provides documents, attribute lookups, file access and the image and
//! animation pools.
//!
//! ## What Layer 2 Provides
//!
//! 1. **Scene model**: maps, layers, instances, cameras and shared object templates
//! 2. **Loaders**: map, object and import resolution with tolerant defaulting
//! 3. **Progress**: percent-done notifications while a map loads
//! 4. **Plugin** (feature `plugin`): loads maps requested by entities
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use bevy_mapdoc_core::prelude::*;
//!
//! let mut loader = MapLoader::new(MapLoaderConfig::default());
//! match loader.load_map_file("assets/maps/town.xml") {
//!     Ok(town) => {
//!         for layer in loader.model().map(town).unwrap().layers() {
//!             println!("{}: {} instances", layer.id(), layer.instances().len());
//!         }
//!     }
//!     Err(e) => eprintln!("no map: {e}"),
//! }
//! ```

pub mod components;
pub mod config;
pub mod loaders;
pub mod model;
pub mod progress;

#[cfg(feature = "plugin")]
pub mod events;
#[cfg(feature = "plugin")]
pub mod plugin;

pub mod prelude {
    //! Common imports for `bevy_mapdoc_core` users.

    pub use crate::components::{
        Action, Camera, CellGrid, CellGridConfig, GridKind, Instance, InstanceAction, Layer, MapDocument, MapId,
        ObjectId, ObjectTemplate, PatherId, PathingStrategy, Viewport,
    };
    pub use crate::config::{ConfigError, MapLoaderConfig};
    pub use crate::loaders::{ImportResolver, LoadContext, MapLoadError, MapLoader, parse_viewport};
    pub use crate::model::{DEFAULT_PATHER, Model, ModelError};
    pub use crate::progress::{PercentDoneListener, ProgressTracker};

    #[cfg(feature = "plugin")]
    pub use crate::events::MapdocLoaded;
    #[cfg(feature = "plugin")]
    pub use crate::plugin::{LoadedMapdoc, MapdocLoadFailed, MapdocLoader, MapdocMap, MapdocPlugin};
}

// Re-export the entry points at crate root for convenience
pub use config::MapLoaderConfig;
pub use loaders::MapLoader;
#[cfg(feature = "plugin")]
pub use plugin::MapdocPlugin;
