//! # bevy_mapdoc
//!
//! Declarative tile map loading for Bevy.
//!
//! This is a meta-crate that combines the `bevy_mapdoc_*` sub-crates behind a
//! single dependency and prelude.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bevy::prelude::*;
//! use bevy_mapdoc::prelude::*;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(MapdocPlugin::default())
//!         .add_systems(Startup, request_map)
//!         .add_systems(Update, report_layers)
//!         .run();
//! }
//!
//! fn request_map(mut commands: Commands) {
//!     commands.spawn(MapdocMap::new("assets/maps/town.xml"));
//! }
//!
//! fn report_layers(loader: Res<MapdocLoader>, maps: Query<&LoadedMapdoc, Added<LoadedMapdoc>>) {
//!     for loaded in &maps {
//!         if let Some(map) = loader.model().map(loaded.map) {
//!             info!("{} has {} layers", map.id(), map.layers().len());
//!         }
//!     }
//! }
//! ```
//!
//! ## Features
//!
//! - **default**: Includes `plugin`
//! - **plugin**: `MapdocPlugin` and the `MapdocMap` request component
//!
//! ## Architecture
//!
//! - **Layer 1** ([`assets`]): documents, attribute lookups, file access, image and animation pools
//! - **Layer 2** ([`core`]): scene model, map/object/import loaders, progress reporting
//!
//! Without the `plugin` feature the loader is usable on its own:
//!
//! ```rust,no_run
//! use bevy_mapdoc::prelude::*;
//!
//! let mut loader = MapLoader::new(MapLoaderConfig::from_file("assets/loader.json")?);
//! let town = loader.load_map_file("assets/maps/town.xml")?;
//! # let _ = town;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Re-export sub-crates for advanced usage
pub use bevy_mapdoc_assets as assets;
pub use bevy_mapdoc_core as core;

/// Unified prelude for bevy_mapdoc
pub mod prelude {
    pub use crate::assets::prelude::*;
    pub use crate::core::prelude::*;
}
