//! Document loaders that populate the [`Model`].
//!
//! [`MapLoader`] is the entry point. Object documents and imports are
//! processed through a [`LoadContext`] that borrows the loader's
//! collaborators for the duration of one load.

pub mod import;
pub mod map;
pub mod object;
pub mod viewport;

use std::path::Path;

use bevy_mapdoc_assets::prelude::{AnimationPool, ImagePool, Vfs};

use crate::model::Model;
use crate::progress::ProgressTracker;

pub use import::ImportResolver;
pub use map::{MapLoadError, MapLoader};
pub use object::{load_object, load_object_file};
pub use viewport::parse_viewport;

/// Mutable access to everything a single load writes into.
pub struct LoadContext<'a> {
    /// Scene repository receiving maps and object templates
    pub model: &'a mut Model,
    /// File access for documents
    pub vfs: &'a dyn Vfs,
    /// Pool receiving static and frame images
    pub images: &'a mut ImagePool,
    /// Pool receiving action animations
    pub animations: &'a mut AnimationPool,
    /// Per-element progress counter
    pub progress: &'a mut ProgressTracker,
    /// Directory of the map file; object documents are relative to it
    pub map_directory: &'a Path,
}
