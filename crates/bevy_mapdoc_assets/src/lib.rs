//! # `bevy_mapdoc_assets`
//!
//! Layer 1 of `bevy_mapdoc`: document parsing and asset bookkeeping with no
//! scene concerns.
//!
//! - [`document`]: element tree with ordered children and named attributes
//! - [`attributes`]: fallback-chained, tolerant attribute lookups
//! - [`resource`]: resource locators and relative source resolution
//! - [`vfs`]: search-directory file access and directory listing
//! - [`assets`]: image and animation pools
//! - [`loaders`]: the animation document loader
//!
//! Scene construction (maps, layers, instances, object templates) lives in
//! `bevy_mapdoc_core`.

pub mod assets;
pub mod attributes;
pub mod document;
pub mod loaders;
pub mod resource;
pub mod vfs;

/// Prelude module for convenient imports
///
/// # Example
/// ```no_run
/// use bevy_mapdoc_assets::prelude::*;
///
/// let mut vfs = DiskVfs::new();
/// vfs.add_search_directory(std::path::Path::new("assets/maps"));
/// let mut images = ImagePool::new();
/// let mut animations = AnimationPool::new();
/// animations.add_provider(AnimationDocumentLoader::new("assets/maps"));
/// let walk = animations.add_from_file(&ResourceLocator::from("assets/maps/walk.xml"), &vfs, &mut images);
/// ```
pub mod prelude {
    pub use crate::assets::{
        animation::{Animation, AnimationFrame, AnimationHandle, AnimationPool, AnimationProvider},
        image::{ImageHandle, ImagePool},
    };
    pub use crate::attributes::{AttributeResolver, Resolved};
    pub use crate::document::{DocumentError, Element, load_document, parse_document, parse_root, read_root};
    pub use crate::loaders::animation::AnimationDocumentLoader;
    pub use crate::resource::{ImageLocation, ResourceLocator, resolve_source};
    pub use crate::vfs::{DiskVfs, Vfs};
}
