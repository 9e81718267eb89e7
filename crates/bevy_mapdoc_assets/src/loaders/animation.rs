use std::path::{Path, PathBuf};

use bevy::log::warn;

use crate::assets::animation::{Animation, AnimationProvider};
use crate::assets::image::ImagePool;
use crate::attributes::AttributeResolver;
use crate::document::{Element, load_document};
use crate::resource::{ImageLocation, ResourceLocator, resolve_source};
use crate::vfs::Vfs;

/// Loader for animation documents.
///
/// An animation document is a root element carrying animation-wide defaults
/// (`delay`, `x_offset`, `y_offset`, `action`) and one `frame` child per
/// frame in playback order:
///
/// ```xml
/// <animation delay="100" x_offset="-16" y_offset="-32" action="1">
///     <frame source="walk_0.png"/>
///     <frame source="walk_1.png" delay="150"/>
/// </animation>
/// ```
///
/// Locators already carry the map directory and are read as given. A loader
/// only serves absolute locators and those under the directory it was created
/// for.
#[derive(Debug, Clone)]
pub struct AnimationDocumentLoader {
    map_directory: PathBuf,
}

impl AnimationDocumentLoader {
    pub fn new(map_directory: impl Into<PathBuf>) -> Self {
        Self {
            map_directory: map_directory.into(),
        }
    }

    pub fn map_directory(&self) -> &Path {
        &self.map_directory
    }
}

impl AnimationProvider for AnimationDocumentLoader {
    fn extensions(&self) -> &[&str] {
        &["xml"]
    }

    fn load(
        &self,
        locator: &ResourceLocator,
        vfs: &dyn Vfs,
        images: &mut ImagePool,
    ) -> Option<Animation> {
        let path = locator.path();
        if !path.is_absolute() && !path.starts_with(&self.map_directory) {
            return None;
        }
        match load_document(vfs, path) {
            Ok(root) => Some(build_animation(&root, path, images)),
            Err(e) => {
                warn!("Animation {} unavailable: {}", locator, e);
                None
            }
        }
    }
}

/// Build an [`Animation`] from a parsed animation document.
///
/// `document` is the animation's own locator; frame sources are resolved
/// relative to it.
pub fn build_animation(root: &Element, document: &Path, images: &mut ImagePool) -> Animation {
    let delay: u32 = root.resolve(&["delay"], 0).value;
    let x_offset: i32 = root.resolve(&["x_offset"], 0).value;
    let y_offset: i32 = root.resolve(&["y_offset"], 0).value;

    let mut animation = Animation::new();
    animation.action_frame = root.resolve(&["action"], 0).value;

    for frame in root.children_named("frame") {
        let Some(source) = frame.attribute("source") else {
            warn!("Skipping frame without source in {}", document.display());
            continue;
        };

        let location = ImageLocation::new(resolve_source(document, source)).with_shift(
            frame.resolve(&["x_offset"], x_offset).value,
            frame.resolve(&["y_offset"], y_offset).value,
        );
        let image = images.add_from_location(location);
        animation.add_frame(image, frame.resolve(&["delay"], delay).value);
    }

    animation
}
