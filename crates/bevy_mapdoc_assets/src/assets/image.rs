use std::path::PathBuf;

use bevy::platform::collections::HashMap;

use crate::resource::ImageLocation;
use crate::vfs::Vfs;

/// Index of an image registered in an [`ImagePool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageHandle(pub usize);

/// Pool of image locations.
///
/// Registration only records where an image lives; pixels are never loaded
/// here. Registering the same location twice returns the same handle.
#[derive(Debug, Default)]
pub struct ImagePool {
    locations: Vec<ImageLocation>,
    by_location: HashMap<ImageLocation, ImageHandle>,
}

impl ImagePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a location, returning its handle.
    pub fn add_from_location(&mut self, location: ImageLocation) -> ImageHandle {
        if let Some(handle) = self.by_location.get(&location) {
            return *handle;
        }
        let handle = ImageHandle(self.locations.len());
        self.locations.push(location.clone());
        self.by_location.insert(location, handle);
        handle
    }

    pub fn get(&self, handle: ImageHandle) -> Option<&ImageLocation> {
        self.locations.get(handle.0)
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Concrete file backing `handle`, looked up through the search directories.
    pub fn resolve_path(&self, handle: ImageHandle, vfs: &dyn Vfs) -> Option<PathBuf> {
        self.get(handle)
            .and_then(|location| vfs.resolve(location.locator.path()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::ResourceLocator;
    use crate::vfs::DiskVfs;

    #[test]
    fn test_same_location_shares_handle() {
        let mut pool = ImagePool::new();
        let a = pool.add_from_location(ImageLocation::new(ResourceLocator::from("a.png")));
        let b = pool.add_from_location(ImageLocation::new(ResourceLocator::from("b.png")));
        let a_again = pool.add_from_location(ImageLocation::new(ResourceLocator::from("a.png")));
        let a_shifted = pool.add_from_location(
            ImageLocation::new(ResourceLocator::from("a.png")).with_shift(2, 3),
        );

        assert_eq!(a, a_again);
        assert_ne!(a, b);
        assert_ne!(a, a_shifted);
        assert_eq!(pool.len(), 3);
        assert_eq!(pool.get(a_shifted).unwrap().x_shift, 2);
    }

    #[test]
    fn test_resolve_path_uses_search_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("grass.png"), [0u8; 4]).unwrap();

        let mut vfs = DiskVfs::new();
        vfs.add_search_directory(dir.path());

        let mut pool = ImagePool::new();
        let grass = pool.add_from_location(ImageLocation::new(ResourceLocator::from("grass.png")));
        let missing = pool.add_from_location(ImageLocation::new(ResourceLocator::from("nope.png")));

        assert_eq!(pool.resolve_path(grass, &vfs), Some(dir.path().join("grass.png")));
        assert_eq!(pool.resolve_path(missing, &vfs), None);
    }
}
