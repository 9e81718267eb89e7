use bevy::log::warn;
use bevy::platform::collections::HashMap;

use crate::assets::image::{ImageHandle, ImagePool};
use crate::resource::ResourceLocator;
use crate::vfs::Vfs;

/// Index of an animation registered in an [`AnimationPool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnimationHandle(pub usize);

/// A single frame in an animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationFrame {
    /// The image shown for this frame.
    pub image: ImageHandle,
    /// How long the frame is shown (milliseconds).
    pub delay_ms: u32,
}

/// Animation metadata: frames in playback order plus the action frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Animation {
    frames: Vec<AnimationFrame>,
    /// Frame shown as the representative still of the animation.
    pub action_frame: i32,
}

impl Animation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_frame(&mut self, image: ImageHandle, delay_ms: u32) {
        self.frames.push(AnimationFrame { image, delay_ms });
    }

    pub fn frames(&self) -> &[AnimationFrame] {
        &self.frames
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Total playback time, the sum of all frame delays, saturating at `u32::MAX`.
    pub fn duration_ms(&self) -> u32 {
        self.frames
            .iter()
            .fold(0u32, |total, frame| total.saturating_add(frame.delay_ms))
    }

    /// The frame at [`Animation::action_frame`], if it is in range.
    pub fn action_frame_image(&self) -> Option<ImageHandle> {
        usize::try_from(self.action_frame)
            .ok()
            .and_then(|index| self.frames.get(index))
            .map(|frame| frame.image)
    }
}

/// Produces animations from animation files.
///
/// Providers are registered on an [`AnimationPool`] and consulted in
/// registration order the first time a locator is requested.
pub trait AnimationProvider: Send + Sync {
    /// File extensions this provider understands (lower case, no dot).
    /// An empty list accepts every file.
    fn extensions(&self) -> &[&str] {
        &[]
    }

    /// Load the animation at `locator`, registering its frame images.
    ///
    /// Returns `None` when the file is unreadable or malformed.
    fn load(
        &self,
        locator: &ResourceLocator,
        vfs: &dyn Vfs,
        images: &mut ImagePool,
    ) -> Option<Animation>;
}

/// Pool of loaded animations, keyed by locator.
#[derive(Default)]
pub struct AnimationPool {
    providers: Vec<Box<dyn AnimationProvider>>,
    animations: Vec<Animation>,
    by_locator: HashMap<ResourceLocator, AnimationHandle>,
}

impl AnimationPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_provider(&mut self, provider: impl AnimationProvider + 'static) {
        self.providers.push(Box::new(provider));
    }

    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    /// Load (or reuse) the animation at `locator`.
    ///
    /// Returns `None` when no provider could produce it; the caller treats the
    /// animation as unavailable.
    pub fn add_from_file(
        &mut self,
        locator: &ResourceLocator,
        vfs: &dyn Vfs,
        images: &mut ImagePool,
    ) -> Option<AnimationHandle> {
        if let Some(handle) = self.by_locator.get(locator) {
            return Some(*handle);
        }

        let extension = locator.extension();
        let animation = self
            .providers
            .iter()
            .filter(|provider| {
                let accepted = provider.extensions();
                accepted.is_empty()
                    || extension
                        .as_deref()
                        .is_some_and(|ext| accepted.contains(&ext))
            })
            .find_map(|provider| provider.load(locator, vfs, images));

        let Some(animation) = animation else {
            warn!("No animation provider could load {}", locator);
            return None;
        };

        let handle = AnimationHandle(self.animations.len());
        self.animations.push(animation);
        self.by_locator.insert(locator.clone(), handle);
        Some(handle)
    }

    pub fn get(&self, handle: AnimationHandle) -> Option<&Animation> {
        self.animations.get(handle.0)
    }

    pub fn len(&self) -> usize {
        self.animations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }
}

impl std::fmt::Debug for AnimationPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationPool")
            .field("providers", &self.providers.len())
            .field("animations", &self.animations)
            .finish()
    }
}
