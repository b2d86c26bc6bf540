//! Interfaces to the engine subsystems that tasks load into.
//!
//! The loader never owns a cache. Every task receives a [`LoadContext`]
//! bundling the services for the current frame and performs a single call
//! against one of them. All methods take `&self`; implementations that
//! mutate shared caches use interior mutability.

use std::time::Duration;

use crate::error::ResourceResult;

/// Opaque identifier of a texture registered in a [`TextureCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u64);

/// Opaque identifier of a sprite frame held by a [`SpriteFrameCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpriteFrameId(pub u64);

/// One step of an [`Animation`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationFrame {
    /// The sprite frame shown during this step.
    pub sprite_frame: SpriteFrameId,
    /// How long the step lasts.
    pub delay: Duration,
}

/// An ordered sequence of sprite frames, as stored in the [`AnimationCache`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Animation {
    /// Frames in playback order.
    pub frames: Vec<AnimationFrame>,
    /// Restore the sprite's original frame once playback finishes.
    pub restore_original_frame: bool,
}

impl Animation {
    /// Total playback time of one loop.
    pub fn duration(&self) -> Duration {
        self.frames.iter().map(|f| f.delay).sum()
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Returns true if the animation has no frames.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Texture cache: decodes images and keeps them by name.
pub trait TextureCache {
    /// Load an image file by name and cache it.
    fn add_image(&self, name: &str) -> ResourceResult<TextureId>;

    /// Decode in-memory image data and cache it under `name`.
    fn add_image_data(&self, name: &str, data: &[u8]) -> ResourceResult<TextureId>;
}

/// Sprite-frame cache fed by atlas descriptors.
pub trait SpriteFrameCache {
    /// Load an atlas descriptor, loading the texture it names.
    fn add_frames_from_file(&self, descriptor: &str) -> ResourceResult<()>;

    /// Load an atlas descriptor and bind its frames to an already-registered texture.
    fn add_frames_with_texture(&self, descriptor: &str, texture: TextureId) -> ResourceResult<()>;

    /// Look up a sprite frame by name.
    fn sprite_frame(&self, name: &str) -> Option<SpriteFrameId>;
}

/// Named animation registry.
pub trait AnimationCache {
    /// Returns true if an animation is registered under `name`.
    fn contains(&self, name: &str) -> bool;

    /// Register an animation under `name`.
    fn register(&self, name: &str, animation: Animation);
}

/// Localized string tables.
pub trait Localization {
    /// Load an Android-style strings file for `language`.
    ///
    /// With `merge` the new strings are added to the current table,
    /// otherwise they replace it.
    fn add_strings(&self, language: &str, path: &str, merge: bool) -> ResourceResult<()>;
}

/// Audio preloading.
pub trait AudioEngine {
    /// Preload a sound effect.
    fn preload_effect(&self, name: &str) -> ResourceResult<()>;

    /// Preload a background music track.
    fn preload_music(&self, name: &str) -> ResourceResult<()>;
}

/// Raw byte access to resource files.
pub trait FileSource {
    /// Read a whole file as binary.
    fn read_all(&self, path: &str) -> ResourceResult<Vec<u8>>;
}

/// The services a task may call, borrowed for the duration of one tick.
#[derive(Clone, Copy)]
pub struct LoadContext<'a> {
    pub textures: &'a dyn TextureCache,
    pub sprite_frames: &'a dyn SpriteFrameCache,
    pub animations: &'a dyn AnimationCache,
    pub localization: &'a dyn Localization,
    pub audio: &'a dyn AudioEngine,
    pub files: &'a dyn FileSource,
}

impl<'a> LoadContext<'a> {
    /// Create a context from individual services.
    pub fn new(
        textures: &'a dyn TextureCache,
        sprite_frames: &'a dyn SpriteFrameCache,
        animations: &'a dyn AnimationCache,
        localization: &'a dyn Localization,
        audio: &'a dyn AudioEngine,
        files: &'a dyn FileSource,
    ) -> Self {
        Self {
            textures,
            sprite_frames,
            animations,
            localization,
            audio,
            files,
        }
    }

    /// Create a context from one value implementing every service.
    pub fn from_services<S>(services: &'a S) -> Self
    where
        S: TextureCache
            + SpriteFrameCache
            + AnimationCache
            + Localization
            + AudioEngine
            + FileSource,
    {
        Self::new(services, services, services, services, services, services)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_animation_duration() {
        let animation = Animation {
            frames: vec![
                AnimationFrame {
                    sprite_frame: SpriteFrameId(1),
                    delay: Duration::from_millis(100),
                },
                AnimationFrame {
                    sprite_frame: SpriteFrameId(2),
                    delay: Duration::from_millis(250),
                },
            ],
            restore_original_frame: false,
        };

        assert_eq!(animation.len(), 2);
        assert_eq!(animation.duration(), Duration::from_millis(350));
        assert!(Animation::default().is_empty());
    }
}
