//! In-memory engine services that record the calls tasks make.

use ember_core::alloc::HashMap;
use ember_resources::{
    Animation, AnimationCache, AudioEngine, FileSource, Localization, ResourceError,
    ResourceResult, SpriteFrameCache, SpriteFrameId, TextureCache, TextureId,
};
use parking_lot::Mutex;

/// Leading bytes the fake texture cache accepts as a decodable image.
///
/// Everything after the magic is kept as the decoded texture data.
pub const IMAGE_MAGIC: &[u8] = b"IMG";

/// Records a service call for verification in tests.
///
/// Lookups (`sprite_frame`, `contains`) are not recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceCall {
    ReadFile(String),
    AddImage(String),
    AddImageData {
        name: String,
        len: usize,
    },
    AddFramesFromFile(String),
    AddFramesWithTexture {
        descriptor: String,
        texture: TextureId,
    },
    RegisterAnimation(String),
    AddStrings {
        language: String,
        path: String,
        merge: bool,
    },
    PreloadEffect(String),
    PreloadMusic(String),
}

/// An atlas descriptor known to the fake sprite-frame cache.
#[derive(Debug, Clone)]
struct AtlasDef {
    texture: String,
    frames: Vec<String>,
}

#[derive(Debug, Clone)]
struct FakeTexture {
    id: TextureId,
    data: Vec<u8>,
}

#[derive(Debug, Default)]
struct FakeState {
    files: HashMap<String, Vec<u8>>,
    atlases: HashMap<String, AtlasDef>,
    textures: HashMap<String, FakeTexture>,
    sprite_frames: HashMap<String, SpriteFrameId>,
    animations: HashMap<String, Animation>,
    strings: Vec<(String, String, bool)>,
    effects: Vec<String>,
    music: Vec<String>,
    calls: Vec<ServiceCall>,
    next_id: u64,
}

impl FakeState {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn file(&self, path: &str) -> ResourceResult<Vec<u8>> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| ResourceError::NotFound {
                path: path.to_string(),
            })
    }

    fn decode_texture(&mut self, name: &str, data: &[u8]) -> ResourceResult<TextureId> {
        let decoded = data
            .strip_prefix(IMAGE_MAGIC)
            .ok_or_else(|| ResourceError::DecodeFailed {
                name: name.to_string(),
                message: "unrecognized image header".to_string(),
            })?;

        if let Some(existing) = self.textures.get(name) {
            return Ok(existing.id);
        }
        let id = TextureId(self.next_id());
        self.textures.insert(
            name.to_string(),
            FakeTexture {
                id,
                data: decoded.to_vec(),
            },
        );
        Ok(id)
    }

    fn add_frames(&mut self, descriptor: &str) -> ResourceResult<AtlasDef> {
        let atlas = self
            .atlases
            .get(descriptor)
            .cloned()
            .ok_or_else(|| ResourceError::NotFound {
                path: descriptor.to_string(),
            })?;
        for frame in &atlas.frames {
            if !self.sprite_frames.contains_key(frame) {
                let id = SpriteFrameId(self.next_id());
                self.sprite_frames.insert(frame.clone(), id);
            }
        }
        Ok(atlas)
    }
}

/// Fake implementation of every resource service.
///
/// Files, atlases and sprite frames are seeded with the `with_*` builders.
/// Images decode when their bytes start with [`IMAGE_MAGIC`].
#[derive(Debug, Default)]
pub struct FakeServices {
    state: Mutex<FakeState>,
}

impl FakeServices {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file readable through every service.
    pub fn with_file(self, path: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.state.lock().files.insert(path.into(), bytes);
        self
    }

    /// Declare an atlas descriptor whose texture is `texture` and which
    /// provides `frames` once loaded.
    pub fn with_atlas(
        self,
        descriptor: impl Into<String>,
        texture: impl Into<String>,
        frames: &[&str],
    ) -> Self {
        self.state.lock().atlases.insert(
            descriptor.into(),
            AtlasDef {
                texture: texture.into(),
                frames: frames.iter().map(|f| f.to_string()).collect(),
            },
        );
        self
    }

    /// Make sprite frames available without loading an atlas.
    pub fn with_sprite_frames(self, frames: &[&str]) -> Self {
        {
            let mut state = self.state.lock();
            for frame in frames {
                let id = SpriteFrameId(state.next_id());
                state.sprite_frames.insert(frame.to_string(), id);
            }
        }
        self
    }

    /// Pre-register an animation.
    pub fn with_animation(self, name: impl Into<String>, animation: Animation) -> Self {
        self.state.lock().animations.insert(name.into(), animation);
        self
    }

    /// All recorded calls in order.
    pub fn calls(&self) -> Vec<ServiceCall> {
        self.state.lock().calls.clone()
    }

    /// Count recorded calls matching a predicate.
    pub fn count_calls(&self, predicate: impl Fn(&ServiceCall) -> bool) -> usize {
        self.state.lock().calls.iter().filter(|c| predicate(c)).count()
    }

    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    pub fn texture(&self, name: &str) -> Option<TextureId> {
        self.state.lock().textures.get(name).map(|t| t.id)
    }

    /// Decoded data of a registered texture.
    pub fn texture_data(&self, name: &str) -> Option<Vec<u8>> {
        self.state.lock().textures.get(name).map(|t| t.data.clone())
    }

    pub fn texture_count(&self) -> usize {
        self.state.lock().textures.len()
    }

    pub fn has_sprite_frame(&self, name: &str) -> bool {
        self.state.lock().sprite_frames.contains_key(name)
    }

    pub fn sprite_frame_id(&self, name: &str) -> Option<SpriteFrameId> {
        self.state.lock().sprite_frames.get(name).copied()
    }

    pub fn animation(&self, name: &str) -> Option<Animation> {
        self.state.lock().animations.get(name).cloned()
    }

    /// `(language, path, merge)` for every string table loaded.
    pub fn loaded_strings(&self) -> Vec<(String, String, bool)> {
        self.state.lock().strings.clone()
    }

    pub fn preloaded_effects(&self) -> Vec<String> {
        self.state.lock().effects.clone()
    }

    pub fn preloaded_music(&self) -> Vec<String> {
        self.state.lock().music.clone()
    }
}

impl FileSource for FakeServices {
    fn read_all(&self, path: &str) -> ResourceResult<Vec<u8>> {
        let mut state = self.state.lock();
        state.calls.push(ServiceCall::ReadFile(path.to_string()));
        state.file(path)
    }
}

impl TextureCache for FakeServices {
    fn add_image(&self, name: &str) -> ResourceResult<TextureId> {
        let mut state = self.state.lock();
        state.calls.push(ServiceCall::AddImage(name.to_string()));
        let bytes = state.file(name)?;
        state.decode_texture(name, &bytes)
    }

    fn add_image_data(&self, name: &str, data: &[u8]) -> ResourceResult<TextureId> {
        let mut state = self.state.lock();
        state.calls.push(ServiceCall::AddImageData {
            name: name.to_string(),
            len: data.len(),
        });
        state.decode_texture(name, data)
    }
}

impl SpriteFrameCache for FakeServices {
    fn add_frames_from_file(&self, descriptor: &str) -> ResourceResult<()> {
        let mut state = self.state.lock();
        state
            .calls
            .push(ServiceCall::AddFramesFromFile(descriptor.to_string()));
        let atlas = state.add_frames(descriptor)?;

        // The descriptor names its own texture.
        let bytes = state.file(&atlas.texture)?;
        state.decode_texture(&atlas.texture, &bytes)?;
        Ok(())
    }

    fn add_frames_with_texture(&self, descriptor: &str, texture: TextureId) -> ResourceResult<()> {
        let mut state = self.state.lock();
        state.calls.push(ServiceCall::AddFramesWithTexture {
            descriptor: descriptor.to_string(),
            texture,
        });
        if !state.textures.values().any(|t| t.id == texture) {
            return Err(ResourceError::Service {
                service: "sprite frame cache",
                message: format!("unknown texture {:?}", texture),
            });
        }
        state.add_frames(descriptor)?;
        Ok(())
    }

    fn sprite_frame(&self, name: &str) -> Option<SpriteFrameId> {
        self.state.lock().sprite_frames.get(name).copied()
    }
}

impl AnimationCache for FakeServices {
    fn contains(&self, name: &str) -> bool {
        self.state.lock().animations.contains_key(name)
    }

    fn register(&self, name: &str, animation: Animation) {
        let mut state = self.state.lock();
        state
            .calls
            .push(ServiceCall::RegisterAnimation(name.to_string()));
        state.animations.insert(name.to_string(), animation);
    }
}

impl Localization for FakeServices {
    fn add_strings(&self, language: &str, path: &str, merge: bool) -> ResourceResult<()> {
        let mut state = self.state.lock();
        state.calls.push(ServiceCall::AddStrings {
            language: language.to_string(),
            path: path.to_string(),
            merge,
        });
        state.file(path)?;
        state
            .strings
            .push((language.to_string(), path.to_string(), merge));
        Ok(())
    }
}

impl AudioEngine for FakeServices {
    fn preload_effect(&self, name: &str) -> ResourceResult<()> {
        let mut state = self.state.lock();
        state.calls.push(ServiceCall::PreloadEffect(name.to_string()));
        state.file(name)?;
        state.effects.push(name.to_string());
        Ok(())
    }

    fn preload_music(&self, name: &str) -> ResourceResult<()> {
        let mut state = self.state.lock();
        state.calls.push(ServiceCall::PreloadMusic(name.to_string()));
        state.file(name)?;
        state.music.push(name.to_string());
        Ok(())
    }
}
