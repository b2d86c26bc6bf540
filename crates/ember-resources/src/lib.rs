//! Frame-budgeted incremental resource loading.
//!
//! Queue images, atlases, animations, string tables and audio as
//! [`LoadTask`]s, then tick the resulting [`LoadHandle`] once per frame. Each
//! tick runs at most one task against the engine services in a
//! [`LoadContext`], honouring per-task idle times so heavy decodes can be
//! spaced out across frames.

pub mod config;
pub mod decrypt;
pub mod error;
pub mod event;
pub mod io;
pub mod loader;
pub mod pattern;
pub mod services;
pub mod task;

pub use config::LoaderConfig;
pub use decrypt::{DecryptFn, DecryptedBytes};
pub use error::{ResourceError, ResourceResult};
pub use event::{
    LoadProgress, LoadReport, LoaderEvent, LoaderEventBuffer, LoaderListener, TaskFailure,
};
pub use io::{FileReader, MemoryReader};
pub use loader::{LoadHandle, LoaderState, ResourceLoader, TickResult};
pub use pattern::{FramePattern, expand_frame_names};
pub use services::{
    Animation, AnimationCache, AnimationFrame, AudioEngine, FileSource, LoadContext,
    Localization, SpriteFrameCache, SpriteFrameId, TextureCache, TextureId,
};
pub use task::{
    CustomTask, DEFAULT_TASK_IDLE, LoadTask, TaskKind, TimedAnimation, TimedFrame,
    UniformAnimation,
};
