//! Load tasks: one unit of loading work each.
//!
//! A [`LoadTask`] pairs a [`TaskKind`] with the idle time the loader waits
//! after running it. Every kind performs a single call against one service
//! from the [`LoadContext`]; only the animation kinds check for earlier work
//! and skip registration when the name is already taken.

use std::fmt;
use std::time::Duration;

use crate::decrypt::{DecryptFn, with_decrypted_file};
use crate::error::{ResourceError, ResourceResult};
use crate::services::{Animation, AnimationFrame, LoadContext, TextureId};
use ember_core::profiling::profile_scope;

/// Idle time of a task built with [`LoadTask::new`].
pub const DEFAULT_TASK_IDLE: Duration = Duration::from_millis(100);

/// Extension point for resource types without a built-in kind.
pub trait CustomTask {
    /// Short description used in logs and failure reports.
    fn label(&self) -> &str;

    /// Perform the load.
    fn execute(&self, ctx: &LoadContext<'_>) -> ResourceResult<()>;
}

impl fmt::Debug for dyn CustomTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CustomTask").field(&self.label()).finish()
    }
}

/// Animation built from sprite frames that all share one delay.
#[derive(Debug, Clone, PartialEq)]
pub struct UniformAnimation {
    /// Name to register the animation under.
    pub name: String,
    /// Sprite frame names in playback order.
    pub frames: Vec<String>,
    /// Delay of every step.
    pub unit_delay: Duration,
    /// Restore the sprite's original frame when playback ends.
    pub restore_original_frame: bool,
}

/// A sprite frame name paired with its own delay.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedFrame {
    /// Sprite frame name.
    pub name: String,
    /// How long this frame is shown.
    pub delay: Duration,
}

/// Animation where each sprite frame carries its own delay.
///
/// Built from parallel name and delay sequences whose lengths must match.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedAnimation {
    name: String,
    frames: Vec<TimedFrame>,
    restore_original_frame: bool,
}

impl TimedAnimation {
    /// Pair `frames` with `delays`.
    ///
    /// Fails with [`ResourceError::FrameDelayMismatch`] if the lengths differ.
    pub fn new(
        name: impl Into<String>,
        frames: Vec<String>,
        delays: Vec<Duration>,
        restore_original_frame: bool,
    ) -> ResourceResult<Self> {
        let name = name.into();
        if frames.len() != delays.len() {
            return Err(ResourceError::FrameDelayMismatch {
                animation: name,
                frames: frames.len(),
                delays: delays.len(),
            });
        }

        let frames = frames
            .into_iter()
            .zip(delays)
            .map(|(name, delay)| TimedFrame { name, delay })
            .collect();

        Ok(Self {
            name,
            frames,
            restore_original_frame,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn frames(&self) -> &[TimedFrame] {
        &self.frames
    }

    pub fn restore_original_frame(&self) -> bool {
        self.restore_original_frame
    }
}

/// The closed set of things a task can load.
#[derive(Debug)]
pub enum TaskKind {
    /// Android-style strings XML for one language.
    AndroidStrings {
        /// ISO 639-1 language code.
        language: String,
        /// Path of the XML file.
        path: String,
        /// Merge into the current table instead of replacing it.
        merge: bool,
    },

    /// Plain image loaded by the texture cache.
    Image { name: String },

    /// Image whose file bytes go through a decrypt hook first.
    EncryptedImage {
        name: String,
        decrypt: Option<DecryptFn>,
    },

    /// Atlas descriptor loaded together with the texture it names.
    Zwoptex { name: String },

    /// Plaintext atlas descriptor bound to an encrypted texture.
    EncryptedZwoptex {
        /// Descriptor (plist) name.
        plist: String,
        /// Encrypted texture name.
        texture: String,
        decrypt: Option<DecryptFn>,
    },

    /// Animation with one delay for every frame.
    ZwoptexAnimation(UniformAnimation),

    /// Animation with a delay per frame.
    ZwoptexAnimationWithDelays(TimedAnimation),

    /// Sound effect preload.
    AudioEffect { name: String },

    /// Music preload.
    AudioMusic { name: String },

    /// Caller-defined load.
    Custom(Box<dyn CustomTask>),
}

impl TaskKind {
    /// Short static name of the kind, for logs.
    pub fn kind_name(&self) -> &'static str {
        match self {
            TaskKind::AndroidStrings { .. } => "android-strings",
            TaskKind::Image { .. } => "image",
            TaskKind::EncryptedImage { .. } => "encrypted-image",
            TaskKind::Zwoptex { .. } => "zwoptex",
            TaskKind::EncryptedZwoptex { .. } => "encrypted-zwoptex",
            TaskKind::ZwoptexAnimation(_) => "zwoptex-animation",
            TaskKind::ZwoptexAnimationWithDelays(_) => "zwoptex-animation-delays",
            TaskKind::AudioEffect { .. } => "audio-effect",
            TaskKind::AudioMusic { .. } => "audio-music",
            TaskKind::Custom(_) => "custom",
        }
    }

    /// The resource this kind loads.
    pub fn label(&self) -> &str {
        match self {
            TaskKind::AndroidStrings { path, .. } => path.as_str(),
            TaskKind::Image { name }
            | TaskKind::EncryptedImage { name, .. }
            | TaskKind::Zwoptex { name }
            | TaskKind::AudioEffect { name }
            | TaskKind::AudioMusic { name } => name.as_str(),
            TaskKind::EncryptedZwoptex { plist, .. } => plist.as_str(),
            TaskKind::ZwoptexAnimation(anim) => anim.name.as_str(),
            TaskKind::ZwoptexAnimationWithDelays(anim) => anim.name(),
            TaskKind::Custom(task) => task.label(),
        }
    }
}

/// A queued unit of loading work.
#[derive(Debug)]
pub struct LoadTask {
    kind: TaskKind,
    idle: Duration,
}

impl LoadTask {
    /// Create a task with [`DEFAULT_TASK_IDLE`].
    pub fn new(kind: TaskKind) -> Self {
        Self {
            kind,
            idle: DEFAULT_TASK_IDLE,
        }
    }

    /// Set the idle time after this task.
    pub fn with_idle(mut self, idle: Duration) -> Self {
        self.idle = idle;
        self
    }

    pub fn image(name: impl Into<String>) -> Self {
        Self::new(TaskKind::Image { name: name.into() })
    }

    pub fn encrypted_image(name: impl Into<String>, decrypt: Option<DecryptFn>) -> Self {
        Self::new(TaskKind::EncryptedImage {
            name: name.into(),
            decrypt,
        })
    }

    pub fn zwoptex(name: impl Into<String>) -> Self {
        Self::new(TaskKind::Zwoptex { name: name.into() })
    }

    pub fn encrypted_zwoptex(
        plist: impl Into<String>,
        texture: impl Into<String>,
        decrypt: Option<DecryptFn>,
    ) -> Self {
        Self::new(TaskKind::EncryptedZwoptex {
            plist: plist.into(),
            texture: texture.into(),
            decrypt,
        })
    }

    pub fn android_strings(
        language: impl Into<String>,
        path: impl Into<String>,
        merge: bool,
    ) -> Self {
        Self::new(TaskKind::AndroidStrings {
            language: language.into(),
            path: path.into(),
            merge,
        })
    }

    pub fn audio_effect(name: impl Into<String>) -> Self {
        Self::new(TaskKind::AudioEffect { name: name.into() })
    }

    pub fn audio_music(name: impl Into<String>) -> Self {
        Self::new(TaskKind::AudioMusic { name: name.into() })
    }

    pub fn animation(animation: UniformAnimation) -> Self {
        Self::new(TaskKind::ZwoptexAnimation(animation))
    }

    pub fn timed_animation(animation: TimedAnimation) -> Self {
        Self::new(TaskKind::ZwoptexAnimationWithDelays(animation))
    }

    pub fn custom(task: impl CustomTask + 'static) -> Self {
        Self::new(TaskKind::Custom(Box::new(task)))
    }

    pub fn kind(&self) -> &TaskKind {
        &self.kind
    }

    /// Idle time the loader waits after this task.
    pub fn idle(&self) -> Duration {
        self.idle
    }

    /// Perform the load against the services in `ctx`.
    pub fn execute(&self, ctx: &LoadContext<'_>) -> ResourceResult<()> {
        profile_scope!("LoadTask::execute", self.kind.kind_name());

        match &self.kind {
            TaskKind::AndroidStrings {
                language,
                path,
                merge,
            } => ctx.localization.add_strings(language, path, *merge),
            TaskKind::Image { name } => ctx.textures.add_image(name).map(drop),
            TaskKind::EncryptedImage { name, decrypt } => {
                load_encrypted_image(ctx, name, *decrypt).map(drop)
            }
            TaskKind::Zwoptex { name } => ctx.sprite_frames.add_frames_from_file(name),
            TaskKind::EncryptedZwoptex {
                plist,
                texture,
                decrypt,
            } => load_encrypted_zwoptex(ctx, plist, texture, *decrypt).map(drop),
            TaskKind::ZwoptexAnimation(anim) => register_animation(
                ctx,
                &anim.name,
                anim.frames.iter().map(|f| (f.as_str(), anim.unit_delay)),
                anim.restore_original_frame,
            ),
            TaskKind::ZwoptexAnimationWithDelays(anim) => register_animation(
                ctx,
                anim.name(),
                anim.frames().iter().map(|f| (f.name.as_str(), f.delay)),
                anim.restore_original_frame(),
            ),
            TaskKind::AudioEffect { name } => ctx.audio.preload_effect(name),
            TaskKind::AudioMusic { name } => ctx.audio.preload_music(name),
            TaskKind::Custom(task) => task.execute(ctx),
        }
    }
}

/// Read, decrypt and register an image under its own name.
pub(crate) fn load_encrypted_image(
    ctx: &LoadContext<'_>,
    name: &str,
    decrypt: Option<DecryptFn>,
) -> ResourceResult<TextureId> {
    with_decrypted_file(ctx.files, name, decrypt, |plain| {
        ctx.textures.add_image_data(name, plain)
    })
}

/// Register an encrypted texture, then load the plaintext descriptor bound to it.
pub(crate) fn load_encrypted_zwoptex(
    ctx: &LoadContext<'_>,
    plist: &str,
    texture: &str,
    decrypt: Option<DecryptFn>,
) -> ResourceResult<TextureId> {
    let texture_id = load_encrypted_image(ctx, texture, decrypt)?;
    ctx.sprite_frames.add_frames_with_texture(plist, texture_id)?;
    Ok(texture_id)
}

fn register_animation<'f>(
    ctx: &LoadContext<'_>,
    name: &str,
    frames: impl Iterator<Item = (&'f str, Duration)>,
    restore_original_frame: bool,
) -> ResourceResult<()> {
    if ctx.animations.contains(name) {
        tracing::trace!("animation '{}' already registered, skipping", name);
        return Ok(());
    }

    let frames = frames
        .map(|(frame, delay)| -> ResourceResult<AnimationFrame> {
            let sprite_frame = ctx.sprite_frames.sprite_frame(frame).ok_or_else(|| {
                ResourceError::MissingSpriteFrame {
                    animation: name.to_string(),
                    frame: frame.to_string(),
                }
            })?;
            Ok(AnimationFrame {
                sprite_frame,
                delay,
            })
        })
        .collect::<ResourceResult<Vec<_>>>()?;

    ctx.animations.register(
        name,
        Animation {
            frames,
            restore_original_frame,
        },
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_task_uses_default_idle() {
        let task = LoadTask::image("a.png");
        assert_eq!(task.idle(), DEFAULT_TASK_IDLE);

        let task = task.with_idle(Duration::ZERO);
        assert_eq!(task.idle(), Duration::ZERO);
    }

    #[test]
    fn test_timed_animation_rejects_mismatch() {
        let err = TimedAnimation::new(
            "jump",
            vec!["j1".into(), "j2".into(), "j3".into()],
            vec![Duration::from_millis(50); 2],
            false,
        )
        .unwrap_err();

        assert!(matches!(
            err,
            ResourceError::FrameDelayMismatch {
                frames: 3,
                delays: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_timed_animation_pairs_frames() {
        let anim = TimedAnimation::new(
            "jump",
            vec!["j1".into(), "j2".into()],
            vec![Duration::from_millis(50), Duration::from_millis(80)],
            true,
        )
        .unwrap();

        assert_eq!(anim.frames()[1].name, "j2");
        assert_eq!(anim.frames()[1].delay, Duration::from_millis(80));
        assert!(anim.restore_original_frame());
    }

    #[test]
    fn test_labels() {
        assert_eq!(LoadTask::audio_music("bgm.ogg").kind().label(), "bgm.ogg");
        assert_eq!(
            LoadTask::encrypted_zwoptex("ui.plist", "ui.png", None)
                .kind()
                .label(),
            "ui.plist"
        );
        assert_eq!(
            LoadTask::android_strings("fr", "strings/fr.xml", true)
                .kind()
                .kind_name(),
            "android-strings"
        );
    }
}
