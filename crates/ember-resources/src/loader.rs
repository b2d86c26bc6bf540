//! The frame-driven resource loader.
//!
//! A [`ResourceLoader`] collects tasks in execution order. [`ResourceLoader::run`]
//! turns it into a [`LoadHandle`], which the host ticks once per frame with
//! the elapsed time. Each tick runs at most one task, and a task's idle time
//! must elapse before the next one starts:
//!
//! ```text
//! tick(dt) -> start delay pending?  -> Delayed
//!          -> idle pending?         -> Idle
//!          -> queue exhausted?      -> Completed (listener notified once)
//!          -> otherwise             -> Executed (run task, arm its idle)
//! ```
//!
//! Tasks never span ticks. A task that blocks for 30ms blocks that frame for
//! 30ms; spread heavy work with larger idle times.

use std::fmt;
use std::ops::RangeInclusive;
use std::time::Duration;

use ember_core::profiling::profile_function;

use crate::config::LoaderConfig;
use crate::decrypt::DecryptFn;
use crate::error::ResourceResult;
use crate::event::{
    LoadProgress, LoadReport, LoaderEvent, LoaderEventBuffer, LoaderListener, TaskFailure,
};
use crate::pattern::expand_frame_names;
use crate::services::{LoadContext, TextureId};
use crate::task::{self, LoadTask, TimedAnimation, UniformAnimation};

/// Builds the queue of a loader run.
///
/// # Example
///
/// ```ignore
/// let mut loader = ResourceLoader::new().with_listener(|report: &LoadReport| {
///     tracing::info!("loaded {} resources", report.succeeded());
/// });
/// loader
///     .add_zwoptex_task("ui.plist", None)
///     .add_image_task("background.png", Some(Duration::from_millis(50)))
///     .add_cd_music_task("title.ogg", None);
/// let step = Duration::from_millis(80);
/// loader.add_zwoptex_anim_task("run", step, "run_%d.png", 1, 8, false, None)?;
///
/// let mut handle = loader.run();
/// // every frame:
/// handle.tick(clock.update(), &ctx);
/// ```
pub struct ResourceLoader {
    tasks: Vec<LoadTask>,
    delay: Duration,
    default_idle: Duration,
    listener: Option<Box<dyn LoaderListener>>,
}

impl ResourceLoader {
    /// Create an empty loader with the default configuration.
    pub fn new() -> Self {
        Self::with_config(LoaderConfig::default())
    }

    /// Create an empty loader from a configuration.
    pub fn with_config(config: LoaderConfig) -> Self {
        Self {
            tasks: Vec::new(),
            delay: config.start_delay,
            default_idle: config.default_idle,
            listener: None,
        }
    }

    /// Attach the listener notified during the run.
    pub fn with_listener(mut self, listener: impl LoaderListener + 'static) -> Self {
        self.set_listener(listener);
        self
    }

    pub fn set_listener(&mut self, listener: impl LoaderListener + 'static) {
        self.listener = Some(Box::new(listener));
    }

    /// Time to wait before the first task runs.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    /// Number of queued tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Append a task. Tasks run in the order they are added.
    pub fn add_load_task(&mut self, task: LoadTask) -> &mut Self {
        self.tasks.push(task);
        self
    }

    fn push(&mut self, task: LoadTask, idle: Option<Duration>) -> &mut Self {
        let idle = idle.unwrap_or(self.default_idle);
        self.add_load_task(task.with_idle(idle))
    }

    /// Add an Android strings task.
    ///
    /// `merge` adds the strings to the current table, otherwise they replace it.
    /// The task keeps the default task idle.
    pub fn add_android_string_task(
        &mut self,
        language: impl Into<String>,
        path: impl Into<String>,
        merge: bool,
    ) -> &mut Self {
        self.add_load_task(LoadTask::android_strings(language, path, merge))
    }

    /// Add a plain image task.
    pub fn add_image_task(&mut self, name: impl Into<String>, idle: Option<Duration>) -> &mut Self {
        self.push(LoadTask::image(name), idle)
    }

    /// Add an image task whose file is decrypted before decoding.
    pub fn add_encrypted_image_task(
        &mut self,
        name: impl Into<String>,
        decrypt: Option<DecryptFn>,
        idle: Option<Duration>,
    ) -> &mut Self {
        self.push(LoadTask::encrypted_image(name, decrypt), idle)
    }

    /// Add an atlas task.
    pub fn add_zwoptex_task(
        &mut self,
        name: impl Into<String>,
        idle: Option<Duration>,
    ) -> &mut Self {
        self.push(LoadTask::zwoptex(name), idle)
    }

    /// Add an atlas task whose texture is encrypted. The descriptor is not.
    pub fn add_encrypted_zwoptex_task(
        &mut self,
        plist: impl Into<String>,
        texture: impl Into<String>,
        decrypt: Option<DecryptFn>,
        idle: Option<Duration>,
    ) -> &mut Self {
        self.push(LoadTask::encrypted_zwoptex(plist, texture, decrypt), idle)
    }

    /// Add a sound effect preload task.
    pub fn add_cd_effect_task(
        &mut self,
        name: impl Into<String>,
        idle: Option<Duration>,
    ) -> &mut Self {
        self.push(LoadTask::audio_effect(name), idle)
    }

    /// Add a music preload task.
    pub fn add_cd_music_task(
        &mut self,
        name: impl Into<String>,
        idle: Option<Duration>,
    ) -> &mut Self {
        self.push(LoadTask::audio_music(name), idle)
    }

    /// Add an animation built from `pattern` over `start..=end`, one delay per step.
    #[allow(clippy::too_many_arguments)]
    pub fn add_zwoptex_anim_task(
        &mut self,
        name: impl Into<String>,
        unit_delay: Duration,
        pattern: &str,
        start: i32,
        end: i32,
        restore_original_frame: bool,
        idle: Option<Duration>,
    ) -> ResourceResult<&mut Self> {
        self.add_uniform_animation(
            name.into(),
            unit_delay,
            pattern,
            &[start..=end],
            restore_original_frame,
            idle,
        )
    }

    /// Add a two-stage animation: frames for `start..=end` followed by frames
    /// for `start2..=end2`.
    #[allow(clippy::too_many_arguments)]
    pub fn add_zwoptex_anim_task_two_stage(
        &mut self,
        name: impl Into<String>,
        unit_delay: Duration,
        pattern: &str,
        start: i32,
        end: i32,
        start2: i32,
        end2: i32,
        restore_original_frame: bool,
        idle: Option<Duration>,
    ) -> ResourceResult<&mut Self> {
        self.add_uniform_animation(
            name.into(),
            unit_delay,
            pattern,
            &[start..=end, start2..=end2],
            restore_original_frame,
            idle,
        )
    }

    /// Add an animation built from `pattern` over `start..=end` where every
    /// frame has its own delay.
    ///
    /// Fails if `delays` does not hold one entry per generated frame.
    #[allow(clippy::too_many_arguments)]
    pub fn add_zwoptex_anim_task_with_delays(
        &mut self,
        name: impl Into<String>,
        pattern: &str,
        start: i32,
        end: i32,
        delays: Vec<Duration>,
        restore_original_frame: bool,
        idle: Option<Duration>,
    ) -> ResourceResult<&mut Self> {
        let frames = expand_frame_names(pattern, &[start..=end])?;
        let animation = TimedAnimation::new(name, frames, delays, restore_original_frame)?;
        Ok(self.push(LoadTask::timed_animation(animation), idle))
    }

    fn add_uniform_animation(
        &mut self,
        name: String,
        unit_delay: Duration,
        pattern: &str,
        ranges: &[RangeInclusive<i32>],
        restore_original_frame: bool,
        idle: Option<Duration>,
    ) -> ResourceResult<&mut Self> {
        let frames = expand_frame_names(pattern, ranges)?;
        let animation = UniformAnimation {
            name,
            frames,
            unit_delay,
            restore_original_frame,
        };
        Ok(self.push(LoadTask::animation(animation), idle))
    }

    /// Start the run. The queue is fixed from here on.
    pub fn run(self) -> LoadHandle {
        tracing::debug!(
            "starting resource loader: {} tasks, delay {:?}",
            self.tasks.len(),
            self.delay
        );
        LoadHandle {
            tasks: self.tasks,
            cursor: 0,
            remaining_idle: Duration::ZERO,
            start_delay: self.delay,
            failed: 0,
            listener: self.listener,
            events: LoaderEventBuffer::new(),
            state: if self.delay > Duration::ZERO {
                LoaderState::Delaying
            } else {
                LoaderState::Ready
            },
        }
    }

    /// Load one encrypted image immediately, outside any queue.
    pub fn load_image(
        name: &str,
        decrypt: Option<DecryptFn>,
        ctx: &LoadContext<'_>,
    ) -> ResourceResult<TextureId> {
        task::load_encrypted_image(ctx, name, decrypt)
    }

    /// Load one atlas with an encrypted texture immediately, outside any queue.
    ///
    /// The descriptor `plist` must not be encrypted.
    pub fn load_zwoptex(
        plist: &str,
        texture: &str,
        decrypt: Option<DecryptFn>,
        ctx: &LoadContext<'_>,
    ) -> ResourceResult<TextureId> {
        task::load_encrypted_zwoptex(ctx, plist, texture, decrypt)
    }
}

impl fmt::Debug for ResourceLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceLoader")
            .field("tasks", &self.tasks)
            .field("delay", &self.delay)
            .field("default_idle", &self.default_idle)
            .field("has_listener", &self.listener.is_some())
            .finish()
    }
}

impl Default for ResourceLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Where a running loader stands between ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderState {
    /// Waiting out the start delay.
    Delaying,
    /// Waiting out the idle time of the last task.
    Idling,
    /// The next tick will run a task or complete.
    Ready,
    /// Finished or aborted. Ticks have no effect.
    Done,
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickResult {
    /// The start delay is still pending.
    Delayed,
    /// The idle time of the previous task is still pending.
    Idle,
    /// The task at `index` ran.
    Executed {
        /// Position of the task in the queue.
        index: usize,
        /// Whether the task reported success.
        succeeded: bool,
    },
    /// The queue was exhausted on this tick and the listener was notified.
    Completed,
    /// The loader was already done.
    Inactive,
}

impl TickResult {
    /// Returns true once the loader no longer needs ticks.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TickResult::Completed | TickResult::Inactive)
    }
}

/// A running loader, owned by the caller and ticked once per frame.
pub struct LoadHandle {
    tasks: Vec<LoadTask>,
    cursor: usize,
    remaining_idle: Duration,
    start_delay: Duration,
    failed: usize,
    listener: Option<Box<dyn LoaderListener>>,
    events: LoaderEventBuffer,
    state: LoaderState,
}

impl fmt::Debug for LoadHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadHandle")
            .field("state", &self.state)
            .field("cursor", &self.cursor)
            .field("total", &self.tasks.len())
            .field("remaining_idle", &self.remaining_idle)
            .field("start_delay", &self.start_delay)
            .field("failed", &self.failed)
            .finish_non_exhaustive()
    }
}

impl LoadHandle {
    /// Advance the loader by `delta`, running at most one task.
    pub fn tick(&mut self, delta: Duration, ctx: &LoadContext<'_>) -> TickResult {
        profile_function!();

        if self.state == LoaderState::Done {
            return TickResult::Inactive;
        }

        if self.start_delay > Duration::ZERO {
            self.start_delay = self.start_delay.saturating_sub(delta);
            if self.start_delay > Duration::ZERO {
                tracing::trace!("start delay remaining: {:?}", self.start_delay);
                return TickResult::Delayed;
            }
            self.state = LoaderState::Ready;
        }

        if self.remaining_idle > Duration::ZERO {
            self.remaining_idle = self.remaining_idle.saturating_sub(delta);
            if self.remaining_idle > Duration::ZERO {
                tracing::trace!("idle remaining: {:?}", self.remaining_idle);
                return TickResult::Idle;
            }
            self.state = LoaderState::Ready;
        }

        if self.cursor >= self.tasks.len() {
            self.complete();
            return TickResult::Completed;
        }

        let index = self.cursor;
        let succeeded = self.execute(index, ctx);
        self.remaining_idle = self.tasks[index].idle();
        self.cursor += 1;
        self.state = if self.remaining_idle > Duration::ZERO {
            LoaderState::Idling
        } else {
            LoaderState::Ready
        };

        let progress = self.progress();
        self.events.push(LoaderEvent::TaskExecuted { index, progress });
        if let Some(listener) = self.listener.as_mut() {
            listener.on_progress(progress);
        }

        TickResult::Executed { index, succeeded }
    }

    fn execute(&mut self, index: usize, ctx: &LoadContext<'_>) -> bool {
        let task = &self.tasks[index];
        let kind = task.kind();

        match task.execute(ctx) {
            Ok(()) => {
                tracing::debug!(
                    "loaded {} '{}' ({}/{})",
                    kind.kind_name(),
                    kind.label(),
                    index + 1,
                    self.tasks.len()
                );
                true
            }
            Err(err) => {
                tracing::warn!(
                    "failed to load {} '{}': {}",
                    kind.kind_name(),
                    kind.label(),
                    err
                );
                let failure = TaskFailure {
                    index,
                    kind: kind.kind_name(),
                    resource: kind.label().to_string(),
                    error: err.to_string(),
                };
                self.failed += 1;
                if let Some(listener) = self.listener.as_mut() {
                    listener.on_task_failed(&failure);
                }
                self.events.push(LoaderEvent::TaskFailed(failure));
                false
            }
        }
    }

    fn complete(&mut self) {
        self.state = LoaderState::Done;
        let report = self.report();
        tracing::info!(
            "resource loading finished: {} loaded, {} failed",
            report.succeeded(),
            report.failed
        );
        self.events.push(LoaderEvent::Completed(report));
        if let Some(listener) = self.listener.as_mut() {
            listener.on_done(&report);
        }
    }

    /// Stop the run. Remaining tasks are never executed and the completion
    /// listener is not called.
    pub fn abort(&mut self) {
        if self.state == LoaderState::Done {
            return;
        }
        let progress = self.progress();
        tracing::info!(
            "resource loading aborted after {}/{} tasks",
            progress.completed,
            progress.total
        );
        self.remaining_idle = Duration::ZERO;
        self.start_delay = Duration::ZERO;
        self.state = LoaderState::Done;
        self.events.push(LoaderEvent::Aborted { progress });
    }

    pub fn state(&self) -> LoaderState {
        self.state
    }

    /// Returns true once the run has completed or been aborted.
    pub fn is_done(&self) -> bool {
        self.state == LoaderState::Done
    }

    /// Index of the next task to run. Stays put after an abort.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of queued tasks.
    pub fn total(&self) -> usize {
        self.tasks.len()
    }

    pub fn remaining_idle(&self) -> Duration {
        self.remaining_idle
    }

    pub fn start_delay(&self) -> Duration {
        self.start_delay
    }

    pub fn progress(&self) -> LoadProgress {
        LoadProgress {
            completed: self.cursor,
            total: self.tasks.len(),
        }
    }

    /// Summary of the tasks attempted so far. Tasks skipped by an abort
    /// are not counted.
    pub fn report(&self) -> LoadReport {
        LoadReport {
            total: self.cursor,
            failed: self.failed,
        }
    }

    /// Labels of the queued tasks in execution order.
    pub fn task_labels(&self) -> impl Iterator<Item = &str> {
        self.tasks.iter().map(|t| t.kind().label())
    }

    /// Drain the events emitted since the last drain.
    pub fn drain_events(&mut self) -> impl Iterator<Item = LoaderEvent> + '_ {
        self.events.drain()
    }

    /// Get an iterator over events without draining.
    pub fn iter_events(&self) -> impl Iterator<Item = &LoaderEvent> {
        self.events.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_skips_listener() {
        let mut loader = ResourceLoader::new().with_listener(|_: &LoadReport| {});
        loader.add_image_task("a.png", None);

        let text = format!("{:?}", loader);
        assert!(text.contains("ResourceLoader"));
        assert!(text.contains("has_listener: true"));
        assert!(text.contains("a.png"));

        let text = format!("{:?}", loader.run());
        assert!(text.contains("LoadHandle"));
        assert!(text.contains("total: 1"));
    }

    #[test]
    fn test_add_errors_are_debuggable() {
        let mut loader = ResourceLoader::new();
        let err = loader
            .add_zwoptex_anim_task("run", Duration::ZERO, "run.png", 1, 2, false, None)
            .unwrap_err();
        assert!(matches!(err, crate::ResourceError::InvalidPattern { .. }));
    }
}
