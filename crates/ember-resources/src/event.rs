//! Loader notifications: the listener trait and a pollable event buffer.

/// How far a loader has come.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadProgress {
    /// Tasks attempted so far.
    pub completed: usize,
    /// Tasks in the queue.
    pub total: usize,
}

impl LoadProgress {
    /// Completed fraction in `[0, 1]`. An empty queue counts as finished.
    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            self.completed as f32 / self.total as f32
        }
    }
}

/// A task that ran and failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFailure {
    /// Position of the task in the queue.
    pub index: usize,
    /// Kind of the task.
    pub kind: &'static str,
    /// The resource it was loading.
    pub resource: String,
    /// Error message.
    pub error: String,
}

/// Summary delivered once the whole queue was attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadReport {
    /// Number of tasks attempted.
    pub total: usize,
    /// Number of tasks that failed.
    pub failed: usize,
}

impl LoadReport {
    /// Number of tasks that succeeded.
    pub fn succeeded(&self) -> usize {
        self.total - self.failed
    }

    /// Returns true if no task failed.
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

/// Observer of a loader run.
///
/// Completion means every task was attempted, not that every task succeeded;
/// check [`LoadReport::failed`].
pub trait LoaderListener {
    /// Called after each task runs, successful or not.
    fn on_progress(&mut self, _progress: LoadProgress) {}

    /// Called when a task fails. The loader continues with the next task.
    fn on_task_failed(&mut self, _failure: &TaskFailure) {}

    /// Called exactly once, after the last task, when the run was not aborted.
    fn on_done(&mut self, report: &LoadReport);
}

impl<F> LoaderListener for F
where
    F: FnMut(&LoadReport),
{
    fn on_done(&mut self, report: &LoadReport) {
        self(report)
    }
}

/// Events emitted by a running loader.
#[derive(Debug, Clone, PartialEq)]
pub enum LoaderEvent {
    /// A task ran.
    TaskExecuted {
        /// Position of the task in the queue.
        index: usize,
        /// Progress after the task.
        progress: LoadProgress,
    },

    /// A task ran and failed.
    TaskFailed(TaskFailure),

    /// Every task was attempted.
    Completed(LoadReport),

    /// The run was aborted before the queue was exhausted.
    Aborted {
        /// Progress at the time of the abort.
        progress: LoadProgress,
    },
}

impl LoaderEvent {
    /// Check if this is a terminal event.
    pub fn is_terminal(&self) -> bool {
        matches!(self, LoaderEvent::Completed(_) | LoaderEvent::Aborted { .. })
    }

    /// Check if this is a failure event.
    pub fn is_failed(&self) -> bool {
        matches!(self, LoaderEvent::TaskFailed(_))
    }
}

/// A buffer of loader events that can be drained each frame.
#[derive(Debug, Default)]
pub struct LoaderEventBuffer {
    events: Vec<LoaderEvent>,
}

impl LoaderEventBuffer {
    /// Create a new empty event buffer.
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Push an event to the buffer.
    pub fn push(&mut self, event: LoaderEvent) {
        self.events.push(event);
    }

    /// Drain all events from the buffer.
    pub fn drain(&mut self) -> impl Iterator<Item = LoaderEvent> + '_ {
        self.events.drain(..)
    }

    /// Get an iterator over events without draining.
    pub fn iter(&self) -> impl Iterator<Item = &LoaderEvent> {
        self.events.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_fraction() {
        assert_eq!(LoadProgress { completed: 0, total: 0 }.fraction(), 1.0);
        assert_eq!(LoadProgress { completed: 1, total: 4 }.fraction(), 0.25);
    }

    #[test]
    fn test_report_counts() {
        let report = LoadReport { total: 5, failed: 2 };
        assert_eq!(report.succeeded(), 3);
        assert!(!report.all_succeeded());
        assert!(LoadReport::default().all_succeeded());
    }

    #[test]
    fn test_closure_listener() {
        let mut seen = Vec::new();
        {
            let mut listener = |report: &LoadReport| seen.push(report.total);
            listener.on_progress(LoadProgress { completed: 1, total: 2 });
            listener.on_done(&LoadReport { total: 2, failed: 0 });
        }
        assert_eq!(seen, vec![2]);
    }

    #[test]
    fn test_event_buffer_drain() {
        let mut buffer = LoaderEventBuffer::new();
        buffer.push(LoaderEvent::TaskExecuted {
            index: 0,
            progress: LoadProgress { completed: 1, total: 1 },
        });
        buffer.push(LoaderEvent::Completed(LoadReport { total: 1, failed: 0 }));

        assert_eq!(buffer.len(), 2);
        let events: Vec<_> = buffer.drain().collect();
        assert!(events[1].is_terminal());
        assert!(!events[0].is_failed());
        assert!(buffer.is_empty());
    }
}
