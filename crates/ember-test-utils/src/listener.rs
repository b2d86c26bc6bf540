//! A listener that records what the loader told it.

use std::sync::Arc;

use ember_resources::{LoadProgress, LoadReport, LoaderListener, TaskFailure};
use parking_lot::Mutex;

/// A recorded listener callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenerCall {
    Progress(LoadProgress),
    TaskFailed(TaskFailure),
    Done(LoadReport),
}

/// Cloneable listener; every clone shares the same record.
///
/// Hand one clone to the loader and keep another to inspect.
#[derive(Debug, Clone, Default)]
pub struct RecordingListener {
    calls: Arc<Mutex<Vec<ListenerCall>>>,
}

impl RecordingListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<ListenerCall> {
        self.calls.lock().clone()
    }

    /// Number of `on_done` calls received.
    pub fn done_count(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| matches!(c, ListenerCall::Done(_)))
            .count()
    }

    /// The last completion report, if any.
    pub fn report(&self) -> Option<LoadReport> {
        self.calls.lock().iter().rev().find_map(|c| match c {
            ListenerCall::Done(report) => Some(*report),
            _ => None,
        })
    }

    pub fn failures(&self) -> Vec<TaskFailure> {
        self.calls
            .lock()
            .iter()
            .filter_map(|c| match c {
                ListenerCall::TaskFailed(failure) => Some(failure.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn progress(&self) -> Vec<LoadProgress> {
        self.calls
            .lock()
            .iter()
            .filter_map(|c| match c {
                ListenerCall::Progress(progress) => Some(*progress),
                _ => None,
            })
            .collect()
    }
}

impl LoaderListener for RecordingListener {
    fn on_progress(&mut self, progress: LoadProgress) {
        self.calls.lock().push(ListenerCall::Progress(progress));
    }

    fn on_task_failed(&mut self, failure: &TaskFailure) {
        self.calls.lock().push(ListenerCall::TaskFailed(failure.clone()));
    }

    fn on_done(&mut self, report: &LoadReport) {
        self.calls.lock().push(ListenerCall::Done(*report));
    }
}
