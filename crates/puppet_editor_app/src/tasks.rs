// SPDX-License-Identifier: MIT OR Apache-2.0
//! One-shot background tasks.
//!
//! File decoding and encoding run on a tokio runtime owned by the editor.
//! Each task delivers exactly one result through a oneshot channel, and the
//! UI polls the [`PendingTask`] once per frame. Dropping a pending task is
//! the only way to cancel it; the result is then discarded.

use thiserror::Error;
use tokio::runtime::Runtime;
use tokio::sync::oneshot;

/// Errors starting the task runtime
#[derive(Debug, Error)]
pub enum TaskError {
    /// Runtime could not be built
    #[error("Failed to start background runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

/// State of a pending task after a poll
#[derive(Debug)]
pub enum TaskPoll<T> {
    /// Still running
    Pending,
    /// Finished with a result; the task is consumed
    Ready(T),
    /// The task died without sending a result
    Lost,
}

/// Handle to a task that will produce one `T`
#[derive(Debug)]
pub struct PendingTask<T> {
    label: String,
    receiver: Option<oneshot::Receiver<T>>,
}

impl<T> PendingTask<T> {
    /// Short description for logs
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Check for the result without blocking.
    ///
    /// After `Ready` or `Lost` every further poll returns `Lost`.
    pub fn poll(&mut self) -> TaskPoll<T> {
        let Some(receiver) = self.receiver.as_mut() else {
            return TaskPoll::Lost;
        };
        match receiver.try_recv() {
            Ok(value) => {
                self.receiver = None;
                TaskPoll::Ready(value)
            }
            Err(oneshot::error::TryRecvError::Empty) => TaskPoll::Pending,
            Err(oneshot::error::TryRecvError::Closed) => {
                self.receiver = None;
                tracing::error!("Background task '{}' ended without a result", self.label);
                TaskPoll::Lost
            }
        }
    }
}

/// Runtime for background work
pub struct TaskRunner {
    runtime: Runtime,
}

impl TaskRunner {
    /// Start the runtime
    pub fn new() -> Result<Self, TaskError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("puppet-editor-io")
            .build()?;
        Ok(Self { runtime })
    }

    /// Run blocking work such as image decoding
    pub fn spawn_blocking<T, F>(&self, label: impl Into<String>, work: F) -> PendingTask<T>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        let label = label.into();
        let (sender, receiver) = oneshot::channel();
        tracing::debug!("Starting background task '{label}'");
        self.runtime.spawn_blocking(move || {
            // The receiver may have been dropped; that is a cancellation.
            let _ = sender.send(work());
        });
        PendingTask {
            label,
            receiver: Some(receiver),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn wait<T>(task: &mut PendingTask<T>) -> TaskPoll<T> {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            match task.poll() {
                TaskPoll::Pending if Instant::now() < deadline => {
                    std::thread::sleep(Duration::from_millis(5));
                }
                other => return other,
            }
        }
    }

    #[test]
    fn test_blocking_task_delivers_once() {
        let runner = TaskRunner::new().unwrap();
        let mut task = runner.spawn_blocking("sum", || 2 + 3);
        assert_eq!(task.label(), "sum");

        assert!(matches!(wait(&mut task), TaskPoll::Ready(5)));
        assert!(task.receiver.is_none());
        assert!(matches!(task.poll(), TaskPoll::Lost));
    }

    #[test]
    fn test_owned_result() {
        let runner = TaskRunner::new().unwrap();
        let mut task = runner.spawn_blocking("greeting", || String::from("done"));
        match wait(&mut task) {
            TaskPoll::Ready(value) => assert_eq!(value, "done"),
            other => panic!("unexpected poll result: {other:?}"),
        }
    }

    #[test]
    fn test_panicking_task_is_lost() {
        let runner = TaskRunner::new().unwrap();
        let mut task = runner.spawn_blocking("panics", || -> u32 { panic!("decode failed") });
        assert!(matches!(wait(&mut task), TaskPoll::Lost));
    }

    #[test]
    fn test_dropping_task_cancels_quietly() {
        let runner = TaskRunner::new().unwrap();
        let task = runner.spawn_blocking("ignored", || 1);
        drop(task);
    }
}
