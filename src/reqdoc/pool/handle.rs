//! Task handles
//!
//! A [`TaskHandle`] is the caller's side of one enqueued task. It is a future,
//! and it can also be checked without blocking through
//! [`TaskHandle::is_resolved`]. Without a task timeout it can be awaited from
//! any async runtime; a timeout is a Tokio timer and needs a Tokio runtime.

use crate::reqdoc::ast::Document;
use crate::reqdoc::error::{TaskError, TransformError};
use crate::reqdoc::pool::{JobOutput, OperationKind};
use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::sync::oneshot::{self, error::TryRecvError};
use tokio::time::{Instant, Sleep};

pub(crate) type TaskResult = Result<JobOutput, TaskError>;

/// Conversion from the untyped job output to what a handle resolves with
pub trait FromJobOutput: Sized {
    fn from_output(output: JobOutput, operation: OperationKind) -> Result<Self, TaskError>;
}

impl FromJobOutput for JobOutput {
    fn from_output(output: JobOutput, _operation: OperationKind) -> Result<Self, TaskError> {
        Ok(output)
    }
}

impl FromJobOutput for Document {
    fn from_output(output: JobOutput, operation: OperationKind) -> Result<Self, TaskError> {
        match output {
            JobOutput::Document(doc) => Ok(doc),
            JobOutput::Text(_) => Err(unexpected_output(operation, "text")),
        }
    }
}

impl FromJobOutput for String {
    fn from_output(output: JobOutput, operation: OperationKind) -> Result<Self, TaskError> {
        match output {
            JobOutput::Text(text) => Ok(text),
            JobOutput::Document(_) => Err(unexpected_output(operation, "a document")),
        }
    }
}

fn unexpected_output(operation: OperationKind, found: &str) -> TaskError {
    TaskError::Transform(TransformError::new(format!(
        "executor returned {found} for `{operation}`"
    )))
}

enum HandleState {
    Pending(oneshot::Receiver<TaskResult>),
    Ready(Option<TaskResult>),
}

/// Pending result of a task submitted to the [`WorkerPool`](crate::reqdoc::pool::WorkerPool)
///
/// With a task timeout configured, the deadline counts from enqueue time and
/// is enforced while the handle is awaited.
///
/// # Panics
///
/// Polling a handle that has a timeout panics outside a Tokio runtime with the
/// time driver enabled. Handles without a timeout have no such requirement.
pub struct TaskHandle<T> {
    operation: OperationKind,
    state: HandleState,
    timeout: Option<Duration>,
    enqueued_at: Instant,
    deadline: Option<Pin<Box<Sleep>>>,
    _output: PhantomData<fn() -> T>,
}

impl<T> TaskHandle<T> {
    pub(crate) fn pending(
        operation: OperationKind,
        receiver: oneshot::Receiver<TaskResult>,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            operation,
            state: HandleState::Pending(receiver),
            timeout,
            enqueued_at: Instant::now(),
            deadline: None,
            _output: PhantomData,
        }
    }

    /// A handle that is already resolved with an error
    pub(crate) fn failed(operation: OperationKind, error: TaskError) -> Self {
        Self {
            operation,
            state: HandleState::Ready(Some(Err(error))),
            timeout: None,
            enqueued_at: Instant::now(),
            deadline: None,
            _output: PhantomData,
        }
    }

    pub fn operation(&self) -> OperationKind {
        self.operation
    }

    /// True once the task has a result, without waiting for it.
    ///
    /// The result is kept in the handle and returned when it is awaited.
    pub fn is_resolved(&mut self) -> bool {
        let outcome = match &mut self.state {
            HandleState::Ready(_) => return true,
            HandleState::Pending(receiver) => match receiver.try_recv() {
                Ok(result) => result,
                Err(TryRecvError::Empty) => return false,
                Err(TryRecvError::Closed) => Err(TaskError::WorkerCrashed {
                    kind: self.operation,
                }),
            },
        };
        self.state = HandleState::Ready(Some(outcome));
        true
    }

    fn poll_deadline(&mut self, cx: &mut Context<'_>) -> Poll<TaskError> {
        let Some(timeout) = self.timeout else {
            return Poll::Pending;
        };
        let deadline = self.enqueued_at + timeout;
        let sleep = self
            .deadline
            .get_or_insert_with(|| Box::pin(tokio::time::sleep_until(deadline)));
        match sleep.as_mut().poll(cx) {
            Poll::Ready(()) => Poll::Ready(TaskError::TimedOut {
                kind: self.operation,
                after: timeout,
            }),
            Poll::Pending => Poll::Pending,
        }
    }
}

impl<T: FromJobOutput> Future for TaskHandle<T> {
    type Output = Result<T, TaskError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();

        let received = match &mut this.state {
            HandleState::Ready(slot) => match slot.take() {
                Some(result) => Some(result),
                None => panic!("TaskHandle polled after completion"),
            },
            HandleState::Pending(receiver) => match Pin::new(receiver).poll(cx) {
                Poll::Ready(Ok(result)) => Some(result),
                Poll::Ready(Err(_)) => Some(Err(TaskError::WorkerCrashed {
                    kind: this.operation,
                })),
                Poll::Pending => None,
            },
        };

        let result = match received {
            Some(result) => result,
            None => match this.poll_deadline(cx) {
                Poll::Ready(err) => Err(err),
                Poll::Pending => return Poll::Pending,
            },
        };

        this.state = HandleState::Ready(None);
        Poll::Ready(result.and_then(|output| T::from_output(output, this.operation)))
    }
}

impl<T> std::fmt::Debug for TaskHandle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match &self.state {
            HandleState::Pending(_) => "pending",
            HandleState::Ready(Some(_)) => "resolved",
            HandleState::Ready(None) => "consumed",
        };
        f.debug_struct("TaskHandle")
            .field("operation", &self.operation)
            .field("state", &state)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reqdoc::ast::DocumentKind;

    #[tokio::test]
    async fn test_resolves_with_sent_value() {
        let (tx, rx) = oneshot::channel();
        let mut handle: TaskHandle<String> =
            TaskHandle::pending(OperationKind::StringifyRequest, rx, None);
        assert!(!handle.is_resolved());
        tx.send(Ok(JobOutput::Text("meta\n/meta\n".into()))).unwrap();
        assert!(handle.is_resolved());
        assert_eq!(handle.await.unwrap(), "meta\n/meta\n");
    }

    #[tokio::test]
    async fn test_dropped_sender_means_crash() {
        let (tx, rx) = oneshot::channel::<TaskResult>();
        let handle: TaskHandle<Document> =
            TaskHandle::pending(OperationKind::ParseFolder, rx, None);
        drop(tx);
        assert_eq!(
            handle.await,
            Err(TaskError::WorkerCrashed {
                kind: OperationKind::ParseFolder
            })
        );
    }

    #[tokio::test]
    async fn test_wrong_output_type_is_a_transform_error() {
        let (tx, rx) = oneshot::channel();
        let handle: TaskHandle<String> =
            TaskHandle::pending(OperationKind::StringifyRequest, rx, None);
        tx.send(Ok(JobOutput::Document(Document::new(DocumentKind::Request))))
            .unwrap();
        assert!(matches!(handle.await, Err(TaskError::Transform(_))));
    }

    #[tokio::test]
    async fn test_times_out_when_configured() {
        let (_tx, rx) = oneshot::channel::<TaskResult>();
        let handle: TaskHandle<Document> = TaskHandle::pending(
            OperationKind::ParseRequest,
            rx,
            Some(Duration::from_millis(50)),
        );
        assert_eq!(
            handle.await,
            Err(TaskError::TimedOut {
                kind: OperationKind::ParseRequest,
                after: Duration::from_millis(50)
            })
        );
    }

    #[tokio::test]
    async fn test_failed_handle() {
        let mut handle: TaskHandle<Document> =
            TaskHandle::failed(OperationKind::ParseRequest, TaskError::Cancelled);
        assert!(handle.is_resolved());
        assert_eq!(handle.await, Err(TaskError::Cancelled));
    }
}
