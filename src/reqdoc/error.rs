//! Error types for parsing, serializing and background execution
//!
//! The taxonomy is layered:
//! - [`SyntaxError`]: the text is structurally malformed (unterminated block)
//! - [`TransformError`]: a well-formed transform failed anyway (e.g. a model
//!   that cannot be written back as valid text)
//! - [`JobError`]: what an executor may report for a single job
//! - [`TaskError`]: everything a caller of the worker pool can observe

use crate::reqdoc::pool::OperationKind;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Why a block was considered unterminated
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unterminated {
    /// Input ended before the end marker
    EndOfInput,
    /// Another block began, or a different block was closed, first
    InterruptedBy { marker: String, line: usize },
}

impl fmt::Display for Unterminated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unterminated::EndOfInput => write!(f, "reached end of input"),
            Unterminated::InterruptedBy { marker, line } => {
                write!(f, "interrupted by `{}` at line {}", marker, line)
            }
        }
    }
}

/// Structurally malformed input
///
/// Always carries the offending block name and the 1-based line of its
/// begin marker, so editors can point at it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unterminated block `{block}` starting at line {line}: {cause}")]
pub struct SyntaxError {
    pub block: String,
    pub line: usize,
    pub cause: Unterminated,
}

impl SyntaxError {
    pub fn end_of_input(block: impl Into<String>, line: usize) -> Self {
        Self {
            block: block.into(),
            line,
            cause: Unterminated::EndOfInput,
        }
    }

    pub fn interrupted(
        block: impl Into<String>,
        line: usize,
        marker: impl Into<String>,
        marker_line: usize,
    ) -> Self {
        Self {
            block: block.into(),
            line,
            cause: Unterminated::InterruptedBy {
                marker: marker.into(),
                line: marker_line,
            },
        }
    }
}

/// Failure of an otherwise well-formed transform
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("transform failed: {message}")]
pub struct TransformError {
    pub message: String,
}

impl TransformError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Failure reported by an executor for a single job
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JobError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error(transparent)]
    Transform(#[from] TransformError),
}

/// Outcome of a task submitted to the worker pool that did not produce a value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    #[error(transparent)]
    Syntax(SyntaxError),

    #[error(transparent)]
    Transform(TransformError),

    /// The worker thread for this operation kind terminated unexpectedly
    #[error("worker for `{kind}` crashed")]
    WorkerCrashed { kind: OperationKind },

    /// The task was still outstanding when the pool was cleaned up
    #[error("task cancelled by pool cleanup")]
    Cancelled,

    /// The queue for this operation kind was at its configured depth
    #[error("queue for `{kind}` is full ({depth} tasks waiting)")]
    QueueFull { kind: OperationKind, depth: usize },

    /// The configured task timeout elapsed before the task resolved
    #[error("task on `{kind}` timed out after {after:?}")]
    TimedOut { kind: OperationKind, after: Duration },
}

impl From<JobError> for TaskError {
    fn from(err: JobError) -> Self {
        match err {
            JobError::Syntax(e) => TaskError::Syntax(e),
            JobError::Transform(e) => TaskError::Transform(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error_display() {
        let err = SyntaxError::end_of_input("headers", 3);
        assert_eq!(
            err.to_string(),
            "unterminated block `headers` starting at line 3: reached end of input"
        );

        let err = SyntaxError::interrupted("params", 1, "headers", 4);
        assert_eq!(
            err.to_string(),
            "unterminated block `params` starting at line 1: interrupted by `headers` at line 4"
        );
    }

    #[test]
    fn test_job_error_converts_to_task_error() {
        let err: TaskError = JobError::from(TransformError::new("boom")).into();
        assert_eq!(err, TaskError::Transform(TransformError::new("boom")));
        assert_eq!(err.to_string(), "transform failed: boom");
    }

    #[test]
    fn test_task_error_display() {
        let err = TaskError::QueueFull {
            kind: OperationKind::ParseRequest,
            depth: 4,
        };
        assert_eq!(
            err.to_string(),
            "queue for `parse-request` is full (4 tasks waiting)"
        );
        assert_eq!(
            TaskError::WorkerCrashed {
                kind: OperationKind::StringifyEnvironment
            }
            .to_string(),
            "worker for `stringify-environment` crashed"
        );
    }
}
