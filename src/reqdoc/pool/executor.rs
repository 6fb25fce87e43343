//! Jobs and the executors that run them
//!
//! A [`Job`] is the owned input of one task. Everything it carries is plain
//! data so it can be moved onto a worker thread. [`Executor`] is the seam
//! between the pool and the actual transform; [`DocumentExecutor`] runs the
//! parser and serializer, and any `Fn(Job) -> Result<JobOutput, JobError>`
//! closure can stand in for it.

use crate::reqdoc::ast::{Document, DocumentKind};
use crate::reqdoc::error::{JobError, TransformError};
use crate::reqdoc::formats::try_serialize_document;
use crate::reqdoc::parsing::parse_document;
use crate::reqdoc::pool::OperationKind;

/// Input of one task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Job {
    Parse { kind: DocumentKind, text: String },
    Stringify { kind: DocumentKind, document: Document },
}

impl Job {
    pub fn parse(kind: DocumentKind, text: impl Into<String>) -> Self {
        Job::Parse {
            kind,
            text: text.into(),
        }
    }

    pub fn stringify(kind: DocumentKind, document: Document) -> Self {
        Job::Stringify { kind, document }
    }

    /// The lane this job runs on
    pub fn operation(&self) -> OperationKind {
        match self {
            Job::Parse { kind, .. } => OperationKind::parse(*kind),
            Job::Stringify { kind, .. } => OperationKind::stringify(*kind),
        }
    }
}

/// Output of one task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutput {
    Document(Document),
    Text(String),
}

pub trait Executor: Send + Sync + 'static {
    fn execute(&self, job: Job) -> Result<JobOutput, JobError>;
}

impl<F> Executor for F
where
    F: Fn(Job) -> Result<JobOutput, JobError> + Send + Sync + 'static,
{
    fn execute(&self, job: Job) -> Result<JobOutput, JobError> {
        self(job)
    }
}

/// Runs jobs through the parser and the validating serializer
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentExecutor;

impl Executor for DocumentExecutor {
    fn execute(&self, job: Job) -> Result<JobOutput, JobError> {
        match job {
            Job::Parse { kind, text } => Ok(JobOutput::Document(parse_document(&text, kind)?)),
            Job::Stringify { kind, document } => {
                if document.kind != kind {
                    return Err(TransformError::new(format!(
                        "cannot stringify a {} document as a {kind}",
                        document.kind
                    ))
                    .into());
                }
                Ok(JobOutput::Text(try_serialize_document(&document)?))
            }
        }
    }
}
