//! Background worker pool
//!
//! Parsing and serializing are synchronous, but callers on an interactive
//! thread should not block on them. The pool moves that work onto dedicated
//! OS threads:
//!
//! - one lane per [`OperationKind`], each with its own FIFO queue and at most
//!   one worker thread, spawned on first use
//! - enqueueing never blocks and returns a [`TaskHandle`], a future that
//!   resolves with the result or a [`TaskError`]
//! - lanes are independent: no ordering holds across operation kinds
//!
//! ## Failure model
//!
//! - malformed input resolves the handle with `TaskError::Syntax` or
//!   `TaskError::Transform`; the worker keeps going
//! - a panic on a worker thread resolves that lane's in-flight and queued tasks
//!   with `TaskError::WorkerCrashed`; the next enqueue spawns a fresh worker
//! - [`WorkerPool::cleanup`] retires every worker and resolves every
//!   outstanding handle with `TaskError::Cancelled`
//!
//! Queue bounds and timeouts are off unless set in [`PoolConfig`].
//!
//! [`TaskError`]: crate::reqdoc::error::TaskError

pub mod executor;
pub mod handle;
mod lane;
pub mod manager;
pub mod operation;

pub use executor::{DocumentExecutor, Executor, Job, JobOutput};
pub use handle::{FromJobOutput, TaskHandle};
pub use manager::{CleanupReport, PoolConfig, PoolStats, WorkerPool};
pub use operation::OperationKind;
