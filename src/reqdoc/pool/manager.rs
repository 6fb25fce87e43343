//! Worker pool manager
//!
//! Owns one lane per operation kind and the executor they share. This is the
//! public face of the pool; see the [module docs](crate::reqdoc::pool) for the
//! failure model.

use crate::reqdoc::ast::{Document, DocumentKind};
use crate::reqdoc::pool::lane::Lane;
use crate::reqdoc::pool::{DocumentExecutor, Executor, Job, JobOutput, OperationKind, TaskHandle};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Tuning knobs for a [`WorkerPool`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    /// Maximum number of waiting tasks per operation kind. `None` is unbounded.
    pub max_queue_depth: Option<usize>,
    /// How long an awaited handle waits before resolving with `TimedOut`
    pub task_timeout: Option<Duration>,
    /// Worker threads are named `<prefix>-<operation>`
    pub thread_name_prefix: String,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_queue_depth: None,
            task_timeout: None,
            thread_name_prefix: "reqdoc".to_string(),
        }
    }
}

/// Counters across all lanes
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PoolStats {
    /// Lanes that currently own a worker thread
    pub active_workers: usize,
    /// Waiting (not yet started) tasks per operation kind
    pub queued: BTreeMap<OperationKind, usize>,
    /// Tasks being executed right now
    pub in_flight: usize,
    /// Tasks that ran to completion, successfully or not
    pub completed: u64,
}

/// Result of [`WorkerPool::cleanup`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CleanupReport {
    /// Workers that were retired
    pub workers_stopped: usize,
    /// Handles resolved with `Cancelled`
    pub tasks_cancelled: usize,
    /// Retired workers that were mid-task and left to finish on their own
    pub workers_detached: usize,
}

pub struct WorkerPool {
    lanes: Vec<Arc<Lane>>,
    config: PoolConfig,
    executor: Arc<dyn Executor>,
}

impl WorkerPool {
    pub fn new() -> Self {
        Self::with_config(PoolConfig::default())
    }

    pub fn with_config(config: PoolConfig) -> Self {
        Self::with_executor(config, DocumentExecutor)
    }

    /// A pool that runs jobs through a custom executor
    pub fn with_executor(config: PoolConfig, executor: impl Executor) -> Self {
        let lanes = OperationKind::ALL
            .iter()
            .map(|operation| Arc::new(Lane::new(*operation)))
            .collect();
        Self {
            lanes,
            config,
            executor: Arc::new(executor),
        }
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    fn lane(&self, operation: OperationKind) -> &Arc<Lane> {
        &self.lanes[operation.index()]
    }

    fn enqueue<T>(&self, job: Job) -> TaskHandle<T> {
        let operation = job.operation();
        match self.lane(operation).enqueue(job, &self.config, &self.executor) {
            Ok(receiver) => TaskHandle::pending(operation, receiver, self.config.task_timeout),
            Err(err) => TaskHandle::failed(operation, err),
        }
    }

    /// Submit any job; the handle resolves with the untyped output
    pub fn submit(&self, job: Job) -> TaskHandle<JobOutput> {
        self.enqueue(job)
    }

    pub fn parse(&self, kind: DocumentKind, text: impl Into<String>) -> TaskHandle<Document> {
        self.enqueue(Job::parse(kind, text))
    }

    pub fn stringify(&self, kind: DocumentKind, document: Document) -> TaskHandle<String> {
        self.enqueue(Job::stringify(kind, document))
    }

    pub fn parse_request(&self, text: impl Into<String>) -> TaskHandle<Document> {
        self.parse(DocumentKind::Request, text)
    }

    pub fn stringify_request(&self, document: Document) -> TaskHandle<String> {
        self.stringify(DocumentKind::Request, document)
    }

    pub fn parse_folder(&self, text: impl Into<String>) -> TaskHandle<Document> {
        self.parse(DocumentKind::Folder, text)
    }

    pub fn stringify_folder(&self, document: Document) -> TaskHandle<String> {
        self.stringify(DocumentKind::Folder, document)
    }

    pub fn parse_collection_root(&self, text: impl Into<String>) -> TaskHandle<Document> {
        self.parse(DocumentKind::CollectionRoot, text)
    }

    pub fn stringify_collection_root(&self, document: Document) -> TaskHandle<String> {
        self.stringify(DocumentKind::CollectionRoot, document)
    }

    pub fn parse_environment(&self, text: impl Into<String>) -> TaskHandle<Document> {
        self.parse(DocumentKind::Environment, text)
    }

    pub fn stringify_environment(&self, document: Document) -> TaskHandle<String> {
        self.stringify(DocumentKind::Environment, document)
    }

    pub fn stats(&self) -> PoolStats {
        let mut stats = PoolStats::default();
        for (operation, lane) in OperationKind::ALL.iter().zip(&self.lanes) {
            let snapshot = lane.snapshot();
            stats.active_workers += usize::from(snapshot.active);
            stats.in_flight += usize::from(snapshot.in_flight);
            stats.completed += snapshot.completed;
            stats.queued.insert(*operation, snapshot.queued);
        }
        stats
    }

    /// Retire every worker and cancel every outstanding task without waiting
    /// for any thread to exit.
    ///
    /// Safe to call repeatedly and with no active workers. Later submissions
    /// spawn fresh workers.
    pub fn shutdown(&self) -> CleanupReport {
        self.retire_all().0
    }

    /// Like [`WorkerPool::shutdown`], then wait for idle workers to exit.
    ///
    /// Workers that were in the middle of a task are not interrupted; they
    /// finish it, discard the result and exit on their own.
    pub async fn cleanup(&self) -> CleanupReport {
        let (report, idle) = self.retire_all();
        if !idle.is_empty() {
            let joined = tokio::task::spawn_blocking(move || {
                for thread in idle {
                    if thread.join().is_err() {
                        warn!("retired worker exited with a panic");
                    }
                }
            })
            .await;
            if let Err(err) = joined {
                warn!(error = %err, "failed to join retired workers");
            }
        }
        report
    }

    fn retire_all(&self) -> (CleanupReport, Vec<std::thread::JoinHandle<()>>) {
        let mut report = CleanupReport::default();
        let mut idle = Vec::new();

        for lane in &self.lanes {
            let retired = lane.shutdown();
            report.tasks_cancelled += retired.cancelled;
            if let Some(thread) = retired.thread {
                report.workers_stopped += 1;
                if retired.busy {
                    report.workers_detached += 1;
                } else {
                    idle.push(thread);
                }
            }
        }

        if report.workers_stopped > 0 || report.tasks_cancelled > 0 {
            debug!(
                workers = report.workers_stopped,
                cancelled = report.tasks_cancelled,
                detached = report.workers_detached,
                "pool cleaned up"
            );
        } else {
            trace!("pool cleanup with nothing to do");
        }
        (report, idle)
    }
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.retire_all();
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("config", &self.config)
            .field("stats", &self.stats())
            .finish()
    }
}
