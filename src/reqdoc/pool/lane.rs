//! One queue and its worker
//!
//! All lane state sits behind a single mutex. The worker thread holds the lock
//! only to take the next task and to hand back a result; the job itself runs
//! unlocked.
//!
//! Workers are identified by a generation number. Cleanup and crashes clear the
//! lane's worker slot, and a worker that finds its generation is no longer the
//! current one exits at the next check. Task ids are unique per lane, so a
//! retired worker that finishes late cannot resolve a task it no longer owns.

use crate::reqdoc::error::TaskError;
use crate::reqdoc::pool::handle::TaskResult;
use crate::reqdoc::pool::{Executor, Job, OperationKind, PoolConfig};
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tokio::sync::oneshot;
use tracing::{debug, trace, warn};

type Reply = oneshot::Sender<TaskResult>;

struct Task {
    id: u64,
    job: Job,
    reply: Reply,
}

struct InFlight {
    id: u64,
    reply: Reply,
}

struct WorkerSlot {
    generation: u64,
    thread: JoinHandle<()>,
}

#[derive(Default)]
struct LaneState {
    queue: VecDeque<Task>,
    in_flight: Option<InFlight>,
    worker: Option<WorkerSlot>,
    next_generation: u64,
    next_task_id: u64,
    completed: u64,
}

impl LaneState {
    fn is_current(&self, generation: u64) -> bool {
        self.worker
            .as_ref()
            .is_some_and(|worker| worker.generation == generation)
    }

    /// Take the replies of every outstanding task, in-flight first
    fn drain_replies(&mut self) -> Vec<Reply> {
        self.in_flight
            .take()
            .map(|task| task.reply)
            .into_iter()
            .chain(self.queue.drain(..).map(|task| task.reply))
            .collect()
    }
}

/// Point-in-time view of a lane
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LaneSnapshot {
    pub active: bool,
    pub queued: usize,
    pub in_flight: bool,
    pub completed: u64,
}

/// What shutting a lane down left behind
pub(crate) struct Retired {
    pub thread: Option<JoinHandle<()>>,
    pub cancelled: usize,
    /// The worker was executing a task and may keep running until it finishes
    pub busy: bool,
}

pub(crate) struct Lane {
    operation: OperationKind,
    state: Mutex<LaneState>,
    wakeup: Condvar,
}

impl Lane {
    pub(crate) fn new(operation: OperationKind) -> Self {
        Self {
            operation,
            state: Mutex::new(LaneState::default()),
            wakeup: Condvar::new(),
        }
    }

    /// Queue a job, spawning the worker if the lane has none
    pub(crate) fn enqueue(
        self: &Arc<Self>,
        job: Job,
        config: &PoolConfig,
        executor: &Arc<dyn Executor>,
    ) -> Result<oneshot::Receiver<TaskResult>, TaskError> {
        let mut state = self.state.lock();

        if let Some(limit) = config.max_queue_depth {
            if state.queue.len() >= limit {
                warn!(
                    operation = %self.operation,
                    depth = state.queue.len(),
                    "rejecting task, queue is full"
                );
                return Err(TaskError::QueueFull {
                    kind: self.operation,
                    depth: state.queue.len(),
                });
            }
        }

        let (reply, receiver) = oneshot::channel();
        let id = state.next_task_id;
        state.next_task_id += 1;
        state.queue.push_back(Task { id, job, reply });

        if state.worker.is_none() {
            if let Err(err) = self.spawn_worker(&mut state, config, executor) {
                state.queue.pop_back();
                warn!(operation = %self.operation, error = %err, "failed to spawn worker");
                return Err(TaskError::WorkerCrashed {
                    kind: self.operation,
                });
            }
        }

        trace!(operation = %self.operation, task = id, queued = state.queue.len(), "enqueued task");
        self.wakeup.notify_one();
        Ok(receiver)
    }

    fn spawn_worker(
        self: &Arc<Self>,
        state: &mut LaneState,
        config: &PoolConfig,
        executor: &Arc<dyn Executor>,
    ) -> io::Result<()> {
        let generation = state.next_generation;
        state.next_generation += 1;

        let lane = Arc::clone(self);
        let executor = Arc::clone(executor);
        let thread = thread::Builder::new()
            .name(format!("{}-{}", config.thread_name_prefix, self.operation))
            .spawn(move || lane.run_worker(generation, executor))?;

        state.worker = Some(WorkerSlot { generation, thread });
        debug!(operation = %self.operation, generation, "spawned worker");
        Ok(())
    }

    fn run_worker(&self, generation: u64, executor: Arc<dyn Executor>) {
        let _guard = CrashGuard {
            lane: self,
            generation,
        };

        loop {
            let (id, job) = {
                let mut state = self.state.lock();
                let task = loop {
                    if !state.is_current(generation) {
                        debug!(operation = %self.operation, generation, "worker retired");
                        return;
                    }
                    match state.queue.pop_front() {
                        Some(task) if task.reply.is_closed() => {
                            trace!(operation = %self.operation, task = task.id, "skipping abandoned task");
                        }
                        Some(task) => break task,
                        None => self.wakeup.wait(&mut state),
                    }
                };
                state.in_flight = Some(InFlight {
                    id: task.id,
                    reply: task.reply,
                });
                (task.id, task.job)
            };

            trace!(operation = %self.operation, task = id, "running task");
            let result = executor.execute(job).map_err(TaskError::from);

            let mut state = self.state.lock();
            if state.in_flight.as_ref().is_some_and(|task| task.id == id) {
                if let Some(task) = state.in_flight.take() {
                    state.completed += 1;
                    let _ = task.reply.send(result);
                }
            }
        }
    }

    /// Retire the worker and cancel every outstanding task
    pub(crate) fn shutdown(&self) -> Retired {
        let (worker, busy, replies) = {
            let mut state = self.state.lock();
            let busy = state.in_flight.is_some();
            (state.worker.take(), busy, state.drain_replies())
        };
        self.wakeup.notify_all();

        let cancelled = replies.len();
        for reply in replies {
            let _ = reply.send(Err(TaskError::Cancelled));
        }

        if worker.is_some() || cancelled > 0 {
            debug!(operation = %self.operation, cancelled, busy, "lane shut down");
        }

        Retired {
            thread: worker.map(|worker| worker.thread),
            cancelled,
            busy,
        }
    }

    pub(crate) fn snapshot(&self) -> LaneSnapshot {
        let state = self.state.lock();
        LaneSnapshot {
            active: state.worker.is_some(),
            queued: state.queue.len(),
            in_flight: state.in_flight.is_some(),
            completed: state.completed,
        }
    }
}

/// Fails the lane's outstanding tasks if the worker thread unwinds
struct CrashGuard<'a> {
    lane: &'a Lane,
    generation: u64,
}

impl Drop for CrashGuard<'_> {
    fn drop(&mut self) {
        if !thread::panicking() {
            return;
        }

        let replies = {
            let mut state = self.lane.state.lock();
            if !state.is_current(self.generation) {
                return;
            }
            state.worker = None;
            state.drain_replies()
        };

        warn!(
            operation = %self.lane.operation,
            generation = self.generation,
            failed = replies.len(),
            "worker crashed"
        );
        for reply in replies {
            let _ = reply.send(Err(TaskError::WorkerCrashed {
                kind: self.lane.operation,
            }));
        }
    }
}
