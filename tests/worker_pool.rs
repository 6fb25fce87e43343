//! Worker pool behavior: ordering, failure isolation, cleanup and bounds

use reqdoc::reqdoc::ast::{Document, DocumentKind, Pair};
use reqdoc::reqdoc::error::{JobError, TaskError};
use reqdoc::reqdoc::pool::{Job, JobOutput, OperationKind, PoolConfig, WorkerPool};
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

/// Blocks executor threads until opened
#[derive(Default)]
struct Gate {
    open: Mutex<bool>,
    opened: Condvar,
}

impl Gate {
    fn wait(&self) {
        let mut open = self.open.lock().unwrap();
        while !*open {
            open = self.opened.wait(open).unwrap();
        }
    }

    fn open(&self) {
        *self.open.lock().unwrap() = true;
        self.opened.notify_all();
    }
}

/// A pool whose executor understands a few magic inputs:
/// `blocked` waits for the gate, `boom` waits for the gate and then panics,
/// anything else succeeds immediately. Every executed input is logged.
fn scripted_pool(config: PoolConfig) -> (WorkerPool, Arc<Gate>, Arc<Mutex<Vec<String>>>) {
    let gate = Arc::new(Gate::default());
    let log = Arc::new(Mutex::new(Vec::new()));
    let executor = {
        let gate = Arc::clone(&gate);
        let log = Arc::clone(&log);
        move |job: Job| -> Result<JobOutput, JobError> {
            let (kind, text) = match job {
                Job::Parse { kind, text } => (kind, text),
                Job::Stringify { kind, .. } => (kind, String::new()),
            };
            match text.as_str() {
                "blocked" => gate.wait(),
                "boom" => {
                    gate.wait();
                    panic!("executor blew up");
                }
                _ => {}
            }
            log.lock().unwrap().push(text);
            Ok(JobOutput::Document(Document::new(kind)))
        }
    };
    (WorkerPool::with_executor(config, executor), gate, log)
}

async fn wait_until(mut condition: impl FnMut() -> bool) {
    for _ in 0..500 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not reached in time");
}

#[tokio::test]
async fn tasks_of_one_kind_resolve_in_fifo_order() {
    let (pool, gate, log) = scripted_pool(PoolConfig::default());

    let mut first = pool.parse_request("blocked");
    let mut second = pool.parse_request("second");
    let third = pool.parse_request("third");

    wait_until(|| pool.stats().in_flight == 1).await;
    assert!(!first.is_resolved());
    assert!(!second.is_resolved());
    assert_eq!(pool.stats().queued[&OperationKind::ParseRequest], 2);

    gate.open();
    third.await.unwrap();
    assert!(first.is_resolved());
    assert!(second.is_resolved());
    assert_eq!(*log.lock().unwrap(), vec!["blocked", "second", "third"]);
}

#[tokio::test]
async fn kinds_run_independently() {
    let (pool, gate, _log) = scripted_pool(PoolConfig::default());

    let mut slow = pool.parse_request("blocked");
    let folder = pool.parse_folder("meta\n/meta\n").await.unwrap();
    assert_eq!(folder.kind, DocumentKind::Folder);
    assert!(!slow.is_resolved());
    assert_eq!(pool.stats().active_workers, 2);

    gate.open();
    slow.await.unwrap();
}

#[tokio::test]
async fn crash_fails_in_flight_and_queued_tasks_of_that_kind_only() {
    let (pool, gate, _log) = scripted_pool(PoolConfig::default());

    let crashing = pool.parse_request("boom");
    let queued = pool.parse_request("queued");
    wait_until(|| pool.stats().in_flight == 1).await;
    gate.open();

    let crashed = TaskError::WorkerCrashed {
        kind: OperationKind::ParseRequest,
    };
    assert_eq!(crashing.await, Err(crashed.clone()));
    assert_eq!(queued.await, Err(crashed));
    wait_until(|| pool.stats().active_workers == 0).await;

    // Other kinds are unaffected, and the crashed kind gets a fresh worker
    assert!(pool.parse_environment("vars\n/vars").await.is_ok());
    assert!(pool.parse_request("again").await.is_ok());
    assert_eq!(pool.stats().active_workers, 2);
}

#[tokio::test]
async fn cleanup_cancels_outstanding_tasks_and_allows_reuse() {
    let (pool, gate, log) = scripted_pool(PoolConfig::default());

    let running = pool.parse_request("blocked");
    let waiting = pool.parse_request("never-runs");
    wait_until(|| pool.stats().in_flight == 1).await;

    let report = pool.cleanup().await;
    assert_eq!(report.workers_stopped, 1);
    assert_eq!(report.tasks_cancelled, 2);
    assert_eq!(report.workers_detached, 1);
    assert_eq!(running.await, Err(TaskError::Cancelled));
    assert_eq!(waiting.await, Err(TaskError::Cancelled));

    gate.open();
    assert!(pool.parse_request("after-cleanup").await.is_ok());
    assert!(!log.lock().unwrap().contains(&"never-runs".to_string()));

    let again = pool.cleanup().await;
    assert_eq!(again.tasks_cancelled, 0);
}

#[tokio::test]
async fn queue_depth_bound_rejects_overflow() {
    let config = PoolConfig {
        max_queue_depth: Some(1),
        ..PoolConfig::default()
    };
    let (pool, gate, _log) = scripted_pool(config);

    let running = pool.parse_request("blocked");
    wait_until(|| pool.stats().in_flight == 1).await;
    let accepted = pool.parse_request("accepted");
    let mut rejected = pool.parse_request("rejected");

    assert!(rejected.is_resolved());
    assert_eq!(
        rejected.await,
        Err(TaskError::QueueFull {
            kind: OperationKind::ParseRequest,
            depth: 1
        })
    );

    gate.open();
    assert!(running.await.is_ok());
    assert!(accepted.await.is_ok());
}

#[tokio::test]
async fn timeout_resolves_slow_tasks() {
    let config = PoolConfig {
        task_timeout: Some(Duration::from_millis(100)),
        ..PoolConfig::default()
    };
    let (pool, gate, _log) = scripted_pool(config);

    let result = pool.parse_request("blocked").await;
    assert_eq!(
        result,
        Err(TaskError::TimedOut {
            kind: OperationKind::ParseRequest,
            after: Duration::from_millis(100)
        })
    );

    gate.open();
    assert!(pool.parse_request("quick").await.is_ok());
}

#[tokio::test]
async fn workers_are_named_after_their_operation() {
    let config = PoolConfig {
        thread_name_prefix: "editor".to_string(),
        ..PoolConfig::default()
    };
    let pool = WorkerPool::with_executor(config, |_job: Job| -> Result<JobOutput, JobError> {
        let name = std::thread::current().name().unwrap_or_default().to_string();
        Ok(JobOutput::Text(name))
    });

    let output = pool
        .submit(Job::stringify(
            DocumentKind::Folder,
            Document::new(DocumentKind::Folder),
        ))
        .await
        .unwrap();
    assert_eq!(output, JobOutput::Text("editor-stringify-folder".to_string()));
}

#[tokio::test]
async fn default_executor_reports_transform_errors() {
    let pool = WorkerPool::new();

    let invalid = Document::builder(DocumentKind::Request)
        .multimap("headers", vec![Pair::new("bad:key", "1")])
        .build();
    assert!(matches!(
        pool.stringify_request(invalid).await,
        Err(TaskError::Transform(_))
    ));

    let valid = Document::builder(DocumentKind::Request)
        .multimap("headers", vec![Pair::new("accept", "*/*")])
        .build();
    assert_eq!(
        pool.stringify_request(valid).await.unwrap(),
        "headers\naccept: */*\n/headers\n"
    );

    let err = pool.parse_collection_root("docs\nunfinished").await.unwrap_err();
    match err {
        TaskError::Syntax(syntax) => {
            assert_eq!(syntax.block, "docs");
            assert_eq!(syntax.line, 1);
        }
        other => panic!("expected a syntax error, got {other:?}"),
    }
}

#[tokio::test]
async fn default_executor_stringifies_parser_output() {
    let pool = WorkerPool::new();
    let source = "headers\n////x: 1\na\rb: 1\n/headers\n\n//note\nhello\n///note\n";

    let doc = pool.parse_request(source).await.unwrap();
    assert_eq!(doc.pairs("headers").map(|pairs| pairs[0].key.as_str()), Some("//x"));
    assert_eq!(doc.raw("//note"), Some("hello"));

    let text = pool.stringify_request(doc).await.unwrap();
    assert_eq!(text, source);
}
