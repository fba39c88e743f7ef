//! Stress tests for batched delivery and concurrent requests
//!
//! These tests verify:
//! - No entry is lost or duplicated when many threads log at once
//! - Rejected batches are eventually delivered once the collector recovers
//! - Concurrent requests each report their failure exactly once

use async_trait::async_trait;
use bridge_resilience::client::{
    OutboundRequest, RawResponse, Request, RequestClient, RequestError, RetryPolicy, Transport,
    TransportFailure, TransportFailureKind,
};
use bridge_resilience::core::{BatchSink, LogBatch, LogCategory, LogLevel, Logger, LoggerError};
use parking_lot::Mutex;
use serde_json::json;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Collects every delivered entry; rejects deliveries while `failing` is set
struct CollectingSink {
    received: Mutex<Vec<String>>,
    failing: AtomicBool,
    rejected: AtomicUsize,
}

impl CollectingSink {
    fn new(failing: bool) -> Arc<Self> {
        Arc::new(Self {
            received: Mutex::new(Vec::new()),
            failing: AtomicBool::new(failing),
            rejected: AtomicUsize::new(0),
        })
    }

    fn titles(&self) -> Vec<String> {
        self.received.lock().clone()
    }
}

#[async_trait]
impl BatchSink for CollectingSink {
    async fn deliver(&self, endpoint: &str, batch: &LogBatch) -> bridge_resilience::Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            self.rejected.fetch_add(1, Ordering::SeqCst);
            return Err(LoggerError::delivery(endpoint, "collector unavailable"));
        }
        self.received
            .lock()
            .extend(batch.logs.iter().map(|e| e.title.clone()));
        Ok(())
    }

    fn name(&self) -> &str {
        "collecting"
    }
}

fn stress_logger(sink: Arc<CollectingSink>, max_buffer_size: usize) -> Arc<Logger> {
    Arc::new(
        Logger::builder()
            .min_level(LogLevel::Info)
            .enable_console(false)
            .remote_endpoint("http://collector.test/logs")
            .max_buffer_size(max_buffer_size)
            .flush_interval(Duration::from_millis(20))
            .sink(sink as Arc<dyn BatchSink>)
            .build()
            .expect("Failed to build logger"),
    )
}

/// Test that concurrent logging delivers every entry exactly once
#[test]
fn test_concurrent_logging_loses_nothing() {
    const THREADS: usize = 8;
    const PER_THREAD: usize = 500;

    let sink = CollectingSink::new(false);
    let logger = stress_logger(Arc::clone(&sink), 16);

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                for i in 0..PER_THREAD {
                    logger.info(
                        LogCategory::Transaction,
                        format!("t{}-{}", t, i),
                        Some(json!({"thread": t, "seq": i})),
                    );
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Logging thread panicked");
    }

    assert!(logger.destroy(), "Final flush did not finish in time");

    let titles = sink.titles();
    let unique: HashSet<_> = titles
        .iter()
        .filter(|t| t.starts_with('t'))
        .cloned()
        .collect();
    assert_eq!(unique.len(), THREADS * PER_THREAD, "Entries were lost");
    assert_eq!(titles.len(), THREADS * PER_THREAD + 1, "Entries were duplicated");
    assert_eq!(logger.buffered_len(), 0);
}

/// Test that each thread's entries arrive in the order it logged them
#[test]
fn test_per_thread_order_is_preserved() {
    const THREADS: usize = 4;
    const PER_THREAD: usize = 250;

    let sink = CollectingSink::new(false);
    let logger = stress_logger(Arc::clone(&sink), 7);

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                for i in 0..PER_THREAD {
                    logger.info(LogCategory::Network, format!("t{}-{}", t, i), None);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("Logging thread panicked");
    }
    logger.destroy();

    let titles = sink.titles();
    for t in 0..THREADS {
        let prefix = format!("t{}-", t);
        let seqs: Vec<usize> = titles
            .iter()
            .filter_map(|title| title.strip_prefix(&prefix))
            .filter_map(|seq| seq.parse().ok())
            .collect();
        assert_eq!(seqs, (0..PER_THREAD).collect::<Vec<_>>());
    }
}

/// Test that entries rejected during an outage are delivered after recovery
#[test]
fn test_outage_recovery_delivers_backlog() {
    let sink = CollectingSink::new(true);
    let logger = stress_logger(Arc::clone(&sink), 10);

    for i in 0..200 {
        logger.warn(LogCategory::Bridge, format!("backlog-{}", i), None);
    }

    let start = Instant::now();
    while sink.rejected.load(Ordering::SeqCst) == 0 && start.elapsed() < Duration::from_secs(2) {
        thread::sleep(Duration::from_millis(10));
    }
    assert!(sink.rejected.load(Ordering::SeqCst) > 0);
    assert!(logger.metrics().delivery_failures() > 0);

    sink.failing.store(false, Ordering::SeqCst);

    let start = Instant::now();
    while start.elapsed() < Duration::from_secs(5) {
        let delivered = sink
            .titles()
            .iter()
            .filter(|t| t.starts_with("backlog-"))
            .count();
        if delivered == 200 {
            break;
        }
        thread::sleep(Duration::from_millis(20));
    }

    logger.destroy();

    let backlog: Vec<_> = sink
        .titles()
        .into_iter()
        .filter(|t| t.starts_with("backlog-"))
        .collect();
    let expected: Vec<_> = (0..200).map(|i| format!("backlog-{}", i)).collect();
    assert_eq!(backlog, expected);
}

/// Fails the first `failures` calls of each URL, then succeeds
struct FlakyTransport {
    failures: u32,
    seen: Mutex<std::collections::HashMap<String, u32>>,
    calls: AtomicU32,
}

#[async_trait]
impl Transport for FlakyTransport {
    async fn execute(&self, request: &OutboundRequest) -> Result<RawResponse, TransportFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let count = {
            let mut seen = self.seen.lock();
            let count = seen.entry(request.url.clone()).or_insert(0);
            *count += 1;
            *count
        };
        tokio::task::yield_now().await;
        if count <= self.failures {
            Err(TransportFailure::new(TransportFailureKind::Connect, "connection reset"))
        } else {
            Ok(RawResponse::json(200, &json!({"code": 0, "data": count})))
        }
    }
}

/// Test that concurrent requests retry independently
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_requests_retry_independently() {
    const REQUESTS: usize = 50;

    let transport = Arc::new(FlakyTransport {
        failures: 2,
        seen: Mutex::new(std::collections::HashMap::new()),
        calls: AtomicU32::new(0),
    });
    let handled = Arc::new(AtomicU32::new(0));
    let seen = Arc::clone(&handled);
    let client = RequestClient::builder()
        .base_url("https://api.test/v1")
        .retry_policy(RetryPolicy::new(3, Duration::from_millis(1)))
        .transport(Arc::clone(&transport) as Arc<dyn Transport>)
        .error_handler(move |_: &RequestError| {
            seen.fetch_add(1, Ordering::SeqCst);
        })
        .build()
        .expect("Failed to build client");

    let tasks: Vec<_> = (0..REQUESTS)
        .map(|i| {
            let client = client.clone();
            tokio::spawn(async move { client.send(Request::get(format!("/item/{}", i))).await })
        })
        .collect();

    for task in tasks {
        let response = task.await.expect("Request task panicked").expect("Request failed");
        assert_eq!(response.attempts, 3);
        assert_eq!(response.body["data"], 3);
    }

    assert_eq!(transport.calls.load(Ordering::SeqCst), (REQUESTS * 3) as u32);
    assert_eq!(handled.load(Ordering::SeqCst), 0);
}

/// Test that each exhausted request reaches the handler exactly once
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_failures_report_once_each() {
    const REQUESTS: usize = 40;

    let transport = Arc::new(FlakyTransport {
        failures: u32::MAX,
        seen: Mutex::new(std::collections::HashMap::new()),
        calls: AtomicU32::new(0),
    });
    let handled = Arc::new(AtomicU32::new(0));
    let seen = Arc::clone(&handled);
    let client = RequestClient::builder()
        .base_url("https://api.test/v1")
        .retry_policy(RetryPolicy::new(2, Duration::from_millis(1)))
        .transport(Arc::clone(&transport) as Arc<dyn Transport>)
        .error_handler(move |_: &RequestError| {
            seen.fetch_add(1, Ordering::SeqCst);
        })
        .build()
        .expect("Failed to build client");

    let tasks: Vec<_> = (0..REQUESTS)
        .map(|i| {
            let client = client.clone();
            tokio::spawn(async move { client.send(Request::get(format!("/item/{}", i))).await })
        })
        .collect();

    for task in tasks {
        let err = task.await.expect("Request task panicked").unwrap_err();
        assert!(matches!(err, RequestError::Transport { .. }));
    }

    assert_eq!(handled.load(Ordering::SeqCst), REQUESTS as u32);
    assert_eq!(transport.calls.load(Ordering::SeqCst), (REQUESTS * 3) as u32);
}
