use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::Middleware;
use crate::handler::{Request, SharedHandler};

#[derive(Debug, Default)]
struct Counters {
    request_count: AtomicUsize,
    server_errors: AtomicUsize,
    total_latency_ns: AtomicU64,
}

/// Middleware for collecting request metrics
///
/// All counters use atomic operations for thread-safe updates without locks.
/// Clones share the same counters, so keep one clone to read from and
/// register another with the router.
///
/// Metrics collected:
/// - Total request count
/// - Server error count (status >= 500)
/// - Average latency of the wrapped handler chain
#[derive(Debug, Clone, Default)]
pub struct MetricsMiddleware {
    counters: Arc<Counters>,
}

impl MetricsMiddleware {
    /// Create a new metrics middleware with all counters initialized to zero
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the total number of requests processed
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.counters.request_count.load(Ordering::Relaxed)
    }

    /// Get the number of responses with a 5xx status
    #[must_use]
    pub fn server_errors(&self) -> usize {
        self.counters.server_errors.load(Ordering::Relaxed)
    }

    /// Calculate the average request latency
    ///
    /// Returns zero duration if no requests have been processed yet.
    #[must_use]
    pub fn average_latency(&self) -> Duration {
        let count = self.counters.request_count.load(Ordering::Relaxed) as u64;
        if count == 0 {
            Duration::from_nanos(0)
        } else {
            Duration::from_nanos(self.counters.total_latency_ns.load(Ordering::Relaxed) / count)
        }
    }
}

impl Middleware for MetricsMiddleware {
    fn wrap(&self, next: SharedHandler) -> SharedHandler {
        let counters = Arc::clone(&self.counters);
        Arc::new(move |req: Request| {
            let start = Instant::now();
            let resp = next.call(req);
            let elapsed = start.elapsed();

            counters.request_count.fetch_add(1, Ordering::Relaxed);
            counters
                .total_latency_ns
                .fetch_add(elapsed.as_nanos() as u64, Ordering::Relaxed);
            if resp.status().is_server_error() {
                counters.server_errors.fetch_add(1, Ordering::Relaxed);
            }
            resp
        })
    }
}
