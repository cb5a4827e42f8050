//! Per-service sliding-window rate limiting for outbound API calls.
//!
//! Each upstream service has a window of recent request timestamps.
//! Admission is immediate while fewer than `max_requests` timestamps
//! fall inside the window; otherwise the caller queues FIFO and is woken
//! either by a permit release or by the window sliding past its oldest
//! timestamp. A queued caller that outlives its queue timeout is removed
//! cleanly: no dangling timer, no phantom slot.
//!
//! Permits are RAII guards, so release happens on every exit path
//! including provider failure.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::time::Instant;
use tracing::debug;

/// Limits for one upstream service.
#[derive(Debug, Clone)]
pub struct ServiceLimits {
    /// Maximum requests inside a window.
    pub max_requests: usize,

    /// Sliding window length.
    pub window: Duration,

    /// How long a caller may wait in the queue before failing.
    pub queue_timeout: Duration,
}

impl ServiceLimits {
    /// Create limits with the default 30-second queue timeout.
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            queue_timeout: Duration::from_secs(30),
        }
    }

    /// Override the queue timeout.
    pub fn with_queue_timeout(mut self, timeout: Duration) -> Self {
        self.queue_timeout = timeout;
        self
    }
}

impl Default for ServiceLimits {
    fn default() -> Self {
        Self::new(10, Duration::from_secs(10))
    }
}

/// Error from a rate-limited acquisition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RateLimitError {
    /// The caller waited in the queue longer than the service's timeout.
    #[error("timed out waiting for a {service} rate-limit permit")]
    QueueTimeout { service: String },
}

/// A queued acquirer waiting for a permit.
struct Waiter {
    id: u64,
    tx: oneshot::Sender<()>,
}

/// Mutable limiter state for one service.
#[derive(Default)]
struct ServiceState {
    /// Timestamps of admitted requests, oldest first.
    timestamps: VecDeque<Instant>,

    /// FIFO queue of waiting acquirers.
    waiters: VecDeque<Waiter>,
}

impl ServiceState {
    /// Drop timestamps that have slid out of the window.
    fn prune(&mut self, window: Duration) {
        let now = Instant::now();
        while let Some(oldest) = self.timestamps.front() {
            if now.duration_since(*oldest) >= window {
                self.timestamps.pop_front();
            } else {
                break;
            }
        }
    }

    /// Hand a permit to the oldest live waiter, recording a fresh
    /// timestamp for it. Skips waiters that have already given up.
    fn grant_next(&mut self) {
        while let Some(waiter) = self.waiters.pop_front() {
            self.timestamps.push_back(Instant::now());
            if waiter.tx.send(()).is_ok() {
                return;
            }
            // The waiter timed out between the grant and the send;
            // take its timestamp back and try the next one.
            self.timestamps.pop_back();
        }
    }

    /// Remove a waiter by id. Returns true if it was still queued.
    fn remove_waiter(&mut self, id: u64) -> bool {
        let before = self.waiters.len();
        self.waiters.retain(|w| w.id != id);
        self.waiters.len() != before
    }
}

type SharedState = Arc<Mutex<HashMap<String, ServiceState>>>;

/// Sliding-window admission control shared by all providers.
///
/// The inner mutex guards short map operations only and is never held
/// across an await.
pub struct RateLimiter {
    state: SharedState,
    limits: HashMap<String, ServiceLimits>,
    default_limits: ServiceLimits,
    next_waiter_id: AtomicU64,
}

impl RateLimiter {
    /// Create a limiter with per-service limits. Services not listed
    /// fall back to the default limits rather than failing.
    pub fn new(limits: HashMap<String, ServiceLimits>) -> Self {
        Self {
            state: Arc::new(Mutex::new(HashMap::new())),
            limits,
            default_limits: ServiceLimits::default(),
            next_waiter_id: AtomicU64::new(0),
        }
    }

    /// The limiter configuration used in production: Skyscanner allows
    /// 5 requests per 10 seconds (60-second queue), HERE 10 per 10.
    pub fn with_default_services() -> Self {
        let mut limits = HashMap::new();
        limits.insert(
            "skyscanner".to_string(),
            ServiceLimits::new(5, Duration::from_secs(10))
                .with_queue_timeout(Duration::from_secs(60)),
        );
        limits.insert(
            "here".to_string(),
            ServiceLimits::new(10, Duration::from_secs(10)),
        );
        Self::new(limits)
    }

    fn limits_for(&self, service: &str) -> &ServiceLimits {
        self.limits.get(service).unwrap_or(&self.default_limits)
    }

    /// Acquire a permit for `service`, waiting if the window is full.
    ///
    /// # Errors
    ///
    /// Returns `RateLimitError::QueueTimeout` if no permit becomes
    /// available within the service's queue timeout.
    pub async fn acquire(&self, service: &str) -> Result<RatePermit, RateLimitError> {
        let limits = self.limits_for(service).clone();
        let deadline = Instant::now() + limits.queue_timeout;

        loop {
            let (mut rx, window_free_at, waiter_id) = {
                let mut map = self.state.lock().unwrap();
                let state = map.entry(service.to_string()).or_default();
                state.prune(limits.window);

                if state.timestamps.len() < limits.max_requests {
                    state.timestamps.push_back(Instant::now());
                    return Ok(RatePermit {
                        state: Arc::clone(&self.state),
                        service: service.to_string(),
                    });
                }

                // Window is full; queue up. We wake on release, or when
                // the oldest timestamp slides out of the window.
                let window_free_at = *state.timestamps.front().unwrap() + limits.window;
                let id = self.next_waiter_id.fetch_add(1, Ordering::Relaxed);
                let (tx, rx) = oneshot::channel();
                state.waiters.push_back(Waiter { id, tx });
                debug!(service, waiter = id, "rate limit reached, queueing");
                (rx, window_free_at, id)
            };

            let wake_at = window_free_at.min(deadline);

            tokio::select! {
                granted = &mut rx => {
                    if granted.is_ok() {
                        // A release recorded our timestamp already
                        return Ok(RatePermit {
                            state: Arc::clone(&self.state),
                            service: service.to_string(),
                        });
                    }
                    // Sender dropped without a grant (state discarded);
                    // treat as a timeout.
                    return Err(RateLimitError::QueueTimeout {
                        service: service.to_string(),
                    });
                }
                _ = tokio::time::sleep_until(wake_at) => {
                    let granted = {
                        let mut map = self.state.lock().unwrap();
                        if let Some(state) = map.get_mut(service) {
                            state.remove_waiter(waiter_id);
                        }
                        // A grant may have raced the wakeup; if so the
                        // permit is ours, timestamp already recorded.
                        rx.try_recv().is_ok()
                    };
                    if granted {
                        return Ok(RatePermit {
                            state: Arc::clone(&self.state),
                            service: service.to_string(),
                        });
                    }
                    if Instant::now() >= deadline {
                        debug!(service, waiter = waiter_id, "rate limit queue timeout");
                        return Err(RateLimitError::QueueTimeout {
                            service: service.to_string(),
                        });
                    }
                    // The window should have slid; retry admission.
                }
            }
        }
    }
}

/// Proof of admission for one outbound request.
///
/// Dropping the permit releases it, waking the oldest queued waiter.
/// The recorded timestamp remains in the window: the limiter counts
/// requests made, not permits currently held.
pub struct RatePermit {
    state: SharedState,
    service: String,
}

impl std::fmt::Debug for RatePermit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RatePermit")
            .field("service", &self.service)
            .finish_non_exhaustive()
    }
}

impl Drop for RatePermit {
    fn drop(&mut self) {
        let mut map = self.state.lock().unwrap();
        if let Some(state) = map.get_mut(&self.service) {
            state.grant_next();
        }
    }
}
