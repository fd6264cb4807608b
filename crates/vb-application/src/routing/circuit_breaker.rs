//! Per-provider circuit breaker
//!
//! The router consults one breaker per endpoint before dispatching. A
//! provider that keeps failing trips its breaker open and the router skips
//! straight to the next adapter in the chain instead of burning the retry
//! budget on a dead backend.
//!
//! Breaker state is derived runtime state; it is never persisted.

use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use vb_domain::error::{Error, Result};

/// Circuit breaker states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    /// Requests flow normally
    Closed,
    /// Requests are blocked until the recovery timeout passes
    Open {
        /// When the circuit tripped
        opened_at: Instant,
    },
    /// Probing whether the provider recovered
    HalfOpen,
}

impl std::fmt::Display for CircuitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CircuitState::Closed => write!(f, "closed"),
            CircuitState::Open { .. } => write!(f, "open"),
            CircuitState::HalfOpen => write!(f, "half-open"),
        }
    }
}

/// Circuit breaker configuration
#[derive(Debug, Clone)]
pub struct CircuitBreakerConfig {
    /// Failures within the rolling window before opening
    pub failure_threshold: u32,
    /// Time to wait before probing recovery
    pub recovery_timeout: Duration,
    /// Successes needed to close from half-open
    pub success_threshold: u32,
    /// Rolling window over which failures are counted
    pub failure_window: Duration,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            recovery_timeout: Duration::from_secs(60),
            success_threshold: 3,
            failure_window: Duration::from_secs(300),
        }
    }
}

#[derive(Debug, Default)]
struct BreakerInner {
    state: Option<CircuitState>,
    failure_timestamps: Vec<Instant>,
    half_open_successes: u32,
}

impl BreakerInner {
    fn state(&self) -> CircuitState {
        self.state.unwrap_or(CircuitState::Closed)
    }
}

/// Circuit breaker for one provider endpoint
pub struct CircuitBreaker {
    name: String,
    config: CircuitBreakerConfig,
    inner: RwLock<BreakerInner>,
}

impl CircuitBreaker {
    /// Create a breaker with default configuration
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(name, CircuitBreakerConfig::default())
    }

    /// Create a breaker with custom configuration
    pub fn with_config(name: impl Into<String>, config: CircuitBreakerConfig) -> Self {
        Self {
            name: name.into(),
            config,
            inner: RwLock::new(BreakerInner::default()),
        }
    }

    /// Provider this breaker guards
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether a request may be dispatched right now
    ///
    /// An open circuit transitions to half-open once the recovery timeout
    /// has passed; the transition happens here so the first caller after
    /// the timeout becomes the probe.
    pub async fn allows_request(&self) -> bool {
        let mut inner = self.inner.write().await;
        match inner.state() {
            CircuitState::Closed | CircuitState::HalfOpen => true,
            CircuitState::Open { opened_at } => {
                if opened_at.elapsed() >= self.config.recovery_timeout {
                    inner.state = Some(CircuitState::HalfOpen);
                    inner.half_open_successes = 0;
                    debug!(provider = %self.name, "circuit breaker half-open, probing");
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Record a successful call
    pub async fn record_success(&self) {
        let mut inner = self.inner.write().await;
        match inner.state() {
            CircuitState::HalfOpen => {
                inner.half_open_successes += 1;
                if inner.half_open_successes >= self.config.success_threshold {
                    inner.state = Some(CircuitState::Closed);
                    inner.failure_timestamps.clear();
                    info!(provider = %self.name, "circuit breaker closed after recovery");
                }
            }
            CircuitState::Closed => {
                let cutoff = Instant::now() - self.config.failure_window;
                inner.failure_timestamps.retain(|&t| t > cutoff);
            }
            CircuitState::Open { .. } => {}
        }
    }

    /// Record a failed call
    pub async fn record_failure(&self) {
        let mut inner = self.inner.write().await;
        let now = Instant::now();
        let cutoff = now - self.config.failure_window;
        inner.failure_timestamps.push(now);
        inner.failure_timestamps.retain(|&t| t > cutoff);

        match inner.state() {
            CircuitState::HalfOpen => {
                inner.state = Some(CircuitState::Open { opened_at: now });
                warn!(provider = %self.name, "circuit breaker reopened, probe failed");
            }
            CircuitState::Closed => {
                if inner.failure_timestamps.len() >= self.config.failure_threshold as usize {
                    inner.state = Some(CircuitState::Open { opened_at: now });
                    warn!(
                        provider = %self.name,
                        failures = inner.failure_timestamps.len(),
                        "circuit breaker opened"
                    );
                }
            }
            CircuitState::Open { .. } => {}
        }
    }

    /// Current state
    pub async fn state(&self) -> CircuitState {
        self.inner.read().await.state()
    }

    /// Execute an operation under breaker protection
    pub async fn call<F, Fut, T>(&self, operation: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        if !self.allows_request().await {
            return Err(Error::network(format!(
                "circuit breaker open for provider '{}'",
                self.name
            )));
        }

        match operation().await {
            Ok(value) => {
                self.record_success().await;
                Ok(value)
            }
            Err(e) => {
                self.record_failure().await;
                Err(e)
            }
        }
    }

    /// Force the breaker back to closed
    pub async fn reset(&self) {
        let mut inner = self.inner.write().await;
        *inner = BreakerInner::default();
    }
}
