//! Rate limiting middleware using Governor.
//!
//! Implements per-client rate limiting with a token bucket algorithm. Bearer
//! tokens are not verified at this layer, so clients are keyed by their
//! network address; requests without a known peer share one bucket.

use axum::{
    Json,
    body::Body,
    extract::{ConnectInfo, State},
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use serde_json::json;
use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    num::NonZeroU32,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

/// Paths that are never throttled.
const EXEMPT_PATHS: &[&str] = &["/health", "/api-docs/openapi.json"];

/// Idle limiters are evicted once every this many checks.
const PRUNE_EVERY: u64 = 1024;

/// Bucket for requests whose peer address is unknown.
const UNKNOWN_CLIENT: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

/// Rate limiter state shared across requests.
pub struct RateLimiterState {
    limiter: DefaultKeyedRateLimiter<IpAddr>,
    checks: AtomicU64,
}

impl Default for RateLimiterState {
    fn default() -> Self {
        Self::new(100, Duration::from_secs(60))
    }
}

impl RateLimiterState {
    /// Allows `requests` per `period` per client, all of them as a burst.
    pub fn new(requests: u32, period: Duration) -> Self {
        let burst = NonZeroU32::new(requests).unwrap_or(NonZeroU32::MIN);
        let quota = Quota::with_period(period / burst.get())
            .unwrap_or_else(|| Quota::per_minute(burst))
            .allow_burst(burst);

        Self {
            limiter: RateLimiter::dashmap(quota),
            checks: AtomicU64::new(0),
        }
    }

    /// Returns true if the request is allowed, false if rate limited.
    pub fn check(&self, client: IpAddr) -> bool {
        if self.checks.fetch_add(1, Ordering::Relaxed) % PRUNE_EVERY == PRUNE_EVERY - 1 {
            self.prune();
        }
        self.limiter.check_key(&client).is_ok()
    }

    /// Drops limiters whose buckets have fully refilled.
    pub fn prune(&self) {
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
    }

    /// Number of clients currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.limiter.len()
    }
}

/// Rate limiting middleware keyed by peer address.
pub async fn rate_limit_middleware(
    State(limiter): State<Arc<RateLimiterState>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if EXEMPT_PATHS.contains(&request.uri().path()) {
        return next.run(request).await;
    }

    let client = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(UNKNOWN_CLIENT);

    if !limiter.check(client) {
        tracing::debug!(%client, "Rate limit exceeded");
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({
                "error": "Rate limit exceeded. Please try again later.",
                "retry_after_seconds": 60
            })),
        )
            .into_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(last: u8) -> IpAddr {
        IpAddr::V4(Ipv4Addr::new(10, 0, 0, last))
    }

    #[test]
    fn test_burst_then_limited() {
        let state = RateLimiterState::new(2, Duration::from_secs(60));
        assert!(state.check(ip(1)));
        assert!(state.check(ip(1)));
        assert!(!state.check(ip(1)));
    }

    #[test]
    fn test_clients_are_isolated() {
        let state = RateLimiterState::new(1, Duration::from_secs(60));
        assert!(state.check(ip(1)));
        assert!(state.check(ip(2)));
        assert!(!state.check(ip(1)));
    }

    #[test]
    fn test_zero_requests_still_allows_one() {
        let state = RateLimiterState::new(0, Duration::from_secs(60));
        assert!(state.check(ip(1)));
        assert!(!state.check(ip(1)));
    }

    #[test]
    fn test_refilled_clients_are_evicted() {
        let state = RateLimiterState::new(1, Duration::from_millis(20));
        for last in 1..=50 {
            state.check(ip(last));
        }
        assert_eq!(state.tracked_clients(), 50);

        std::thread::sleep(Duration::from_millis(60));
        state.prune();
        assert_eq!(state.tracked_clients(), 0);
    }

    #[test]
    fn test_pruning_runs_during_checks() {
        let state = RateLimiterState::new(1, Duration::from_millis(1));
        for i in 0..PRUNE_EVERY - 1 {
            state.check(IpAddr::V6((i as u128).into()));
        }
        std::thread::sleep(Duration::from_millis(10));
        state.check(ip(1));
        assert!(state.tracked_clients() <= 1);
    }
}
