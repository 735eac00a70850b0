//! # Rate Limiting Through the Public API
//!
//! Uses the limiter the way a route handler does: extract the client IP
//! from headers, check a preset, turn the decision into response headers.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use wl_02_rate_limiter::{
    client_ip, ManualClock, RateLimitApi, RateLimitPreset, RateLimiter, RateLimiterConfig,
    RateLimiterDependencies, SlidingWindowBackend, UpstashRestBackend, HEADER_RETRY_AFTER, UNKNOWN_CLIENT,
};

const START_MS: u64 = 1_700_000_000_000;

fn local_limiter() -> (RateLimiter, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(START_MS));
    let limiter = RateLimiter::new(
        RateLimiterDependencies {
            backend: None,
            clock: clock.clone(),
        },
        RateLimiterConfig::default().with_sweep_probability(0.0),
    );
    (limiter, clock)
}

/// limit 5 per 60 s: five successes counting down, the sixth denied,
/// a fresh window after it elapses.
#[tokio::test]
async fn test_window_of_five_per_minute() {
    let (limiter, clock) = local_limiter();
    let window = Duration::from_millis(60_000);

    let mut remaining = Vec::new();
    for _ in 0..5 {
        let decision = limiter.check_rate_limit("ip:1.2.3.4", 5, window).await;
        assert!(decision.success);
        remaining.push(decision.remaining);
    }
    assert_eq!(remaining, [4, 3, 2, 1, 0]);
    assert!(!limiter.check_rate_limit("ip:1.2.3.4", 5, window).await.success);

    clock.advance(window);
    let fresh = limiter.check_rate_limit("ip:1.2.3.4", 5, window).await;
    assert!(fresh.success);
    assert_eq!(fresh.remaining, 4);
}

#[tokio::test]
async fn test_identifiers_are_independent() {
    let (limiter, _) = local_limiter();

    for _ in 0..5 {
        limiter.check_preset("signup:1.1.1.1", RateLimitPreset::Strict).await;
    }

    assert!(!limiter.check_preset("signup:1.1.1.1", RateLimitPreset::Strict).await.success);
    assert!(limiter.check_preset("signup:2.2.2.2", RateLimitPreset::Strict).await.success);
    assert!(limiter.check_preset("lookup:1.1.1.1", RateLimitPreset::Standard).await.success);
}

#[tokio::test]
async fn test_request_headers_to_response_headers() {
    let (limiter, clock) = local_limiter();
    let headers: HashMap<String, String> = [(
        "X-Forwarded-For".to_string(),
        "203.0.113.7, 10.0.0.1".to_string(),
    )]
    .into_iter()
    .collect();

    let ip = client_ip(&headers);
    assert_eq!(ip, "203.0.113.7");

    let key = format!("signup:{ip}");
    for _ in 0..5 {
        limiter.check_preset(&key, RateLimitPreset::Strict).await;
    }
    clock.advance(Duration::from_secs(20));
    let denied = limiter.check_preset(&key, RateLimitPreset::Strict).await;

    let response_headers = denied.headers(limiter.now_epoch_seconds());
    assert!(response_headers.contains(&("X-RateLimit-Limit", "5".to_string())));
    assert!(response_headers.contains(&("X-RateLimit-Remaining", "0".to_string())));
    assert!(response_headers.contains(&(HEADER_RETRY_AFTER, "40".to_string())));
}

#[test]
fn test_client_ip_fallbacks() {
    let real_ip = [("x-real-ip", "198.51.100.4")];
    assert_eq!(client_ip(&real_ip[..]), "198.51.100.4");

    let none: [(&str, &str); 0] = [];
    assert_eq!(client_ip(&none[..]), UNKNOWN_CLIENT);
}

/// Nothing listens on the discard port; every check must still be answered
/// from the local window.
#[tokio::test]
async fn test_unreachable_backend_degrades_to_local() {
    let backend = UpstashRestBackend::new(
        "http://127.0.0.1:9",
        "token",
        Duration::from_millis(200),
    )
    .unwrap();
    let limiter = RateLimiter::new(
        RateLimiterDependencies {
            backend: Some(Arc::new(backend) as Arc<dyn SlidingWindowBackend>),
            clock: Arc::new(ManualClock::new(START_MS)),
        },
        RateLimiterConfig::default()
            .with_backend_timeout(Duration::from_millis(200))
            .with_sweep_probability(0.0),
    );

    let mut remaining = Vec::new();
    for _ in 0..3 {
        let decision = limiter.check_rate_limit("ip:5.6.7.8", 3, Duration::from_secs(60)).await;
        assert!(decision.success);
        remaining.push(decision.remaining);
    }
    assert_eq!(remaining, [2, 1, 0]);
    assert!(!limiter.check_rate_limit("ip:5.6.7.8", 3, Duration::from_secs(60)).await.success);
}
