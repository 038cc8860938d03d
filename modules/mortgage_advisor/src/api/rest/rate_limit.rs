//! Fixed-window rate limiting for the chat endpoint.
//!
//! Requests are counted per key within a window; the key is the peer IP or a
//! single shared bucket.

use super::error::rate_limited;
use axum::{
    extract::{ConnectInfo, Request, State},
    http::header::HeaderValue,
    middleware::Next,
    response::{IntoResponse, Response},
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

const GLOBAL_KEY: &str = "global";

#[derive(Debug)]
pub struct RateLimiter {
    /// key -> (request count, window start)
    requests: Mutex<HashMap<String, (u32, Instant)>>,
    max_requests: u32,
    window: Duration,
    by_ip: bool,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration, by_ip: bool) -> Self {
        Self {
            requests: Mutex::new(HashMap::new()),
            max_requests,
            window,
            by_ip,
        }
    }

    /// One-minute windows
    pub fn per_minute(max_requests: u32, by_ip: bool) -> Self {
        Self::new(max_requests, Duration::from_secs(60), by_ip)
    }

    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    /// `Ok(remaining)` if allowed, `Err(retry_after_secs)` if over the limit
    pub fn check_rate_limit(&self, key: &str) -> Result<u32, u64> {
        let now = Instant::now();
        let mut requests = self.requests.lock();

        let entry = requests.entry(key.to_string()).or_insert((0, now));

        if now.duration_since(entry.1) >= self.window {
            *entry = (1, now);
            return Ok(self.max_requests.saturating_sub(1));
        }

        if entry.0 >= self.max_requests {
            let elapsed = now.duration_since(entry.1).as_secs();
            return Err(self.window.as_secs().saturating_sub(elapsed).max(1));
        }

        entry.0 += 1;
        Ok(self.max_requests.saturating_sub(entry.0))
    }

    /// Drop windows that have already expired
    pub fn cleanup_expired(&self) -> usize {
        let now = Instant::now();
        let mut requests = self.requests.lock();
        let before = requests.len();
        requests.retain(|_, (_, started)| now.duration_since(*started) < self.window);
        before - requests.len()
    }

    fn key_for(&self, request: &Request) -> String {
        if !self.by_ip {
            return GLOBAL_KEY.to_string();
        }
        request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| format!("ip:{}", addr.ip()))
            .unwrap_or_else(|| "ip:unknown".to_string())
    }
}

fn set_header(response: &mut Response, name: &'static str, value: impl ToString) {
    if let Ok(value) = HeaderValue::from_str(&value.to_string()) {
        response.headers_mut().insert(name, value);
    }
}

/// Returns 429 Problem Details with `Retry-After` when the limit is exceeded
pub async fn rate_limit_middleware(
    State(limiter): State<Arc<RateLimiter>>,
    request: Request,
    next: Next,
) -> Response {
    let key = limiter.key_for(&request);

    match limiter.check_rate_limit(&key) {
        Ok(remaining) => {
            let mut response = next.run(request).await;
            set_header(&mut response, "X-RateLimit-Limit", limiter.max_requests);
            set_header(&mut response, "X-RateLimit-Remaining", remaining);
            response
        }
        Err(retry_after) => {
            tracing::warn!(key = %key, retry_after, "Rate limit exceeded");
            let mut response = rate_limited(retry_after).into_response();
            set_header(&mut response, "Retry-After", retry_after);
            set_header(&mut response, "X-RateLimit-Limit", limiter.max_requests);
            set_header(&mut response, "X-RateLimit-Remaining", 0);
            response
        }
    }
}
