//! Fixed-window request counter keyed by client identifier.
//!
//! A window opens on the first request from a client and is replaced by a
//! fresh one on the first request after it has run its full length. Within a
//! window at most `max_requests` are let through. Counts live in memory only,
//! so they reset on restart and are not shared between instances.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

use crate::config::RateLimitSettings;

#[derive(Debug, Clone, Copy)]
struct Window {
    count: u32,
    started_at: Instant,
}

#[derive(Clone)]
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    ledger: Arc<Mutex<HashMap<String, Window>>>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            ledger: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Record a request from `client_id`, returning whether it is allowed.
    pub async fn try_acquire(&self, client_id: &str) -> bool {
        self.try_acquire_at(client_id, Instant::now()).await
    }

    pub async fn try_acquire_at(&self, client_id: &str, now: Instant) -> bool {
        let mut ledger = self.ledger.lock().await;

        let window = ledger.entry(client_id.to_owned()).or_insert(Window {
            count: 0,
            started_at: now,
        });

        if window.count == 0 || now.saturating_duration_since(window.started_at) > self.window {
            *window = Window {
                count: 1,
                started_at: now,
            };
            return true;
        }

        if window.count >= self.max_requests {
            tracing::debug!(client_id, count = window.count, "rate limit reached");
            return false;
        }

        window.count += 1;
        true
    }

    /// Drop every window that has run its full length. Returns how many went.
    pub async fn cleanup(&self, now: Instant) -> usize {
        let mut ledger = self.ledger.lock().await;
        let before = ledger.len();
        ledger.retain(|_, window| now.saturating_duration_since(window.started_at) <= self.window);
        before - ledger.len()
    }

    /// Sweep expired windows once per window length, for as long as the
    /// process runs.
    pub fn spawn_cleanup(&self) -> tokio::task::JoinHandle<()> {
        let limiter = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(limiter.window);
            loop {
                interval.tick().await;
                let removed = limiter.cleanup(Instant::now()).await;
                if removed > 0 {
                    tracing::debug!(removed, "evicted expired rate limit windows");
                }
            }
        })
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.ledger.lock().await.len()
    }

    /// Requests counted for `client_id` in its current window.
    #[cfg(test)]
    async fn count(&self, client_id: &str) -> u32 {
        self.ledger
            .lock()
            .await
            .get(client_id)
            .map(|window| window.count)
            .unwrap_or(0)
    }
}

impl From<&RateLimitSettings> for RateLimiter {
    fn from(settings: &RateLimitSettings) -> Self {
        Self::new(settings.max_requests, settings.window())
    }
}
