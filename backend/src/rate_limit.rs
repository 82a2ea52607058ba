use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::error::AppError;

pub const UNKNOWN_CLIENT: &str = "unknown";

/// Fixed-window request counter keyed by client address.
pub struct RateLimiter {
    limit: u32,
    window: Duration,
    clients: DashMap<String, (u32, Instant)>,
}

impl RateLimiter {
    pub fn new(limit: u32, window: Duration) -> Self {
        RateLimiter {
            limit,
            window,
            clients: DashMap::new(),
        }
    }

    pub fn per_minute(limit: u32) -> Self {
        Self::new(limit, Duration::from_secs(60))
    }

    pub fn check(&self, client: &str) -> Result<(), AppError> {
        self.check_at(client, Instant::now())
    }

    pub fn check_at(&self, client: &str, now: Instant) -> Result<(), AppError> {
        let mut entry = self
            .clients
            .entry(client.to_string())
            .or_insert_with(|| (0, now));

        // New window
        if now.duration_since(entry.1) >= self.window {
            *entry = (0, now);
        }

        if entry.0 >= self.limit {
            return Err(AppError::RateLimited);
        }
        entry.0 += 1;
        Ok(())
    }

    /// Drops clients whose window has expired. Returns how many were removed.
    pub fn purge_expired(&self, now: Instant) -> usize {
        // Counted inside retain, other workers insert while this runs.
        let mut removed = 0;
        self.clients.retain(|_, (_, started)| {
            let live = now.saturating_duration_since(*started) < self.window;
            if !live {
                removed += 1;
            }
            live
        });
        removed
    }

    pub fn tracked_clients(&self) -> usize {
        self.clients.len()
    }
}
