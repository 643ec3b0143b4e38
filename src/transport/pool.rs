//! Connection admission control.
//!
//! Each transport owns a [`ConnectionPool`] that caps concurrent in-flight
//! requests per host at `max_connections_per_server`. All pools also draw
//! from one process-wide semaphore of [`GLOBAL_CONNECTION_LIMIT`] permits, so
//! the per-host ceiling is never capped by a lower global default.
//!
//! Requests beyond the ceiling wait for a permit; permits are returned when
//! the [`ConnectionPermit`] is dropped. A host's semaphore is forgotten once
//! nothing holds or awaits it and a new host is seen, so the map is bounded
//! by the hosts with requests in flight plus one.

use crate::errors::{HttpClientError, HttpResult};
use crate::GLOBAL_CONNECTION_LIMIT;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use url::Url;

static GLOBAL_PERMITS: Lazy<Arc<Semaphore>> =
    Lazy::new(|| Arc::new(Semaphore::new(GLOBAL_CONNECTION_LIMIT)));

/// Make sure the process-wide connection ceiling is in place.
pub(crate) fn ensure_global_limit() -> usize {
    GLOBAL_PERMITS.available_permits()
}

/// Snapshot of pool activity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Requests currently holding a permit
    pub active: usize,
    /// Permits handed out since the pool was created
    pub total: usize,
    /// Highest number of simultaneously active requests
    pub peak: usize,
    /// Number of hosts currently tracked
    pub hosts: usize,
}

#[derive(Debug, Default)]
struct Counters {
    active: AtomicUsize,
    total: AtomicUsize,
    peak: AtomicUsize,
}

/// Per-host concurrency limiter
pub struct ConnectionPool {
    max_per_host: usize,
    hosts: Mutex<HashMap<String, Arc<Semaphore>>>,
    counters: Arc<Counters>,
}

impl ConnectionPool {
    /// Create a pool allowing `max_per_host` concurrent requests per host
    pub fn new(max_per_host: usize) -> Self {
        Self {
            max_per_host,
            hosts: Mutex::new(HashMap::new()),
            counters: Arc::new(Counters::default()),
        }
    }

    /// Per-host ceiling
    pub fn max_per_host(&self) -> usize {
        self.max_per_host
    }

    /// Wait for a permit to talk to the host of `url`.
    pub async fn acquire(&self, url: &Url) -> HttpResult<ConnectionPermit> {
        let host = self.host_semaphore(url);

        let host_permit = host.acquire_owned().await.map_err(|e| {
            HttpClientError::transport(format!("connection pool closed: {}", e))
        })?;
        let global_permit = Arc::clone(&GLOBAL_PERMITS)
            .acquire_owned()
            .await
            .map_err(|e| {
                HttpClientError::transport(format!("global connection limit closed: {}", e))
            })?;

        let active = self.counters.active.fetch_add(1, Ordering::AcqRel) + 1;
        self.counters.total.fetch_add(1, Ordering::Relaxed);
        self.counters.peak.fetch_max(active, Ordering::AcqRel);

        Ok(ConnectionPermit {
            _host: host_permit,
            _global: global_permit,
            counters: Arc::clone(&self.counters),
        })
    }

    /// Current pool statistics
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            active: self.counters.active.load(Ordering::Acquire),
            total: self.counters.total.load(Ordering::Relaxed),
            peak: self.counters.peak.load(Ordering::Acquire),
            hosts: self.hosts.lock().len(),
        }
    }

    fn host_semaphore(&self, url: &Url) -> Arc<Semaphore> {
        let key = host_key(url);
        let mut hosts = self.hosts.lock();
        if let Some(existing) = hosts.get(&key) {
            return Arc::clone(existing);
        }

        // Permits and pending acquires each hold a clone.
        hosts.retain(|_, semaphore| Arc::strong_count(semaphore) > 1);

        let semaphore = Arc::new(Semaphore::new(self.max_per_host));
        hosts.insert(key, Arc::clone(&semaphore));
        semaphore
    }
}

impl std::fmt::Debug for ConnectionPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionPool")
            .field("max_per_host", &self.max_per_host)
            .field("stats", &self.stats())
            .finish()
    }
}

/// Held for the duration of one request
#[derive(Debug)]
pub struct ConnectionPermit {
    _host: OwnedSemaphorePermit,
    _global: OwnedSemaphorePermit,
    counters: Arc<Counters>,
}

impl Drop for ConnectionPermit {
    fn drop(&mut self) {
        self.counters.active.fetch_sub(1, Ordering::AcqRel);
    }
}

fn host_key(url: &Url) -> String {
    format!(
        "{}:{}",
        url.host_str().unwrap_or_default(),
        url.port_or_known_default().unwrap_or_default()
    )
}
