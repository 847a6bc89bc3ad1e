//! Webserver runtime state
//!
//! Server-level bookkeeping that is independent of survey business logic.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Runtime state of the HTTP server process
#[derive(Debug)]
pub struct ServerState {
    pub bind_address: SocketAddr,
    /// How long a submitted session stays resolvable for late retries
    pub cleanup_grace: Duration,
    is_running: AtomicBool,
    start_time: Instant,
}

impl ServerState {
    pub fn new(bind_address: SocketAddr, cleanup_grace: Duration) -> Self {
        Self {
            bind_address,
            cleanup_grace,
            is_running: AtomicBool::new(true),
            start_time: Instant::now(),
        }
    }

    /// Check if the server is running
    pub fn is_running(&self) -> bool {
        self.is_running.load(Ordering::Relaxed)
    }

    /// Set running state
    pub fn set_running(&self, running: bool) {
        self.is_running.store(running, Ordering::Relaxed);
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
