// =============================================================================
// Application State: read-only context shared by every request
// =============================================================================
//
// Requests never write here: there is no cache, session, or cross-request
// ordering, so any number of workers can serve the router concurrently.
// =============================================================================

use std::time::Instant;

use crate::runtime_config::RuntimeConfig;

/// Shared via `Arc<AppState>` as the router state.
#[derive(Debug)]
pub struct AppState {
    pub config: RuntimeConfig,
    started_at: Instant,
}

impl AppState {
    pub fn new(config: RuntimeConfig) -> Self {
        Self {
            config,
            started_at: Instant::now(),
        }
    }

    /// Seconds since the state was built.
    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
