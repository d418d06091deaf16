use std::time::Duration;

pub const DEFAULT_GATEWAY_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_BACKGROUND_WORKERS: usize = 16;
pub const DEFAULT_WRITE_RETRIES: u32 = 5;
pub const DEFAULT_JOIN_BASE_URL: &str = "http://localhost:5173/interview";

/// Knobs for the application lifecycle orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleConfig {
    /// Upper bound for any single call to the CV, room, or messaging gateways.
    pub gateway_timeout: Duration,
    pub background_workers: usize,
    /// Extra read-modify-write attempts after a concurrent modification is detected.
    pub write_retries: u32,
    /// Base of the deep link sent to candidates to join an interview room.
    pub join_base_url: String,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            gateway_timeout: DEFAULT_GATEWAY_TIMEOUT,
            background_workers: DEFAULT_BACKGROUND_WORKERS,
            write_retries: DEFAULT_WRITE_RETRIES,
            join_base_url: DEFAULT_JOIN_BASE_URL.to_string(),
        }
    }
}
