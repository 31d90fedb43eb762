//! Configuration schema of the bundled service server

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings for [`ServiceServer`](crate::server::ServiceServer).
///
/// Every field has a default, so an empty object `{}` is a valid file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Service name used in log lines
    pub name: String,
    /// Seconds between debug heartbeat lines, 0 disables them
    pub heartbeat_secs: u64,
    /// Stop on its own after this many seconds
    pub run_for_secs: Option<u64>,
    /// Seconds spent draining after shutdown is requested, before stopping
    pub drain_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "svcctl".to_string(),
            heartbeat_secs: 0,
            run_for_secs: None,
            drain_secs: 0,
        }
    }
}

impl ServiceConfig {
    /// Heartbeat period, if enabled
    pub fn heartbeat(&self) -> Option<Duration> {
        (self.heartbeat_secs > 0).then(|| Duration::from_secs(self.heartbeat_secs))
    }

    /// Drain period after cancellation, if any
    pub fn drain(&self) -> Option<Duration> {
        (self.drain_secs > 0).then(|| Duration::from_secs(self.drain_secs))
    }

    /// Self-termination deadline, if any
    pub fn run_for(&self) -> Option<Duration> {
        self.run_for_secs.map(Duration::from_secs)
    }
}
