//! Settle timing shared by the primitives and the flow layer

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Fixed waits inserted around mutations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tempo {
    /// Pause after every step when the step sets none
    pub default_step_delay_ms: u64,

    /// Pause between scrolling a target into view and clicking it
    pub click_settle_ms: u64,

    /// Delay before the deferred blur after text entry
    pub blur_delay_ms: u64,

    /// Pause before submitting a filled form
    pub submit_settle_ms: u64,
}

impl Tempo {
    pub fn default_step_delay(&self) -> Duration {
        Duration::from_millis(self.default_step_delay_ms)
    }

    pub fn click_settle(&self) -> Duration {
        Duration::from_millis(self.click_settle_ms)
    }

    pub fn blur_delay(&self) -> Duration {
        Duration::from_millis(self.blur_delay_ms)
    }

    pub fn submit_settle(&self) -> Duration {
        Duration::from_millis(self.submit_settle_ms)
    }

    /// All waits zeroed.
    pub fn immediate() -> Self {
        Self {
            default_step_delay_ms: 0,
            click_settle_ms: 0,
            blur_delay_ms: 0,
            submit_settle_ms: 0,
        }
    }
}

impl Default for Tempo {
    fn default() -> Self {
        Self {
            default_step_delay_ms: 1000,
            click_settle_ms: 500,
            blur_delay_ms: 50,
            submit_settle_ms: 500,
        }
    }
}

/// Suspend for `duration`; zero returns immediately.
pub async fn settle(duration: Duration) {
    if duration.is_zero() {
        return;
    }
    debug!(wait_ms = duration.as_millis() as u64, "settling");
    tokio::time::sleep(duration).await;
}
