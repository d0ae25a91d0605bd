use crate::error::{Error, Result};
use std::time::Duration;
use tracing::debug;

/// How long to wait after a successful write before returning.
///
/// Tableau Server updates its search index asynchronously, so a group created
/// a moment ago may not show up in a listing yet. Callers that read right
/// after they write depend on this pause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettlePolicy {
    /// Return immediately.
    Immediate,
    /// Sleep for a fixed duration.
    Fixed(Duration),
}

impl Default for SettlePolicy {
    fn default() -> Self {
        SettlePolicy::Fixed(Duration::from_secs(2))
    }
}

impl SettlePolicy {
    /// Non-positive values disable the pause.
    pub fn from_secs_f64(seconds: f64) -> Result<Self> {
        if seconds <= 0.0 {
            return Ok(SettlePolicy::Immediate);
        }
        Duration::try_from_secs_f64(seconds)
            .map(SettlePolicy::Fixed)
            .map_err(|_| Error::Config("settle_seconds out of range".to_string()))
    }

    pub fn duration(&self) -> Duration {
        match self {
            SettlePolicy::Immediate => Duration::ZERO,
            SettlePolicy::Fixed(duration) => *duration,
        }
    }

    pub(crate) async fn settle(&self) {
        if let SettlePolicy::Fixed(duration) = self {
            debug!(?duration, "pausing to let the index update");
            tokio::time::sleep(*duration).await;
        }
    }
}
