use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::{Interval, MissedTickBehavior};
use tracing::{debug, warn};

use crate::chat::{Change, Chat};
use crate::update::UpdateBatch;

/// Where update batches come from. `Ok(None)` means "no content".
#[async_trait]
pub trait UpdateSource: Send + Sync {
    async fn fetch_updates(&self) -> Result<Option<UpdateBatch>>;
}

/// Fixed-interval driver feeding fetched batches to the reconciler.
pub struct Poller<S> {
    source: S,
    interval: Duration,
}

impl<S: UpdateSource> Poller<S> {
    pub fn new(source: S, interval: Duration) -> Self {
        Self { source, interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Timer for the poll cadence. Ticks missed while a fetch was still
    /// pending are skipped, so cycles never overlap or burst.
    pub fn ticker(&self) -> Interval {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        ticker
    }

    /// One fetch-and-apply cycle. Transport failures are logged and absorbed.
    pub async fn poll_once(&self, chat: &mut Chat) -> Vec<Change> {
        let batch = match self.source.fetch_updates().await {
            Ok(Some(batch)) => batch,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("Polling for updates failed: {:#}", e);
                return Vec::new();
            }
        };

        if batch.is_empty() {
            return Vec::new();
        }

        debug!("Received {} update(s)", batch.len());
        chat.apply_all(batch.into_updates())
    }
}
