//! Periodic fetch trigger with cooperative cancellation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::error;

/// A unit of work the ticker drives once per tick.
#[async_trait]
pub trait CycleTask: Send + Sync {
    async fn run_cycle(&self) -> anyhow::Result<()>;
}

/// Interval-based trigger. The first cycle fires immediately on `run`;
/// subsequent cycles fire once per period until the stop handle is used.
///
/// Each cycle runs to completion before the next tick is polled; there is no
/// overlap guard, so cycle duration is assumed to be far below the period.
pub struct FetchTicker {
    period: Duration,
    cancel_tx: watch::Sender<bool>,
    cancel_rx: watch::Receiver<bool>,
}

impl FetchTicker {
    /// Ticker at `interval` minutes, or seconds when `debug` is set so tests
    /// and manual runs do not wait an hour.
    pub fn new(interval: u64, debug: bool) -> Self {
        let unit = if debug {
            Duration::from_secs(1)
        } else {
            Duration::from_secs(60)
        };
        let (cancel_tx, cancel_rx) = watch::channel(false);
        Self {
            period: unit * interval as u32,
            cancel_tx,
            cancel_rx,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Handle for stopping the ticker from another task. Safe to trigger
    /// more than once.
    pub fn stopper(&self) -> TickerStop {
        TickerStop(self.cancel_tx.clone())
    }

    /// Drive `task` until stopped. A failed cycle is logged and the loop
    /// carries on; the next tick retries from scratch.
    pub async fn run(mut self, task: Arc<dyn CycleTask>) {
        let mut timer = tokio::time::interval(self.period);
        loop {
            tokio::select! {
                _ = timer.tick() => {
                    if let Err(e) = task.run_cycle().await {
                        error!("fetch cycle failed: {e:#}");
                    }
                }
                _ = self.cancel_rx.changed() => break,
            }
        }
    }
}

/// Stop signal for a [`FetchTicker`].
#[derive(Clone)]
pub struct TickerStop(watch::Sender<bool>);

impl TickerStop {
    pub fn stop(&self) {
        let _ = self.0.send(true);
    }
}
