//! Poller - fixed-cadence refresh ticks with a single stop signal

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// One request for a refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollTick;

/// Emits a tick immediately, then once per period, until stopped.
///
/// Ticks are not held back while a previous refresh is still in flight.
pub struct Poller {
    period: Duration,
    tick_tx: mpsc::UnboundedSender<PollTick>,
}

/// Owning handle for a running poller. Dropping it also stops the poller.
pub struct PollerHandle {
    stop_tx: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl Poller {
    pub fn new(period: Duration, tick_tx: mpsc::UnboundedSender<PollTick>) -> Self {
        Poller { period, tick_tx }
    }

    pub fn spawn(self) -> PollerHandle {
        let (stop_tx, stop_rx) = oneshot::channel();
        let task = tokio::spawn(self.run(stop_rx));
        PollerHandle { stop_tx, task }
    }

    async fn run(self, mut stop_rx: oneshot::Receiver<()>) {
        let mut interval = tokio::time::interval(self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tracing::info!(period_ms = self.period.as_millis() as u64, "Poller started");

        loop {
            tokio::select! {
                biased;

                // Explicit stop, or the handle was dropped
                _ = &mut stop_rx => break,

                _ = interval.tick() => {
                    if self.tick_tx.send(PollTick).is_err() {
                        break;
                    }
                }
            }
        }

        tracing::info!("Poller stopped");
    }
}

impl PollerHandle {
    /// Stop the timer and wait until it can no longer emit ticks
    pub async fn stop(self) {
        let PollerHandle { stop_tx, task } = self;
        let _ = stop_tx.send(());
        let _ = task.await;
    }
}
