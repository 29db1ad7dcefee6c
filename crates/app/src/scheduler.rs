//! Tick scheduler — the single background task that drives evaluation.
//!
//! Every `interval` the task reads the [`Clock`], locks the controller and
//! calls [`Controller::tick`]. Missed ticks are skipped, never replayed in a
//! burst. The lock is released before the next await.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::{JoinError, JoinHandle};
use tokio::time::MissedTickBehavior;

use crate::area_registry::TickReport;
use crate::controller::Controller;
use crate::ports::Clock;

/// Periodically delivers ticks to a shared [`Controller`].
pub struct TickScheduler {
    controller: Arc<Mutex<Controller>>,
    clock: Arc<dyn Clock>,
    interval: Duration,
    shutdown: watch::Receiver<bool>,
}

impl TickScheduler {
    /// Spawn the tick loop on the current tokio runtime.
    #[must_use]
    pub fn start(
        controller: Arc<Mutex<Controller>>,
        clock: Arc<dyn Clock>,
        interval: Duration,
    ) -> SchedulerHandle {
        let (shutdown_tx, shutdown) = watch::channel(false);
        let scheduler = Self {
            controller,
            clock,
            interval,
            shutdown,
        };
        tracing::info!(
            interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX),
            "tick scheduler started"
        );
        SchedulerHandle {
            shutdown: shutdown_tx,
            task: tokio::spawn(scheduler.run()),
        }
    }

    /// Tick until shutdown is requested. Returns the number of ticks run.
    async fn run(mut self) -> u64 {
        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut ticks = 0;
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    self.tick_once();
                    ticks += 1;
                }
                changed = self.shutdown.changed() => {
                    if changed.is_err() || *self.shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        tracing::info!(ticks, "tick scheduler stopped");
        ticks
    }

    fn tick_once(&self) -> TickReport {
        let now = self.clock.now();
        let mut controller = self
            .controller
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let report = controller.tick(now);
        tracing::trace!(%now, evaluated = report.evaluated, failed = report.failed, "tick");
        report
    }
}

/// Owner of a running [`TickScheduler`].
pub struct SchedulerHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<u64>,
}

impl SchedulerHandle {
    /// Signal the loop to stop and wait for it. Returns the number of ticks run.
    ///
    /// # Errors
    ///
    /// Returns the [`JoinError`] when the task panicked or was aborted.
    pub async fn stop(self) -> Result<u64, JoinError> {
        // The receiver may already be gone if the task ended; nothing to signal then.
        let _ = self.shutdown.send(true);
        self.task.await
    }
}
