//! Periodic reconciliation task with an explicit stop signal.

use std::time::Duration;

use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{MissedTickBehavior, interval},
};
use tracing::{info, warn};

use crate::{services::reconciler, state::SharedState};

/// Drives [`reconciler::reconcile`] on a fixed period.
pub struct ReconcileScheduler {
    state: SharedState,
    period: Duration,
}

/// Handle to a running scheduler; dropping it without [`SchedulerHandle::shutdown`] also
/// stops the loop at its next wake-up.
pub struct SchedulerHandle {
    stop: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl ReconcileScheduler {
    /// Create a scheduler ticking every `period`.
    pub fn new(state: SharedState, period: Duration) -> Self {
        Self { state, period }
    }

    /// Run a single reconciliation pass against the state's clock.
    ///
    /// Returns `None` when the pass failed; the failure is logged and the next tick retries.
    pub async fn tick(&self) -> Option<u64> {
        let now = self.state.now();
        match reconciler::reconcile(&self.state, now).await {
            Ok(count) => Some(count),
            Err(err) => {
                warn!(error = %err, "scheduled reconciliation failed; retrying next tick");
                None
            }
        }
    }

    /// Spawn the loop onto the runtime. The first pass runs immediately.
    pub fn spawn(self) -> SchedulerHandle {
        let (stop, mut stop_rx) = watch::channel(false);
        let task = tokio::spawn(async move {
            let mut ticker = interval(self.period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            info!(period_secs = self.period.as_secs_f64(), "reconciliation scheduler started");

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        self.tick().await;
                    }
                    changed = stop_rx.changed() => {
                        if changed.is_err() || *stop_rx.borrow() {
                            break;
                        }
                    }
                }
            }

            info!("reconciliation scheduler stopped");
        });

        SchedulerHandle { stop, task }
    }
}

impl SchedulerHandle {
    /// Signal the loop to stop and wait for it to exit.
    pub async fn shutdown(self) {
        let _ = self.stop.send(true);
        if let Err(err) = self.task.await {
            warn!(error = %err, "reconciliation scheduler ended abnormally");
        }
    }
}
