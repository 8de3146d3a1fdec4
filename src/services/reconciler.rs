//! Batch status reconciliation: advances every eligible match in one pass per transition.

use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::{error::ServiceError, state::SharedState};

/// Advance match statuses for `now` and return how many matches changed.
///
/// Each transition is one conditional batch update keyed on the current status, so running
/// this twice for the same `now`, or concurrently from several callers, changes nothing
/// further. Partial progress stays committed when a later step fails.
pub async fn reconcile(state: &SharedState, now: OffsetDateTime) -> Result<u64, ServiceError> {
    let store = state.require_tipping_store().await?;
    let timing = state.config().timing;

    let mut transitioned = 0;
    for step in timing.steps(now) {
        let changed = store
            .transition_matches(step.from, step.to, step.kicked_off_by)
            .await?;
        if changed > 0 {
            info!(
                count = changed,
                from = step.from.as_str(),
                to = step.to.as_str(),
                "advanced match status"
            );
        }
        transitioned += changed;
    }

    Ok(transitioned)
}

/// Bring statuses up to date before serving a read.
///
/// Debounced through the state's read gate; failures are logged and never reach the reader.
pub async fn reconcile_before_read(state: &SharedState) {
    let now = state.now();
    if !state.read_debounce().try_acquire(now) {
        debug!("skipping read-triggered reconciliation; recent pass still fresh");
        return;
    }

    if let Err(err) = reconcile(state, now).await {
        state.read_debounce().reset();
        warn!(error = %err, "read-triggered reconciliation failed; serving stored status");
    }
}
