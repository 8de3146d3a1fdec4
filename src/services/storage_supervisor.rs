//! Keeps a storage backend installed in the shared state, flipping degraded mode while it
//! is unreachable.

use std::{future::Future, sync::Arc, time::Duration};

use tokio::time::sleep;
use tracing::{info, warn};

use crate::{
    dao::{storage::StorageError, tipping_store::TippingStore},
    state::SharedState,
};

const INITIAL_DELAY: Duration = Duration::from_millis(1_000);
const MAX_DELAY: Duration = Duration::from_secs(10);
const HEALTH_POLL_INTERVAL: Duration = Duration::from_secs(5);
const MAX_RECONNECT_ATTEMPTS: u32 = 3;

/// Connect with `connect`, then poll the store's health for as long as the process runs.
///
/// A failed health check triggers a bounded number of in-place reconnects; once those are
/// exhausted a fresh connection is built with exponential backoff.
pub async fn run<F, Fut>(state: SharedState, mut connect: F)
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = Result<Arc<dyn TippingStore>, StorageError>> + Send,
{
    let mut delay = INITIAL_DELAY;

    loop {
        match connect().await {
            Ok(store) => {
                state.set_tipping_store(store.clone()).await;
                info!("storage connection established; leaving degraded mode");
                delay = INITIAL_DELAY;

                watch_health(&state, store.as_ref()).await;
                warn!("exhausted storage reconnect attempts; staying in degraded mode");
            }
            Err(err) => warn!(error = %err, "storage connection attempt failed"),
        }

        sleep(delay).await;
        delay = next_delay(delay);
    }
}

/// Poll `store` until it stays unreachable through every reconnect attempt.
async fn watch_health(state: &SharedState, store: &dyn TippingStore) {
    loop {
        if store.health_check().await.is_ok() {
            if state.is_degraded().await {
                info!("storage healthy again; leaving degraded mode");
                state.update_degraded(false).await;
            }
        } else if reconnect(state, store).await {
            state.update_degraded(false).await;
        } else {
            return;
        }
        sleep(HEALTH_POLL_INTERVAL).await;
    }
}

async fn reconnect(state: &SharedState, store: &dyn TippingStore) -> bool {
    let mut backoff = INITIAL_DELAY;

    for attempt in 0..MAX_RECONNECT_ATTEMPTS {
        match store.try_reconnect().await {
            Ok(()) => {
                info!(attempt, "storage reconnection succeeded after health check failure");
                return true;
            }
            Err(err) => {
                if attempt == 0 {
                    warn!(attempt, error = %err, "storage reconnect failed; entering degraded mode");
                    state.update_degraded(true).await;
                } else {
                    warn!(attempt, error = %err, "storage reconnect attempt failed");
                }
                sleep(backoff).await;
                backoff = next_delay(backoff);
            }
        }
    }
    false
}

fn next_delay(delay: Duration) -> Duration {
    (delay * 2).min(MAX_DELAY)
}
