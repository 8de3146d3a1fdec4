mod common;

use std::{sync::Arc, time::Duration as StdDuration};

use time::Duration;
use tipping_back::{
    clock::ManualClock,
    config::AppConfig,
    dao::models::MatchStatus,
    services::scheduler::ReconcileScheduler,
    state::AppState,
};

use common::{START, harness};

#[tokio::test]
async fn tick_reports_changes() {
    let h = harness().await;
    h.seed_match(START - Duration::minutes(15), MatchStatus::Planned).await;
    let scheduler = ReconcileScheduler::new(h.state.clone(), StdDuration::from_secs(60));

    assert_eq!(scheduler.tick().await, Some(1));
    assert_eq!(scheduler.tick().await, Some(0));
}

#[tokio::test]
async fn tick_swallows_store_failure() {
    let h = harness().await;
    let scheduler = ReconcileScheduler::new(h.state.clone(), StdDuration::from_secs(60));

    h.store.set_offline(true);
    assert_eq!(scheduler.tick().await, None);

    h.store.set_offline(false);
    assert_eq!(scheduler.tick().await, Some(0));
}

#[tokio::test]
async fn tick_without_store_is_skipped() {
    let clock = Arc::new(ManualClock::new(START));
    let state = AppState::new(AppConfig::default(), clock);
    let scheduler = ReconcileScheduler::new(state, StdDuration::from_secs(60));

    assert_eq!(scheduler.tick().await, None);
}

#[tokio::test]
async fn spawned_loop_advances_matches_and_stops() {
    let h = harness().await;
    let id = h.seed_match(START + Duration::minutes(1), MatchStatus::Planned).await;
    let handle = ReconcileScheduler::new(h.state.clone(), StdDuration::from_millis(10)).spawn();

    h.clock.advance(Duration::minutes(30));
    let mut finished = false;
    for _ in 0..200 {
        if h.status_of(id).await == MatchStatus::Finished {
            finished = true;
            break;
        }
        tokio::time::sleep(StdDuration::from_millis(10)).await;
    }
    assert!(finished, "scheduler never finished the match");

    handle.shutdown().await;

    // Nothing runs after shutdown.
    let late = h.seed_match(START, MatchStatus::Planned).await;
    tokio::time::sleep(StdDuration::from_millis(50)).await;
    assert_eq!(h.status_of(late).await, MatchStatus::Planned);
}
