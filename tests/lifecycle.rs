mod common;

use time::Duration;
use tipping_back::{
    dao::models::MatchStatus,
    dto::matches::{CreateMatchRequest, RecordResultRequest},
    error::ServiceError,
    services::{match_service, reconciler},
};
use uuid::Uuid;

use common::{START, harness};

#[tokio::test]
async fn match_fifteen_minutes_in_is_live() {
    let h = harness().await;
    let id = h.seed_match(START - Duration::minutes(15), MatchStatus::Planned).await;

    let changed = reconciler::reconcile(&h.state, START).await.unwrap();

    assert_eq!(changed, 1);
    assert_eq!(h.status_of(id).await, MatchStatus::Live);
}

#[tokio::test]
async fn match_twenty_five_minutes_in_is_finished_in_one_pass() {
    let h = harness().await;
    let id = h.seed_match(START - Duration::minutes(25), MatchStatus::Planned).await;

    let changed = reconciler::reconcile(&h.state, START).await.unwrap();

    assert_eq!(changed, 2);
    assert_eq!(h.status_of(id).await, MatchStatus::Finished);
}

#[tokio::test]
async fn boundaries_are_inclusive() {
    let h = harness().await;
    let kicking_off = h.seed_match(START, MatchStatus::Planned).await;
    let full_time = h.seed_match(START - Duration::minutes(20), MatchStatus::Live).await;
    let future = h.seed_match(START + Duration::seconds(1), MatchStatus::Planned).await;

    reconciler::reconcile(&h.state, START).await.unwrap();

    assert_eq!(h.status_of(kicking_off).await, MatchStatus::Live);
    assert_eq!(h.status_of(full_time).await, MatchStatus::Finished);
    assert_eq!(h.status_of(future).await, MatchStatus::Planned);
}

#[tokio::test]
async fn reconcile_is_idempotent() {
    let h = harness().await;
    h.seed_match(START - Duration::minutes(5), MatchStatus::Planned).await;
    h.seed_match(START - Duration::minutes(40), MatchStatus::Live).await;

    assert_eq!(reconciler::reconcile(&h.state, START).await.unwrap(), 2);
    assert_eq!(reconciler::reconcile(&h.state, START).await.unwrap(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn overlapping_passes_transition_each_match_once() {
    let h = harness().await;
    let mut live = Vec::new();
    let mut finished = Vec::new();
    for n in 0..50 {
        if n < 30 {
            let kickoff = START - Duration::minutes(30 + n);
            finished.push(h.seed_match(kickoff, MatchStatus::Planned).await);
        } else {
            let kickoff = START - Duration::minutes(n - 30);
            live.push(h.seed_match(kickoff, MatchStatus::Planned).await);
        }
    }

    let passes: Vec<_> = (0..8)
        .map(|_| {
            let state = h.state.clone();
            tokio::spawn(async move { reconciler::reconcile(&state, START).await })
        })
        .collect();
    let mut total = 0;
    for pass in passes {
        total += pass.await.unwrap().unwrap();
    }

    // Planned to live for all 50, then live to finished for the 30 past full time.
    assert_eq!(total, 80);
    for id in live {
        assert_eq!(h.status_of(id).await, MatchStatus::Live);
    }
    for id in finished {
        assert_eq!(h.status_of(id).await, MatchStatus::Finished);
    }
}

#[tokio::test]
async fn status_never_regresses_as_time_moves_on() {
    let h = harness().await;
    let id = h.seed_match(START + Duration::minutes(5), MatchStatus::Planned).await;

    let mut seen = Vec::new();
    for minute in (0..=40).step_by(5) {
        let now = START + Duration::minutes(minute);
        reconciler::reconcile(&h.state, now).await.unwrap();
        seen.push(h.status_of(id).await);
    }

    assert!(seen.windows(2).all(|pair| pair[0] <= pair[1]));
    assert_eq!(seen.first(), Some(&MatchStatus::Planned));
    assert_eq!(seen.last(), Some(&MatchStatus::Finished));
}

#[tokio::test]
async fn finished_match_with_future_kickoff_stays_finished() {
    let h = harness().await;
    let id = h.seed_match(START + Duration::hours(1), MatchStatus::Finished).await;

    reconciler::reconcile(&h.state, START).await.unwrap();

    assert_eq!(h.status_of(id).await, MatchStatus::Finished);
}

#[tokio::test]
async fn listing_reconciles_first() {
    let h = harness().await;
    let id = h.seed_match(START + Duration::minutes(1), MatchStatus::Planned).await;

    h.clock.advance(Duration::minutes(2));
    let listed = match_service::list_matches(&h.state).await.unwrap();

    let summary = listed.iter().find(|m| m.id == id).unwrap();
    assert_eq!(summary.status, MatchStatus::Live);
}

#[tokio::test]
async fn listing_survives_store_failure() {
    let h = harness().await;
    h.seed_match(START - Duration::minutes(1), MatchStatus::Planned).await;

    h.store.set_offline(true);
    // The read itself fails, but the reconciliation failure does not mask it.
    let err = match_service::list_matches(&h.state).await.unwrap_err();
    assert!(matches!(err, ServiceError::Unavailable(_)));

    h.store.set_offline(false);
    let listed = match_service::list_matches(&h.state).await.unwrap();
    assert_eq!(listed[0].status, MatchStatus::Live);
}

#[tokio::test]
async fn matches_are_listed_by_kickoff() {
    let h = harness().await;
    let late = h.seed_match(START + Duration::hours(2), MatchStatus::Planned).await;
    let early = h.seed_match(START + Duration::hours(1), MatchStatus::Planned).await;

    let listed = match_service::list_matches(&h.state).await.unwrap();

    let ids: Vec<Uuid> = listed.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![early, late]);
}

#[tokio::test]
async fn created_match_status_follows_kickoff() {
    let h = harness().await;

    let upcoming = match_service::create_match(
        &h.state,
        CreateMatchRequest {
            kickoff: START + Duration::hours(1),
            home_club_id: Uuid::new_v4(),
            away_club_id: Uuid::new_v4(),
        },
    )
    .await
    .unwrap();
    let underway = match_service::create_match(
        &h.state,
        CreateMatchRequest {
            kickoff: START - Duration::minutes(15),
            home_club_id: Uuid::new_v4(),
            away_club_id: Uuid::new_v4(),
        },
    )
    .await
    .unwrap();

    assert_eq!(upcoming.status, MatchStatus::Planned);
    assert_eq!(underway.status, MatchStatus::Live);
}

#[tokio::test]
async fn final_result_finishes_live_match() {
    let h = harness().await;
    let id = h.seed_match(START - Duration::minutes(5), MatchStatus::Live).await;

    let summary = match_service::record_result(
        &h.state,
        id,
        RecordResultRequest {
            home_score: Some(2),
            away_score: Some(1),
            finish: true,
        },
    )
    .await
    .unwrap();

    assert_eq!(summary.status, MatchStatus::Finished);
    assert_eq!((summary.home_score, summary.away_score), (Some(2), Some(1)));
}

#[tokio::test]
async fn intermediate_result_keeps_match_live() {
    let h = harness().await;
    let id = h.seed_match(START - Duration::minutes(5), MatchStatus::Live).await;

    let summary = match_service::record_result(
        &h.state,
        id,
        RecordResultRequest {
            home_score: Some(0),
            away_score: Some(0),
            finish: false,
        },
    )
    .await
    .unwrap();

    assert_eq!(summary.status, MatchStatus::Live);
}

#[tokio::test]
async fn result_on_planned_match_is_refused() {
    let h = harness().await;
    let id = h.seed_match(START + Duration::hours(1), MatchStatus::Planned).await;

    let err = match_service::record_result(
        &h.state,
        id,
        RecordResultRequest {
            home_score: Some(1),
            away_score: Some(0),
            finish: true,
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ServiceError::Forbidden(_)));
    let stored = h.store_match(id).await;
    assert_eq!(stored.status, MatchStatus::Planned);
    assert_eq!(stored.home_score, None);
}

#[tokio::test]
async fn result_entry_catches_up_with_kickoff() {
    let h = harness().await;
    // Stored as planned although kickoff already passed: no tick ran yet.
    let id = h.seed_match(START - Duration::minutes(1), MatchStatus::Planned).await;

    let summary = match_service::record_result(
        &h.state,
        id,
        RecordResultRequest {
            home_score: Some(1),
            away_score: Some(1),
            finish: false,
        },
    )
    .await
    .unwrap();

    assert_eq!(summary.status, MatchStatus::Live);
}

#[tokio::test]
async fn result_requires_both_scores() {
    let h = harness().await;
    let id = h.seed_match(START - Duration::minutes(5), MatchStatus::Live).await;

    let err = match_service::record_result(
        &h.state,
        id,
        RecordResultRequest {
            home_score: Some(1),
            away_score: None,
            finish: true,
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ServiceError::InvalidInput(_)));
}

#[tokio::test]
async fn unknown_match_is_not_found() {
    let h = harness().await;

    let err = match_service::get_match(&h.state, Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));

    let err = match_service::delete_match(&h.state, Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}
