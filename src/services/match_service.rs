//! Match scheduling, listing and result entry.

use tracing::info;
use uuid::Uuid;

use crate::{
    dao::models::{MatchEntity, ResultUpdate},
    dto::{
        matches::{CreateMatchRequest, MatchSummary, RecordResultRequest},
        prediction::PredictionSummary,
    },
    error::ServiceError,
    services::reconciler,
    state::{SharedState, lifecycle},
};

/// List every match ordered by kickoff, reconciling statuses first.
pub async fn list_matches(state: &SharedState) -> Result<Vec<MatchSummary>, ServiceError> {
    reconciler::reconcile_before_read(state).await;

    let store = state.require_tipping_store().await?;
    let matches = store.list_matches().await?;
    Ok(matches.into_iter().map(Into::into).collect())
}

/// Fetch a single match, reconciling statuses first.
pub async fn get_match(state: &SharedState, id: Uuid) -> Result<MatchSummary, ServiceError> {
    reconciler::reconcile_before_read(state).await;

    let store = state.require_tipping_store().await?;
    store
        .find_match(id)
        .await?
        .map(Into::into)
        .ok_or_else(|| match_not_found(id))
}

/// Schedule a match. Its initial status follows the timer for the given kickoff.
pub async fn create_match(
    state: &SharedState,
    request: CreateMatchRequest,
) -> Result<MatchSummary, ServiceError> {
    let store = state.require_tipping_store().await?;

    let status = state.config().timing.status_at(request.kickoff, state.now());
    let entity = MatchEntity {
        id: Uuid::new_v4(),
        kickoff: request.kickoff,
        home_club_id: request.home_club_id,
        away_club_id: request.away_club_id,
        home_score: None,
        away_score: None,
        status,
    };
    store.insert_match(entity.clone()).await?;

    info!(match_id = %entity.id, kickoff = %entity.kickoff, status = status.as_str(), "match created");
    Ok(entity.into())
}

pub async fn delete_match(state: &SharedState, id: Uuid) -> Result<(), ServiceError> {
    let store = state.require_tipping_store().await?;
    if !store.delete_match(id).await? {
        return Err(match_not_found(id));
    }
    info!(match_id = %id, "match deleted");
    Ok(())
}

/// Record the score of a match that already kicked off, optionally closing it.
///
/// Planned matches are refused: a result can neither be stored nor force the match past
/// the states it has not reached by the timer.
pub async fn record_result(
    state: &SharedState,
    id: Uuid,
    request: RecordResultRequest,
) -> Result<MatchSummary, ServiceError> {
    let (Some(home_score), Some(away_score)) = (request.home_score, request.away_score) else {
        return Err(ServiceError::InvalidInput(
            "home_score and away_score are required".into(),
        ));
    };

    // A match past kickoff must not be refused just because no tick flipped it yet.
    reconciler::reconcile(state, state.now()).await?;

    let store = state.require_tipping_store().await?;
    let current = store
        .find_match(id)
        .await?
        .ok_or_else(|| match_not_found(id))?;
    lifecycle::status_after_result(current.status, request.finish)?;

    let update = ResultUpdate {
        home_score,
        away_score,
        finish: request.finish,
    };
    // The store re-checks that the match left `planned`; it never moves status backwards,
    // so `None` here means the match vanished in between.
    let updated = store
        .record_result(id, update)
        .await?
        .ok_or_else(|| match_not_found(id))?;

    info!(
        match_id = %id,
        home_score,
        away_score,
        status = updated.status.as_str(),
        "result recorded"
    );
    Ok(updated.into())
}

/// Every prediction submitted for a match.
pub async fn list_predictions(
    state: &SharedState,
    id: Uuid,
) -> Result<Vec<PredictionSummary>, ServiceError> {
    let store = state.require_tipping_store().await?;
    if store.find_match(id).await?.is_none() {
        return Err(match_not_found(id));
    }

    let predictions = store.list_predictions_for_match(id).await?;
    Ok(predictions.into_iter().map(Into::into).collect())
}

pub(crate) fn match_not_found(id: Uuid) -> ServiceError {
    ServiceError::NotFound(format!("match `{id}` not found"))
}
