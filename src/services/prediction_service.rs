//! Prediction submission guard.

use tracing::debug;

use crate::{
    dao::models::{PredictionEntity, UserRole},
    dto::prediction::{PredictionSummary, SubmitPredictionRequest},
    error::ServiceError,
    services::{match_service::match_not_found, user_service::user_not_found},
    state::{SharedState, lifecycle},
};

/// Create or overwrite a tipper's prediction for a match that has not kicked off.
///
/// Checks run in a fixed order and stop at the first failure: complete input, known user,
/// tipper role, known match, predictions still open. Nothing is written unless all pass.
pub async fn submit_prediction(
    state: &SharedState,
    request: SubmitPredictionRequest,
) -> Result<PredictionSummary, ServiceError> {
    let SubmitPredictionRequest {
        user_id: Some(user_id),
        match_id: Some(match_id),
        predicted_home_score: Some(predicted_home_score),
        predicted_away_score: Some(predicted_away_score),
    } = request
    else {
        return Err(ServiceError::InvalidInput("incomplete data".into()));
    };

    let store = state.require_tipping_store().await?;

    let user = store
        .find_user(user_id)
        .await?
        .ok_or_else(|| user_not_found(user_id))?;
    if user.role != UserRole::Tipper {
        return Err(ServiceError::Forbidden("only tippers may predict".into()));
    }

    let entity = store
        .find_match(match_id)
        .await?
        .ok_or_else(|| match_not_found(match_id))?;
    let now = state.now();
    if !lifecycle::accepts_predictions(entity.status, entity.kickoff, now) {
        return Err(ServiceError::Forbidden("predictions closed".into()));
    }

    let stored = store
        .upsert_prediction(PredictionEntity {
            user_id,
            match_id,
            predicted_home_score,
            predicted_away_score,
            created_at: now,
            updated_at: now,
        })
        .await?;

    debug!(%user_id, %match_id, predicted_home_score, predicted_away_score, "prediction stored");
    Ok(stored.into())
}
