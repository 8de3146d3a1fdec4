use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::{
        matches::{CreateMatchRequest, MatchSummary, RecordResultRequest},
        prediction::PredictionSummary,
    },
    error::{AppError, ErrorBody},
    routes::ApiJson,
    services::match_service,
    state::SharedState,
};

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/api/matches", get(list_matches).post(create_match))
        .route("/api/matches/{id}", get(get_match).delete(delete_match))
        .route("/api/matches/{id}/result", patch(record_result))
        .route("/api/matches/{id}/predictions", get(list_predictions))
}

/// List all matches ordered by kickoff with up-to-date statuses.
#[utoipa::path(
    get,
    path = "/api/matches",
    tag = "matches",
    responses(
        (status = 200, description = "Matches ordered by kickoff", body = [MatchSummary]),
        (status = 503, description = "Storage unavailable", body = ErrorBody)
    )
)]
pub async fn list_matches(
    State(state): State<SharedState>,
) -> Result<Json<Vec<MatchSummary>>, AppError> {
    Ok(Json(match_service::list_matches(&state).await?))
}

/// Schedule a match between two clubs.
#[utoipa::path(
    post,
    path = "/api/matches",
    tag = "matches",
    request_body = CreateMatchRequest,
    responses(
        (status = 201, description = "Match created", body = MatchSummary),
        (status = 400, description = "Invalid payload", body = ErrorBody)
    )
)]
pub async fn create_match(
    State(state): State<SharedState>,
    ApiJson(payload): ApiJson<CreateMatchRequest>,
) -> Result<(StatusCode, Json<MatchSummary>), AppError> {
    payload.validate()?;
    let created = match_service::create_match(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/api/matches/{id}",
    tag = "matches",
    params(("id" = Uuid, Path, description = "Match identifier")),
    responses(
        (status = 200, description = "Match", body = MatchSummary),
        (status = 404, description = "Unknown match", body = ErrorBody)
    )
)]
pub async fn get_match(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MatchSummary>, AppError> {
    Ok(Json(match_service::get_match(&state, id).await?))
}

#[utoipa::path(
    delete,
    path = "/api/matches/{id}",
    tag = "matches",
    params(("id" = Uuid, Path, description = "Match identifier")),
    responses(
        (status = 204, description = "Match deleted"),
        (status = 404, description = "Unknown match", body = ErrorBody)
    )
)]
pub async fn delete_match(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    match_service::delete_match(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Enter the score of a match that already kicked off; `finish` closes it right away.
#[utoipa::path(
    patch,
    path = "/api/matches/{id}/result",
    tag = "matches",
    params(("id" = Uuid, Path, description = "Match identifier")),
    request_body = RecordResultRequest,
    responses(
        (status = 200, description = "Result stored", body = MatchSummary),
        (status = 400, description = "Missing score", body = ErrorBody),
        (status = 403, description = "Match has not kicked off", body = ErrorBody),
        (status = 404, description = "Unknown match", body = ErrorBody)
    )
)]
pub async fn record_result(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    ApiJson(payload): ApiJson<RecordResultRequest>,
) -> Result<Json<MatchSummary>, AppError> {
    Ok(Json(match_service::record_result(&state, id, payload).await?))
}

#[utoipa::path(
    get,
    path = "/api/matches/{id}/predictions",
    tag = "matches",
    params(("id" = Uuid, Path, description = "Match identifier")),
    responses(
        (status = 200, description = "Predictions for the match", body = [PredictionSummary]),
        (status = 404, description = "Unknown match", body = ErrorBody)
    )
)]
pub async fn list_predictions(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<PredictionSummary>>, AppError> {
    Ok(Json(match_service::list_predictions(&state, id).await?))
}
