use axum::{Json, Router, extract::State, routing::post};

use crate::{
    dto::prediction::{PredictionSummary, SubmitPredictionRequest},
    error::{AppError, ErrorBody},
    routes::ApiJson,
    services::prediction_service,
    state::SharedState,
};

pub fn router() -> Router<SharedState> {
    Router::new().route("/api/predictions", post(submit_prediction))
}

/// Create or replace a tipper's prediction while the match is still planned.
#[utoipa::path(
    post,
    path = "/api/predictions",
    tag = "predictions",
    request_body = SubmitPredictionRequest,
    responses(
        (status = 200, description = "Prediction stored", body = PredictionSummary),
        (status = 400, description = "Incomplete data", body = ErrorBody),
        (status = 403, description = "Not a tipper or predictions closed", body = ErrorBody),
        (status = 404, description = "Unknown user or match", body = ErrorBody),
        (status = 503, description = "Storage unavailable", body = ErrorBody)
    )
)]
pub async fn submit_prediction(
    State(state): State<SharedState>,
    ApiJson(payload): ApiJson<SubmitPredictionRequest>,
) -> Result<Json<PredictionSummary>, AppError> {
    Ok(Json(
        prediction_service::submit_prediction(&state, payload).await?,
    ))
}
