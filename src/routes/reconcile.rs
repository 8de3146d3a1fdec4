use axum::{Json, Router, extract::State, routing::post};

use crate::{
    dto::reconcile::ReconcileResponse,
    error::{AppError, ErrorBody},
    services::reconciler,
    state::SharedState,
};

pub fn router() -> Router<SharedState> {
    Router::new().route("/api/reconcile", post(reconcile_now))
}

/// Run one reconciliation pass immediately instead of waiting for the next tick.
#[utoipa::path(
    post,
    path = "/api/reconcile",
    tag = "matches",
    responses(
        (status = 200, description = "Number of matches whose status changed", body = ReconcileResponse),
        (status = 503, description = "Storage unavailable", body = ErrorBody)
    )
)]
pub async fn reconcile_now(
    State(state): State<SharedState>,
) -> Result<Json<ReconcileResponse>, AppError> {
    let transitioned = reconciler::reconcile(&state, state.now()).await?;
    Ok(Json(ReconcileResponse { transitioned }))
}
