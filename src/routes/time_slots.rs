use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
};
use uuid::Uuid;

use crate::{
    dto::time_slot::{CreateTimeSlotRequest, TimeSlotSummary},
    error::{AppError, ErrorBody},
    routes::ApiJson,
    services::time_slot_service,
    state::SharedState,
};

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/api/time-slots", get(list_time_slots).post(create_time_slot))
        .route("/api/time-slots/{id}", delete(delete_time_slot))
}

/// List kickoff slots in chronological order.
#[utoipa::path(
    get,
    path = "/api/time-slots",
    tag = "time-slots",
    responses((status = 200, description = "Slots ordered by start", body = [TimeSlotSummary]))
)]
pub async fn list_time_slots(
    State(state): State<SharedState>,
) -> Result<Json<Vec<TimeSlotSummary>>, AppError> {
    Ok(Json(time_slot_service::list_time_slots(&state).await?))
}

#[utoipa::path(
    post,
    path = "/api/time-slots",
    tag = "time-slots",
    request_body = CreateTimeSlotRequest,
    responses(
        (status = 201, description = "Slot created", body = TimeSlotSummary),
        (status = 400, description = "Missing start time", body = ErrorBody)
    )
)]
pub async fn create_time_slot(
    State(state): State<SharedState>,
    ApiJson(payload): ApiJson<CreateTimeSlotRequest>,
) -> Result<(StatusCode, Json<TimeSlotSummary>), AppError> {
    let created = time_slot_service::create_time_slot(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    delete,
    path = "/api/time-slots/{id}",
    tag = "time-slots",
    params(("id" = Uuid, Path, description = "Time slot identifier")),
    responses(
        (status = 204, description = "Slot deleted"),
        (status = 404, description = "Unknown slot", body = ErrorBody)
    )
)]
pub async fn delete_time_slot(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    time_slot_service::delete_time_slot(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
