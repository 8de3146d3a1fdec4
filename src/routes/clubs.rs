use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::club::{ClubSummary, CreateClubRequest},
    error::{AppError, ErrorBody},
    routes::ApiJson,
    services::club_service,
    state::SharedState,
};

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/api/clubs", get(list_clubs).post(create_club))
        .route("/api/clubs/{id}", delete(delete_club))
}

/// List clubs ordered by name.
#[utoipa::path(
    get,
    path = "/api/clubs",
    tag = "clubs",
    responses((status = 200, description = "Clubs ordered by name", body = [ClubSummary]))
)]
pub async fn list_clubs(
    State(state): State<SharedState>,
) -> Result<Json<Vec<ClubSummary>>, AppError> {
    Ok(Json(club_service::list_clubs(&state).await?))
}

#[utoipa::path(
    post,
    path = "/api/clubs",
    tag = "clubs",
    request_body = CreateClubRequest,
    responses(
        (status = 201, description = "Club created", body = ClubSummary),
        (status = 400, description = "Invalid payload", body = ErrorBody)
    )
)]
pub async fn create_club(
    State(state): State<SharedState>,
    ApiJson(payload): ApiJson<CreateClubRequest>,
) -> Result<(StatusCode, Json<ClubSummary>), AppError> {
    payload.validate()?;
    let created = club_service::create_club(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    delete,
    path = "/api/clubs/{id}",
    tag = "clubs",
    params(("id" = Uuid, Path, description = "Club identifier")),
    responses(
        (status = 204, description = "Club deleted"),
        (status = 404, description = "Unknown club", body = ErrorBody)
    )
)]
pub async fn delete_club(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    club_service::delete_club(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
