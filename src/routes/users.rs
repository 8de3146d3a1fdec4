use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::{
        prediction::PredictionSummary,
        user::{CreateUserRequest, UserSummary},
    },
    error::{AppError, ErrorBody},
    routes::ApiJson,
    services::user_service,
    state::SharedState,
};

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/api/users", post(create_user))
        .route("/api/users/{id}", get(get_user))
        .route("/api/users/{id}/predictions", get(list_predictions))
}

#[utoipa::path(
    post,
    path = "/api/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User registered", body = UserSummary),
        (status = 400, description = "Invalid payload", body = ErrorBody)
    )
)]
pub async fn create_user(
    State(state): State<SharedState>,
    ApiJson(payload): ApiJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserSummary>), AppError> {
    payload.validate()?;
    let created = user_service::create_user(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "users",
    params(("id" = Uuid, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User", body = UserSummary),
        (status = 404, description = "Unknown user", body = ErrorBody)
    )
)]
pub async fn get_user(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserSummary>, AppError> {
    Ok(Json(user_service::get_user(&state, id).await?))
}

/// All predictions submitted by one user.
#[utoipa::path(
    get,
    path = "/api/users/{id}/predictions",
    tag = "users",
    params(("id" = Uuid, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Predictions of the user", body = [PredictionSummary]),
        (status = 404, description = "Unknown user", body = ErrorBody)
    )
)]
pub async fn list_predictions(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<PredictionSummary>>, AppError> {
    Ok(Json(user_service::list_predictions(&state, id).await?))
}
