use tracing::info;
use uuid::Uuid;

use crate::{
    dao::models::UserEntity,
    dto::{
        prediction::PredictionSummary,
        user::{CreateUserRequest, UserSummary},
    },
    error::ServiceError,
    state::SharedState,
};

pub async fn create_user(
    state: &SharedState,
    request: CreateUserRequest,
) -> Result<UserSummary, ServiceError> {
    let store = state.require_tipping_store().await?;
    let user = UserEntity {
        id: Uuid::new_v4(),
        name: request.name.trim().to_owned(),
        role: request.role,
    };
    store.insert_user(user.clone()).await?;

    info!(user_id = %user.id, role = user.role.as_str(), "user registered");
    Ok(user.into())
}

pub async fn get_user(state: &SharedState, id: Uuid) -> Result<UserSummary, ServiceError> {
    let store = state.require_tipping_store().await?;
    store
        .find_user(id)
        .await?
        .map(Into::into)
        .ok_or_else(|| user_not_found(id))
}

/// Every prediction a user submitted, oldest first.
pub async fn list_predictions(
    state: &SharedState,
    id: Uuid,
) -> Result<Vec<PredictionSummary>, ServiceError> {
    let store = state.require_tipping_store().await?;
    if store.find_user(id).await?.is_none() {
        return Err(user_not_found(id));
    }

    let predictions = store.list_predictions_for_user(id).await?;
    Ok(predictions.into_iter().map(Into::into).collect())
}

pub(crate) fn user_not_found(id: Uuid) -> ServiceError {
    ServiceError::NotFound(format!("user `{id}` not found"))
}
