//! Club reference data.

use tracing::info;
use uuid::Uuid;

use crate::{
    dao::models::ClubEntity,
    dto::club::{ClubSummary, CreateClubRequest},
    error::ServiceError,
    state::SharedState,
};

pub async fn list_clubs(state: &SharedState) -> Result<Vec<ClubSummary>, ServiceError> {
    let store = state.require_tipping_store().await?;
    let clubs = store.list_clubs().await?;
    Ok(clubs.into_iter().map(Into::into).collect())
}

pub async fn create_club(
    state: &SharedState,
    request: CreateClubRequest,
) -> Result<ClubSummary, ServiceError> {
    let store = state.require_tipping_store().await?;
    let club = ClubEntity {
        id: Uuid::new_v4(),
        name: request.name.trim().to_owned(),
    };
    store.insert_club(club.clone()).await?;

    info!(club_id = %club.id, name = %club.name, "club created");
    Ok(club.into())
}

pub async fn delete_club(state: &SharedState, id: Uuid) -> Result<(), ServiceError> {
    let store = state.require_tipping_store().await?;
    if !store.delete_club(id).await? {
        return Err(ServiceError::NotFound(format!("club `{id}` not found")));
    }
    Ok(())
}
