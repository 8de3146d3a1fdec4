//! Reusable kickoff slots.

use tracing::info;
use uuid::Uuid;

use crate::{
    dao::models::TimeSlotEntity,
    dto::time_slot::{CreateTimeSlotRequest, TimeSlotSummary},
    error::ServiceError,
    state::SharedState,
};

pub async fn list_time_slots(state: &SharedState) -> Result<Vec<TimeSlotSummary>, ServiceError> {
    let store = state.require_tipping_store().await?;
    let slots = store.list_time_slots().await?;
    Ok(slots.into_iter().map(Into::into).collect())
}

pub async fn create_time_slot(
    state: &SharedState,
    request: CreateTimeSlotRequest,
) -> Result<TimeSlotSummary, ServiceError> {
    let starts_at = request
        .starts_at
        .ok_or_else(|| ServiceError::InvalidInput("starts_at is required".into()))?;

    let store = state.require_tipping_store().await?;
    let slot = TimeSlotEntity {
        id: Uuid::new_v4(),
        starts_at,
    };
    store.insert_time_slot(slot.clone()).await?;

    info!(slot_id = %slot.id, starts_at = %slot.starts_at, "time slot created");
    Ok(slot.into())
}

pub async fn delete_time_slot(state: &SharedState, id: Uuid) -> Result<(), ServiceError> {
    let store = state.require_tipping_store().await?;
    if !store.delete_time_slot(id).await? {
        return Err(ServiceError::NotFound(format!("time slot `{id}` not found")));
    }
    Ok(())
}
