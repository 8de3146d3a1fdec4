use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{dao::models::TimeSlotEntity, dto::format_timestamp};

/// Offer a new kickoff slot to the scheduling UI.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTimeSlotRequest {
    /// Slot start as an RFC 3339 timestamp.
    #[serde(default, with = "time::serde::rfc3339::option")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub starts_at: Option<OffsetDateTime>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TimeSlotSummary {
    pub id: Uuid,
    pub starts_at: String,
}

impl From<TimeSlotEntity> for TimeSlotSummary {
    fn from(value: TimeSlotEntity) -> Self {
        Self {
            id: value.id,
            starts_at: format_timestamp(value.starts_at),
        }
    }
}
