use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dao::models::{MatchEntity, MatchStatus},
    dto::{format_timestamp, validation::validate_distinct_clubs},
};

/// Payload used to schedule a new match.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[validate(schema(function = "validate_distinct_clubs"))]
pub struct CreateMatchRequest {
    /// Kickoff as an RFC 3339 timestamp.
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String, format = DateTime)]
    pub kickoff: OffsetDateTime,
    pub home_club_id: Uuid,
    pub away_club_id: Uuid,
}

/// Final or intermediate score entry for a match that already kicked off.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RecordResultRequest {
    pub home_score: Option<u16>,
    pub away_score: Option<u16>,
    /// Close the match immediately instead of waiting for the timer.
    #[serde(default)]
    pub finish: bool,
}

/// Public projection of a match.
#[derive(Debug, Serialize, ToSchema)]
pub struct MatchSummary {
    pub id: Uuid,
    pub kickoff: String,
    pub home_club_id: Uuid,
    pub away_club_id: Uuid,
    pub home_score: Option<u16>,
    pub away_score: Option<u16>,
    pub status: MatchStatus,
}

impl From<MatchEntity> for MatchSummary {
    fn from(value: MatchEntity) -> Self {
        Self {
            id: value.id,
            kickoff: format_timestamp(value.kickoff),
            home_club_id: value.home_club_id,
            away_club_id: value.away_club_id,
            home_score: value.home_score,
            away_score: value.away_score,
            status: value.status,
        }
    }
}
