use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;
use uuid::Uuid;

/// Lifecycle status of a match.
///
/// Variants are declared in lifecycle order so the derived [`Ord`] reflects progression.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    /// Kickoff still ahead; predictions are open.
    Planned,
    /// Play has started; predictions are closed.
    Live,
    /// Regular and stoppage time elapsed, or a final result was recorded.
    Finished,
}

impl MatchStatus {
    /// Stable lowercase name used by storage backends and the JSON API.
    pub fn as_str(self) -> &'static str {
        match self {
            MatchStatus::Planned => "planned",
            MatchStatus::Live => "live",
            MatchStatus::Finished => "finished",
        }
    }
}

/// Persisted match row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchEntity {
    /// Stable identifier for the match.
    pub id: Uuid,
    /// Scheduled start, immutable once created.
    pub kickoff: OffsetDateTime,
    /// Club playing at home.
    pub home_club_id: Uuid,
    /// Visiting club.
    pub away_club_id: Uuid,
    /// Goals scored by the home club, once a result is recorded.
    pub home_score: Option<u16>,
    /// Goals scored by the visiting club, once a result is recorded.
    pub away_score: Option<u16>,
    /// Current lifecycle status.
    pub status: MatchStatus,
}

/// Result entry applied to a match that already kicked off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultUpdate {
    pub home_score: u16,
    pub away_score: u16,
    /// Force the match to `finished` regardless of the timer.
    pub finish: bool,
}

/// Persisted prediction, unique per `(user_id, match_id)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionEntity {
    pub user_id: Uuid,
    pub match_id: Uuid,
    pub predicted_home_score: u16,
    pub predicted_away_score: u16,
    /// First time this prediction was written.
    pub created_at: OffsetDateTime,
    /// Last time the scores were overwritten.
    pub updated_at: OffsetDateTime,
}

/// Role a user acts under. Trusted as given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Regular participant allowed to submit predictions.
    Tipper,
    /// Maintains matches and results.
    Admin,
}

impl UserRole {
    /// Stable lowercase name used by storage backends.
    pub fn as_str(self) -> &'static str {
        match self {
            UserRole::Tipper => "tipper",
            UserRole::Admin => "admin",
        }
    }
}

/// Persisted user record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserEntity {
    pub id: Uuid,
    pub name: String,
    pub role: UserRole,
}

/// Persisted club record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClubEntity {
    pub id: Uuid,
    pub name: String,
}

/// Reusable kickoff slot offered when scheduling matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeSlotEntity {
    pub id: Uuid,
    pub starts_at: OffsetDateTime,
}
