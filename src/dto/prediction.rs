use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{dao::models::PredictionEntity, dto::format_timestamp};

/// A tipper's forecast for one match. Every field is required; missing ones are
/// reported together as incomplete data.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SubmitPredictionRequest {
    pub user_id: Option<Uuid>,
    pub match_id: Option<Uuid>,
    pub predicted_home_score: Option<u16>,
    pub predicted_away_score: Option<u16>,
}

/// Stored prediction as returned to clients.
#[derive(Debug, Serialize, ToSchema)]
pub struct PredictionSummary {
    pub user_id: Uuid,
    pub match_id: Uuid,
    pub predicted_home_score: u16,
    pub predicted_away_score: u16,
    pub created_at: String,
    pub updated_at: String,
}

impl From<PredictionEntity> for PredictionSummary {
    fn from(value: PredictionEntity) -> Self {
        Self {
            user_id: value.user_id,
            match_id: value.match_id,
            predicted_home_score: value.predicted_home_score,
            predicted_away_score: value.predicted_away_score,
            created_at: format_timestamp(value.created_at),
            updated_at: format_timestamp(value.updated_at),
        }
    }
}
