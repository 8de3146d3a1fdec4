use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{dao::models::ClubEntity, dto::validation::validate_not_blank};

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateClubRequest {
    #[validate(custom(function = "validate_not_blank"))]
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ClubSummary {
    pub id: Uuid,
    pub name: String,
}

impl From<ClubEntity> for ClubSummary {
    fn from(value: ClubEntity) -> Self {
        Self {
            id: value.id,
            name: value.name,
        }
    }
}
