use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dao::models::{UserEntity, UserRole},
    dto::validation::validate_not_blank,
};

/// Register a participant. The role is trusted as given.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateUserRequest {
    #[validate(custom(function = "validate_not_blank"))]
    pub name: String,
    pub role: UserRole,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub role: UserRole,
}

impl From<UserEntity> for UserSummary {
    fn from(value: UserEntity) -> Self {
        Self {
            id: value.id,
            name: value.name,
            role: value.role,
        }
    }
}
