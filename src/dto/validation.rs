//! Validation helpers for DTOs.

use validator::ValidationError;

use crate::dto::matches::CreateMatchRequest;

/// Rejects names that are empty or whitespace only.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}

/// A club cannot play against itself.
pub fn validate_distinct_clubs(request: &CreateMatchRequest) -> Result<(), ValidationError> {
    if request.home_club_id == request.away_club_id {
        let mut err = ValidationError::new("same_club");
        err.message = Some("home and away club must differ".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;
    use uuid::Uuid;
    use validator::Validate;

    use super::*;
    use crate::dto::club::CreateClubRequest;

    #[test]
    fn test_validate_not_blank() {
        assert!(validate_not_blank("Eintracht").is_ok());
        assert!(validate_not_blank("").is_err());
        assert!(validate_not_blank("   ").is_err());
    }

    #[test]
    fn test_create_club_rejects_blank_name() {
        let request = CreateClubRequest { name: " ".into() };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_create_match_requires_distinct_clubs() {
        let club = Uuid::new_v4();
        let same = CreateMatchRequest {
            kickoff: datetime!(2026-09-12 15:30 UTC),
            home_club_id: club,
            away_club_id: club,
        };
        assert!(same.validate().is_err());

        let distinct = CreateMatchRequest {
            away_club_id: Uuid::new_v4(),
            ..same
        };
        assert!(distinct.validate().is_ok());
    }
}
