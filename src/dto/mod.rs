use time::{OffsetDateTime, format_description::well_known::Rfc3339};

pub mod club;
pub mod health;
pub mod matches;
pub mod prediction;
pub mod reconcile;
pub mod time_slot;
pub mod user;
pub mod validation;

fn format_timestamp(at: OffsetDateTime) -> String {
    at.format(&Rfc3339).unwrap_or_else(|_| "invalid-timestamp".into())
}
