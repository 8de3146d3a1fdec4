use mongodb::bson::{DateTime, Document, doc};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::error::{MongoDaoError, MongoResult};
use crate::dao::models::{
    ClubEntity, MatchEntity, MatchStatus, PredictionEntity, TimeSlotEntity, UserEntity, UserRole,
};

pub const MATCH_COLLECTION_NAME: &str = "matches";
pub const PREDICTION_COLLECTION_NAME: &str = "predictions";
pub const USER_COLLECTION_NAME: &str = "users";
pub const CLUB_COLLECTION_NAME: &str = "clubs";
pub const TIME_SLOT_COLLECTION_NAME: &str = "time_slots";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoMatchDocument {
    #[serde(rename = "_id")]
    id: String,
    kickoff: DateTime,
    home_club_id: String,
    away_club_id: String,
    home_score: Option<i32>,
    away_score: Option<i32>,
    status: MatchStatus,
}

impl From<MatchEntity> for MongoMatchDocument {
    fn from(value: MatchEntity) -> Self {
        Self {
            id: value.id.to_string(),
            kickoff: to_bson_datetime(value.kickoff),
            home_club_id: value.home_club_id.to_string(),
            away_club_id: value.away_club_id.to_string(),
            home_score: value.home_score.map(i32::from),
            away_score: value.away_score.map(i32::from),
            status: value.status,
        }
    }
}

impl TryFrom<MongoMatchDocument> for MatchEntity {
    type Error = MongoDaoError;

    fn try_from(value: MongoMatchDocument) -> MongoResult<Self> {
        Ok(Self {
            id: parse_id(MATCH_COLLECTION_NAME, &value.id)?,
            kickoff: from_bson_datetime(value.kickoff),
            home_club_id: parse_id(MATCH_COLLECTION_NAME, &value.home_club_id)?,
            away_club_id: parse_id(MATCH_COLLECTION_NAME, &value.away_club_id)?,
            home_score: parse_score(MATCH_COLLECTION_NAME, value.home_score)?,
            away_score: parse_score(MATCH_COLLECTION_NAME, value.away_score)?,
            status: value.status,
        })
    }
}

/// Prediction document; `_id` is left to the server, identity is the unique
/// `(user_id, match_id)` index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoPredictionDocument {
    user_id: String,
    match_id: String,
    predicted_home_score: i32,
    predicted_away_score: i32,
    created_at: DateTime,
    updated_at: DateTime,
}

impl TryFrom<MongoPredictionDocument> for PredictionEntity {
    type Error = MongoDaoError;

    fn try_from(value: MongoPredictionDocument) -> MongoResult<Self> {
        let score = |raw: i32| {
            parse_score(PREDICTION_COLLECTION_NAME, Some(raw)).map(Option::unwrap_or_default)
        };
        Ok(Self {
            user_id: parse_id(PREDICTION_COLLECTION_NAME, &value.user_id)?,
            match_id: parse_id(PREDICTION_COLLECTION_NAME, &value.match_id)?,
            predicted_home_score: score(value.predicted_home_score)?,
            predicted_away_score: score(value.predicted_away_score)?,
            created_at: from_bson_datetime(value.created_at),
            updated_at: from_bson_datetime(value.updated_at),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoUserDocument {
    #[serde(rename = "_id")]
    id: String,
    name: String,
    role: UserRole,
}

impl From<UserEntity> for MongoUserDocument {
    fn from(value: UserEntity) -> Self {
        Self {
            id: value.id.to_string(),
            name: value.name,
            role: value.role,
        }
    }
}

impl TryFrom<MongoUserDocument> for UserEntity {
    type Error = MongoDaoError;

    fn try_from(value: MongoUserDocument) -> MongoResult<Self> {
        Ok(Self {
            id: parse_id(USER_COLLECTION_NAME, &value.id)?,
            name: value.name,
            role: value.role,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoClubDocument {
    #[serde(rename = "_id")]
    id: String,
    name: String,
}

impl From<ClubEntity> for MongoClubDocument {
    fn from(value: ClubEntity) -> Self {
        Self {
            id: value.id.to_string(),
            name: value.name,
        }
    }
}

impl TryFrom<MongoClubDocument> for ClubEntity {
    type Error = MongoDaoError;

    fn try_from(value: MongoClubDocument) -> MongoResult<Self> {
        Ok(Self {
            id: parse_id(CLUB_COLLECTION_NAME, &value.id)?,
            name: value.name,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoTimeSlotDocument {
    #[serde(rename = "_id")]
    id: String,
    starts_at: DateTime,
}

impl From<TimeSlotEntity> for MongoTimeSlotDocument {
    fn from(value: TimeSlotEntity) -> Self {
        Self {
            id: value.id.to_string(),
            starts_at: to_bson_datetime(value.starts_at),
        }
    }
}

impl TryFrom<MongoTimeSlotDocument> for TimeSlotEntity {
    type Error = MongoDaoError;

    fn try_from(value: MongoTimeSlotDocument) -> MongoResult<Self> {
        Ok(Self {
            id: parse_id(TIME_SLOT_COLLECTION_NAME, &value.id)?,
            starts_at: from_bson_datetime(value.starts_at),
        })
    }
}

/// Filter selecting a prediction by its natural key.
pub fn prediction_key(user_id: Uuid, match_id: Uuid) -> Document {
    doc! { "user_id": user_id.to_string(), "match_id": match_id.to_string() }
}

/// Upsert body that overwrites the scores and keeps the original `created_at`.
pub fn prediction_upsert(prediction: &PredictionEntity) -> Document {
    doc! {
        "$set": {
            "predicted_home_score": i32::from(prediction.predicted_home_score),
            "predicted_away_score": i32::from(prediction.predicted_away_score),
            "updated_at": to_bson_datetime(prediction.updated_at),
        },
        "$setOnInsert": {
            "created_at": to_bson_datetime(prediction.created_at),
        },
    }
}

pub fn doc_id(id: Uuid) -> Document {
    doc! {"_id": id.to_string()}
}

pub fn to_bson_datetime(at: OffsetDateTime) -> DateTime {
    DateTime::from_system_time(at.into())
}

fn from_bson_datetime(at: DateTime) -> OffsetDateTime {
    at.to_system_time().into()
}

fn parse_id(collection: &'static str, raw: &str) -> MongoResult<Uuid> {
    Uuid::parse_str(raw).map_err(|err| MongoDaoError::InvalidDocument {
        collection,
        reason: format!("invalid identifier `{raw}`: {err}"),
    })
}

fn parse_score(collection: &'static str, raw: Option<i32>) -> MongoResult<Option<u16>> {
    raw.map(|value| {
        u16::try_from(value).map_err(|_| MongoDaoError::InvalidDocument {
            collection,
            reason: format!("score `{value}` out of range"),
        })
    })
    .transpose()
}
