use mongodb::error::{Error as MongoError, ErrorKind, WriteFailure};
use thiserror::Error;
use uuid::Uuid;

use crate::dao::models::MatchStatus;

pub type MongoResult<T> = std::result::Result<T, MongoDaoError>;

/// Server error code reported when a unique index rejects a write.
const DUPLICATE_KEY_CODE: i32 = 11000;

#[derive(Debug, Error)]
pub enum MongoDaoError {
    #[error("failed to parse MongoDB connection URI `{uri}`")]
    InvalidUri {
        uri: String,
        #[source]
        source: MongoError,
    },
    #[error("failed to build MongoDB client from options")]
    ClientConstruction {
        #[source]
        source: MongoError,
    },
    #[error("MongoDB ping failed during initial connection after {attempts} attempt(s)")]
    InitialPing {
        attempts: u32,
        #[source]
        source: MongoError,
    },
    #[error("MongoDB ping health check failed")]
    HealthPing {
        #[source]
        source: MongoError,
    },
    #[error("failed to ensure index `{index}` on collection `{collection}`")]
    EnsureIndex {
        collection: &'static str,
        index: &'static str,
        #[source]
        source: MongoError,
    },
    #[error("failed to move matches from `{from:?}` to `{to:?}`")]
    TransitionMatches {
        from: MatchStatus,
        to: MatchStatus,
        #[source]
        source: MongoError,
    },
    #[error("failed to load match `{id}`")]
    LoadMatch {
        id: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("failed to list matches")]
    ListMatches {
        #[source]
        source: MongoError,
    },
    #[error("failed to save match `{id}`")]
    SaveMatch {
        id: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("failed to delete match `{id}`")]
    DeleteMatch {
        id: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("failed to record result for match `{id}`")]
    RecordResult {
        id: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("failed to save prediction of user `{user_id}` for match `{match_id}`")]
    SavePrediction {
        user_id: Uuid,
        match_id: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("prediction upsert for user `{user_id}` and match `{match_id}` returned no document")]
    MissingUpsertResult { user_id: Uuid, match_id: Uuid },
    #[error("failed to list predictions")]
    ListPredictions {
        #[source]
        source: MongoError,
    },
    #[error("failed to load user `{id}`")]
    LoadUser {
        id: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("failed to save user `{id}`")]
    SaveUser {
        id: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("failed to list clubs")]
    ListClubs {
        #[source]
        source: MongoError,
    },
    #[error("failed to save club `{id}`")]
    SaveClub {
        id: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("failed to delete club `{id}`")]
    DeleteClub {
        id: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("failed to list time slots")]
    ListTimeSlots {
        #[source]
        source: MongoError,
    },
    #[error("failed to save time slot `{id}`")]
    SaveTimeSlot {
        id: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("failed to delete time slot `{id}`")]
    DeleteTimeSlot {
        id: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("invalid document in collection `{collection}`: {reason}")]
    InvalidDocument {
        collection: &'static str,
        reason: String,
    },
}

/// True when the server rejected a write because of a unique index.
pub fn is_duplicate_key(err: &MongoError) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Command(command) => command.code == DUPLICATE_KEY_CODE,
        ErrorKind::Write(WriteFailure::WriteError(write)) => write.code == DUPLICATE_KEY_CODE,
        _ => false,
    }
}
