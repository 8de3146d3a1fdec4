pub mod memory;
#[cfg(feature = "mongo-store")]
pub mod mongodb;

use futures::future::BoxFuture;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::dao::models::{
    ClubEntity, MatchEntity, MatchStatus, PredictionEntity, ResultUpdate, TimeSlotEntity,
    UserEntity,
};
use crate::dao::storage::StorageResult;

pub use memory::MemoryStore;

/// Abstraction over the persistence layer for matches, predictions and reference data.
///
/// Every write is a single atomic operation on the backend. Status transitions and result
/// entry are conditional on the current status so concurrent callers converge.
pub trait TippingStore: Send + Sync {
    /// Move every match in status `from` whose kickoff is at or before `kicked_off_by` to
    /// status `to`, returning how many rows changed.
    fn transition_matches(
        &self,
        from: MatchStatus,
        to: MatchStatus,
        kicked_off_by: OffsetDateTime,
    ) -> BoxFuture<'static, StorageResult<u64>>;
    fn find_match(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<MatchEntity>>>;
    /// All matches ordered by kickoff ascending.
    fn list_matches(&self) -> BoxFuture<'static, StorageResult<Vec<MatchEntity>>>;
    fn insert_match(&self, entity: MatchEntity) -> BoxFuture<'static, StorageResult<()>>;
    fn delete_match(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>>;
    /// Store the final score of a match that is no longer `planned`.
    ///
    /// Returns the updated match, or `None` when no started match with this id exists.
    fn record_result(
        &self,
        id: Uuid,
        update: ResultUpdate,
    ) -> BoxFuture<'static, StorageResult<Option<MatchEntity>>>;

    /// Insert or overwrite the prediction keyed by `(user_id, match_id)`.
    ///
    /// An existing row keeps its `created_at`; the stored row is returned.
    fn upsert_prediction(
        &self,
        prediction: PredictionEntity,
    ) -> BoxFuture<'static, StorageResult<PredictionEntity>>;
    fn list_predictions_for_match(
        &self,
        match_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<PredictionEntity>>>;
    fn list_predictions_for_user(
        &self,
        user_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<PredictionEntity>>>;

    fn find_user(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<UserEntity>>>;
    fn insert_user(&self, user: UserEntity) -> BoxFuture<'static, StorageResult<()>>;

    /// Clubs ordered by name.
    fn list_clubs(&self) -> BoxFuture<'static, StorageResult<Vec<ClubEntity>>>;
    fn insert_club(&self, club: ClubEntity) -> BoxFuture<'static, StorageResult<()>>;
    fn delete_club(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>>;

    /// Time slots ordered by start time.
    fn list_time_slots(&self) -> BoxFuture<'static, StorageResult<Vec<TimeSlotEntity>>>;
    fn insert_time_slot(&self, slot: TimeSlotEntity) -> BoxFuture<'static, StorageResult<()>>;
    fn delete_time_slot(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>>;

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}
