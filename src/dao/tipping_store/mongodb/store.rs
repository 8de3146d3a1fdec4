use std::sync::Arc;

use futures::{TryStreamExt, future::BoxFuture};
use mongodb::{
    Client, Collection, Database, IndexModel,
    bson::{Document, doc},
    options::{IndexOptions, ReturnDocument},
};
use serde::{Serialize, de::DeserializeOwned};
use time::OffsetDateTime;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::{
    config::MongoConfig,
    connection::establish_connection,
    error::{MongoDaoError, MongoResult, is_duplicate_key},
    models::{
        CLUB_COLLECTION_NAME, MATCH_COLLECTION_NAME, MongoClubDocument, MongoMatchDocument,
        MongoPredictionDocument, MongoTimeSlotDocument, MongoUserDocument,
        PREDICTION_COLLECTION_NAME, TIME_SLOT_COLLECTION_NAME, USER_COLLECTION_NAME, doc_id,
        prediction_key, prediction_upsert, to_bson_datetime,
    },
};
use crate::dao::{
    models::{
        ClubEntity, MatchEntity, MatchStatus, PredictionEntity, ResultUpdate, TimeSlotEntity,
        UserEntity,
    },
    storage::StorageResult,
    tipping_store::TippingStore,
};

#[derive(Clone)]
pub struct MongoTippingStore {
    inner: Arc<MongoInner>,
}

struct MongoInner {
    state: RwLock<MongoState>,
    config: MongoConfig,
}

struct MongoState {
    client: Client,
    database: Database,
}

impl MongoInner {
    async fn ping(&self) -> MongoResult<()> {
        let database = {
            let guard = self.state.read().await;
            guard.database.clone()
        };

        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|source| MongoDaoError::HealthPing { source })?;
        Ok(())
    }

    async fn reconnect(&self) -> MongoResult<()> {
        let (client, database) =
            establish_connection(&self.config.options, &self.config.database_name).await?;
        let mut guard = self.state.write().await;
        guard.client = client;
        guard.database = database;
        Ok(())
    }
}

impl MongoTippingStore {
    /// Establish a connection to MongoDB and ensure indexes are present.
    pub async fn connect(config: MongoConfig) -> MongoResult<Self> {
        let (client, database) =
            establish_connection(&config.options, &config.database_name).await?;

        let inner = Arc::new(MongoInner {
            state: RwLock::new(MongoState { client, database }),
            config,
        });

        let store = Self { inner };
        store.ensure_indexes().await?;
        Ok(store)
    }

    async fn ensure_indexes(&self) -> MongoResult<()> {
        // One prediction per user and match; upserts rely on this to stay single-row.
        self.create_index::<MongoPredictionDocument>(
            PREDICTION_COLLECTION_NAME,
            "user_id,match_id",
            IndexModel::builder()
                .keys(doc! {"user_id": 1, "match_id": 1})
                .options(
                    IndexOptions::builder()
                        .name(Some("prediction_user_match_idx".to_owned()))
                        .unique(Some(true))
                        .build(),
                )
                .build(),
        )
        .await?;

        self.create_index::<MongoMatchDocument>(
            MATCH_COLLECTION_NAME,
            "status,kickoff",
            IndexModel::builder()
                .keys(doc! {"status": 1, "kickoff": 1})
                .options(
                    IndexOptions::builder()
                        .name(Some("match_status_kickoff_idx".to_owned()))
                        .build(),
                )
                .build(),
        )
        .await?;

        self.create_index::<MongoClubDocument>(
            CLUB_COLLECTION_NAME,
            "name",
            IndexModel::builder()
                .keys(doc! {"name": 1})
                .options(
                    IndexOptions::builder()
                        .name(Some("club_name_idx".to_owned()))
                        .build(),
                )
                .build(),
        )
        .await
    }

    async fn create_index<T>(
        &self,
        collection: &'static str,
        index: &'static str,
        model: IndexModel,
    ) -> MongoResult<()>
    where
        T: Send + Sync,
    {
        self.collection::<T>(collection)
            .await
            .create_index(model)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection,
                index,
                source,
            })?;
        Ok(())
    }

    async fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        let guard = self.inner.state.read().await;
        guard.database.collection::<T>(name)
    }

    async fn transition_matches(
        &self,
        from: MatchStatus,
        to: MatchStatus,
        kicked_off_by: OffsetDateTime,
    ) -> MongoResult<u64> {
        let collection = self
            .collection::<MongoMatchDocument>(MATCH_COLLECTION_NAME)
            .await;

        // The status in the filter makes each row flip at most once even with
        // concurrent reconcilers.
        let result = collection
            .update_many(
                doc! {
                    "status": from.as_str(),
                    "kickoff": { "$lte": to_bson_datetime(kicked_off_by) },
                },
                doc! { "$set": { "status": to.as_str() } },
            )
            .await
            .map_err(|source| MongoDaoError::TransitionMatches { from, to, source })?;

        Ok(result.modified_count)
    }

    async fn find_match(&self, id: Uuid) -> MongoResult<Option<MatchEntity>> {
        let collection = self
            .collection::<MongoMatchDocument>(MATCH_COLLECTION_NAME)
            .await;

        collection
            .find_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::LoadMatch { id, source })?
            .map(MatchEntity::try_from)
            .transpose()
    }

    async fn list_matches(&self) -> MongoResult<Vec<MatchEntity>> {
        let collection = self
            .collection::<MongoMatchDocument>(MATCH_COLLECTION_NAME)
            .await;

        let documents: Vec<MongoMatchDocument> = collection
            .find(doc! {})
            .sort(doc! {"kickoff": 1, "_id": 1})
            .await
            .map_err(|source| MongoDaoError::ListMatches { source })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::ListMatches { source })?;

        documents.into_iter().map(MatchEntity::try_from).collect()
    }

    async fn insert_match(&self, entity: MatchEntity) -> MongoResult<()> {
        let id = entity.id;
        let document: MongoMatchDocument = entity.into();
        self.collection::<MongoMatchDocument>(MATCH_COLLECTION_NAME)
            .await
            .insert_one(&document)
            .await
            .map_err(|source| MongoDaoError::SaveMatch { id, source })?;
        Ok(())
    }

    async fn delete_match(&self, id: Uuid) -> MongoResult<bool> {
        let result = self
            .collection::<MongoMatchDocument>(MATCH_COLLECTION_NAME)
            .await
            .delete_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::DeleteMatch { id, source })?;
        Ok(result.deleted_count > 0)
    }

    async fn record_result(
        &self,
        id: Uuid,
        update: ResultUpdate,
    ) -> MongoResult<Option<MatchEntity>> {
        let collection = self
            .collection::<MongoMatchDocument>(MATCH_COLLECTION_NAME)
            .await;

        let mut set = doc! {
            "home_score": i32::from(update.home_score),
            "away_score": i32::from(update.away_score),
        };
        if update.finish {
            set.insert("status", MatchStatus::Finished.as_str());
        }

        let mut filter = doc_id(id);
        filter.insert("status", doc! { "$ne": MatchStatus::Planned.as_str() });

        collection
            .find_one_and_update(filter, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await
            .map_err(|source| MongoDaoError::RecordResult { id, source })?
            .map(MatchEntity::try_from)
            .transpose()
    }

    async fn upsert_prediction(
        &self,
        prediction: PredictionEntity,
    ) -> MongoResult<PredictionEntity> {
        let (user_id, match_id) = (prediction.user_id, prediction.match_id);
        let collection = self
            .collection::<MongoPredictionDocument>(PREDICTION_COLLECTION_NAME)
            .await;

        let mut retried = false;
        let stored = loop {
            let attempt = collection
                .find_one_and_update(
                    prediction_key(user_id, match_id),
                    prediction_upsert(&prediction),
                )
                .upsert(true)
                .return_document(ReturnDocument::After)
                .await;

            match attempt {
                Ok(document) => break document,
                // Two concurrent upserts can both miss and race on the insert; the loser
                // finds the winner's row on the second attempt.
                Err(err) if !retried && is_duplicate_key(&err) => {
                    debug!(%user_id, %match_id, "prediction upsert lost insert race; retrying");
                    retried = true;
                }
                Err(source) => {
                    return Err(MongoDaoError::SavePrediction {
                        user_id,
                        match_id,
                        source,
                    });
                }
            }
        };

        stored
            .ok_or(MongoDaoError::MissingUpsertResult { user_id, match_id })?
            .try_into()
    }

    async fn list_predictions(&self, field: &str, id: Uuid) -> MongoResult<Vec<PredictionEntity>> {
        let mut filter = Document::new();
        filter.insert(field, id.to_string());

        let documents: Vec<MongoPredictionDocument> = self
            .collection::<MongoPredictionDocument>(PREDICTION_COLLECTION_NAME)
            .await
            .find(filter)
            .sort(doc! {"created_at": 1})
            .await
            .map_err(|source| MongoDaoError::ListPredictions { source })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::ListPredictions { source })?;

        documents
            .into_iter()
            .map(PredictionEntity::try_from)
            .collect()
    }

    async fn find_user(&self, id: Uuid) -> MongoResult<Option<UserEntity>> {
        self.collection::<MongoUserDocument>(USER_COLLECTION_NAME)
            .await
            .find_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::LoadUser { id, source })?
            .map(UserEntity::try_from)
            .transpose()
    }

    async fn insert_user(&self, user: UserEntity) -> MongoResult<()> {
        let id = user.id;
        let document: MongoUserDocument = user.into();
        self.collection::<MongoUserDocument>(USER_COLLECTION_NAME)
            .await
            .insert_one(&document)
            .await
            .map_err(|source| MongoDaoError::SaveUser { id, source })?;
        Ok(())
    }

    async fn list_sorted<D, E>(
        &self,
        collection: &str,
        sort_key: &str,
        on_error: fn(mongodb::error::Error) -> MongoDaoError,
    ) -> MongoResult<Vec<E>>
    where
        D: Serialize + DeserializeOwned + Send + Sync + Unpin,
        E: TryFrom<D, Error = MongoDaoError>,
    {
        let mut sort = Document::new();
        sort.insert(sort_key, 1);
        sort.insert("_id", 1);

        let documents: Vec<D> = self
            .collection::<D>(collection)
            .await
            .find(doc! {})
            .sort(sort)
            .await
            .map_err(on_error)?
            .try_collect()
            .await
            .map_err(on_error)?;

        documents.into_iter().map(E::try_from).collect()
    }

    async fn insert_club(&self, club: ClubEntity) -> MongoResult<()> {
        let id = club.id;
        let document: MongoClubDocument = club.into();
        self.collection::<MongoClubDocument>(CLUB_COLLECTION_NAME)
            .await
            .insert_one(&document)
            .await
            .map_err(|source| MongoDaoError::SaveClub { id, source })?;
        Ok(())
    }

    async fn delete_club(&self, id: Uuid) -> MongoResult<bool> {
        let result = self
            .collection::<MongoClubDocument>(CLUB_COLLECTION_NAME)
            .await
            .delete_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::DeleteClub { id, source })?;
        Ok(result.deleted_count > 0)
    }

    async fn insert_time_slot(&self, slot: TimeSlotEntity) -> MongoResult<()> {
        let id = slot.id;
        let document: MongoTimeSlotDocument = slot.into();
        self.collection::<MongoTimeSlotDocument>(TIME_SLOT_COLLECTION_NAME)
            .await
            .insert_one(&document)
            .await
            .map_err(|source| MongoDaoError::SaveTimeSlot { id, source })?;
        Ok(())
    }

    async fn delete_time_slot(&self, id: Uuid) -> MongoResult<bool> {
        let result = self
            .collection::<MongoTimeSlotDocument>(TIME_SLOT_COLLECTION_NAME)
            .await
            .delete_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::DeleteTimeSlot { id, source })?;
        Ok(result.deleted_count > 0)
    }
}

impl TippingStore for MongoTippingStore {
    fn transition_matches(
        &self,
        from: MatchStatus,
        to: MatchStatus,
        kicked_off_by: OffsetDateTime,
    ) -> BoxFuture<'static, StorageResult<u64>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .transition_matches(from, to, kicked_off_by)
                .await
                .map_err(Into::into)
        })
    }

    fn find_match(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<MatchEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_match(id).await.map_err(Into::into) })
    }

    fn list_matches(&self) -> BoxFuture<'static, StorageResult<Vec<MatchEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_matches().await.map_err(Into::into) })
    }

    fn insert_match(&self, entity: MatchEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.insert_match(entity).await.map_err(Into::into) })
    }

    fn delete_match(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { store.delete_match(id).await.map_err(Into::into) })
    }

    fn record_result(
        &self,
        id: Uuid,
        update: ResultUpdate,
    ) -> BoxFuture<'static, StorageResult<Option<MatchEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.record_result(id, update).await.map_err(Into::into) })
    }

    fn upsert_prediction(
        &self,
        prediction: PredictionEntity,
    ) -> BoxFuture<'static, StorageResult<PredictionEntity>> {
        let store = self.clone();
        Box::pin(async move { store.upsert_prediction(prediction).await.map_err(Into::into) })
    }

    fn list_predictions_for_match(
        &self,
        match_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<PredictionEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .list_predictions("match_id", match_id)
                .await
                .map_err(Into::into)
        })
    }

    fn list_predictions_for_user(
        &self,
        user_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<PredictionEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .list_predictions("user_id", user_id)
                .await
                .map_err(Into::into)
        })
    }

    fn find_user(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<UserEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_user(id).await.map_err(Into::into) })
    }

    fn insert_user(&self, user: UserEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.insert_user(user).await.map_err(Into::into) })
    }

    fn list_clubs(&self) -> BoxFuture<'static, StorageResult<Vec<ClubEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .list_sorted::<MongoClubDocument, ClubEntity>(
                    CLUB_COLLECTION_NAME,
                    "name",
                    |source| MongoDaoError::ListClubs { source },
                )
                .await
                .map_err(Into::into)
        })
    }

    fn insert_club(&self, club: ClubEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.insert_club(club).await.map_err(Into::into) })
    }

    fn delete_club(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { store.delete_club(id).await.map_err(Into::into) })
    }

    fn list_time_slots(&self) -> BoxFuture<'static, StorageResult<Vec<TimeSlotEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .list_sorted::<MongoTimeSlotDocument, TimeSlotEntity>(
                    TIME_SLOT_COLLECTION_NAME,
                    "starts_at",
                    |source| MongoDaoError::ListTimeSlots { source },
                )
                .await
                .map_err(Into::into)
        })
    }

    fn insert_time_slot(&self, slot: TimeSlotEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.insert_time_slot(slot).await.map_err(Into::into) })
    }

    fn delete_time_slot(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { store.delete_time_slot(id).await.map_err(Into::into) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.ping().await.map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.reconnect().await.map_err(Into::into) })
    }
}
