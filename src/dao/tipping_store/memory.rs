//! In-process [`TippingStore`] used by tests and by `STORAGE_BACKEND=memory` deployments.

use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use dashmap::{DashMap, mapref::entry::Entry};
use futures::future::BoxFuture;
use thiserror::Error;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::TippingStore;
use crate::dao::{
    models::{
        ClubEntity, MatchEntity, MatchStatus, PredictionEntity, ResultUpdate, TimeSlotEntity,
        UserEntity,
    },
    storage::{StorageError, StorageResult},
};

/// Raised by every operation while the store is switched offline.
#[derive(Debug, Error)]
#[error("in-memory store is offline")]
pub struct OfflineError;

/// Cheaply clonable in-memory store. Clones share the same tables.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    offline: AtomicBool,
    matches: RwLock<HashMap<Uuid, MatchEntity>>,
    predictions: DashMap<(Uuid, Uuid), PredictionEntity>,
    users: DashMap<Uuid, UserEntity>,
    clubs: DashMap<Uuid, ClubEntity>,
    time_slots: DashMap<Uuid, TimeSlotEntity>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate an unreachable backend: while offline every operation fails.
    pub fn set_offline(&self, offline: bool) {
        self.inner.offline.store(offline, Ordering::SeqCst);
    }

    fn ensure_online(&self, operation: &str) -> StorageResult<()> {
        if self.inner.offline.load(Ordering::SeqCst) {
            return Err(StorageError::unavailable(
                format!("{operation} failed"),
                OfflineError,
            ));
        }
        Ok(())
    }

    async fn transition_matches(
        &self,
        from: MatchStatus,
        to: MatchStatus,
        kicked_off_by: OffsetDateTime,
    ) -> StorageResult<u64> {
        self.ensure_online("transition matches")?;
        let mut matches = self.inner.matches.write().await;
        let mut changed = 0;
        for entity in matches.values_mut() {
            if entity.status == from && entity.kickoff <= kicked_off_by {
                entity.status = to;
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn find_match(&self, id: Uuid) -> StorageResult<Option<MatchEntity>> {
        self.ensure_online("load match")?;
        Ok(self.inner.matches.read().await.get(&id).cloned())
    }

    async fn list_matches(&self) -> StorageResult<Vec<MatchEntity>> {
        self.ensure_online("list matches")?;
        let mut matches: Vec<MatchEntity> =
            self.inner.matches.read().await.values().cloned().collect();
        matches.sort_by_key(|entity| (entity.kickoff, entity.id));
        Ok(matches)
    }

    async fn insert_match(&self, entity: MatchEntity) -> StorageResult<()> {
        self.ensure_online("save match")?;
        self.inner.matches.write().await.insert(entity.id, entity);
        Ok(())
    }

    async fn delete_match(&self, id: Uuid) -> StorageResult<bool> {
        self.ensure_online("delete match")?;
        Ok(self.inner.matches.write().await.remove(&id).is_some())
    }

    async fn record_result(
        &self,
        id: Uuid,
        update: ResultUpdate,
    ) -> StorageResult<Option<MatchEntity>> {
        self.ensure_online("record result")?;
        let mut matches = self.inner.matches.write().await;
        let Some(entity) = matches.get_mut(&id) else {
            return Ok(None);
        };
        if entity.status == MatchStatus::Planned {
            return Ok(None);
        }

        entity.home_score = Some(update.home_score);
        entity.away_score = Some(update.away_score);
        if update.finish {
            entity.status = MatchStatus::Finished;
        }
        Ok(Some(entity.clone()))
    }

    fn upsert_prediction(&self, prediction: PredictionEntity) -> StorageResult<PredictionEntity> {
        self.ensure_online("save prediction")?;
        let key = (prediction.user_id, prediction.match_id);
        let stored = match self.inner.predictions.entry(key) {
            Entry::Occupied(mut occupied) => {
                let row = occupied.get_mut();
                row.predicted_home_score = prediction.predicted_home_score;
                row.predicted_away_score = prediction.predicted_away_score;
                row.updated_at = prediction.updated_at;
                row.clone()
            }
            Entry::Vacant(vacant) => vacant.insert(prediction).value().clone(),
        };
        Ok(stored)
    }

    fn list_predictions<F>(&self, keep: F) -> StorageResult<Vec<PredictionEntity>>
    where
        F: Fn(&PredictionEntity) -> bool,
    {
        self.ensure_online("list predictions")?;
        let mut rows: Vec<PredictionEntity> = self
            .inner
            .predictions
            .iter()
            .filter(|entry| keep(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        rows.sort_by_key(|row| (row.created_at, row.user_id, row.match_id));
        Ok(rows)
    }
}

impl TippingStore for MemoryStore {
    fn transition_matches(
        &self,
        from: MatchStatus,
        to: MatchStatus,
        kicked_off_by: OffsetDateTime,
    ) -> BoxFuture<'static, StorageResult<u64>> {
        let store = self.clone();
        Box::pin(async move { store.transition_matches(from, to, kicked_off_by).await })
    }

    fn find_match(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<MatchEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_match(id).await })
    }

    fn list_matches(&self) -> BoxFuture<'static, StorageResult<Vec<MatchEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_matches().await })
    }

    fn insert_match(&self, entity: MatchEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.insert_match(entity).await })
    }

    fn delete_match(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { store.delete_match(id).await })
    }

    fn record_result(
        &self,
        id: Uuid,
        update: ResultUpdate,
    ) -> BoxFuture<'static, StorageResult<Option<MatchEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.record_result(id, update).await })
    }

    fn upsert_prediction(
        &self,
        prediction: PredictionEntity,
    ) -> BoxFuture<'static, StorageResult<PredictionEntity>> {
        let result = self.upsert_prediction(prediction);
        Box::pin(async move { result })
    }

    fn list_predictions_for_match(
        &self,
        match_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<PredictionEntity>>> {
        let result = self.list_predictions(|row| row.match_id == match_id);
        Box::pin(async move { result })
    }

    fn list_predictions_for_user(
        &self,
        user_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<PredictionEntity>>> {
        let result = self.list_predictions(|row| row.user_id == user_id);
        Box::pin(async move { result })
    }

    fn find_user(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<UserEntity>>> {
        let result = self
            .ensure_online("load user")
            .map(|()| self.inner.users.get(&id).map(|user| user.value().clone()));
        Box::pin(async move { result })
    }

    fn insert_user(&self, user: UserEntity) -> BoxFuture<'static, StorageResult<()>> {
        let result = self.ensure_online("save user").map(|()| {
            self.inner.users.insert(user.id, user);
        });
        Box::pin(async move { result })
    }

    fn list_clubs(&self) -> BoxFuture<'static, StorageResult<Vec<ClubEntity>>> {
        let result = self.ensure_online("list clubs").map(|()| {
            let mut clubs: Vec<ClubEntity> = self
                .inner
                .clubs
                .iter()
                .map(|entry| entry.value().clone())
                .collect();
            clubs.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
            clubs
        });
        Box::pin(async move { result })
    }

    fn insert_club(&self, club: ClubEntity) -> BoxFuture<'static, StorageResult<()>> {
        let result = self.ensure_online("save club").map(|()| {
            self.inner.clubs.insert(club.id, club);
        });
        Box::pin(async move { result })
    }

    fn delete_club(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let result = self
            .ensure_online("delete club")
            .map(|()| self.inner.clubs.remove(&id).is_some());
        Box::pin(async move { result })
    }

    fn list_time_slots(&self) -> BoxFuture<'static, StorageResult<Vec<TimeSlotEntity>>> {
        let result = self.ensure_online("list time slots").map(|()| {
            let mut slots: Vec<TimeSlotEntity> = self
                .inner
                .time_slots
                .iter()
                .map(|entry| entry.value().clone())
                .collect();
            slots.sort_by_key(|slot| (slot.starts_at, slot.id));
            slots
        });
        Box::pin(async move { result })
    }

    fn insert_time_slot(&self, slot: TimeSlotEntity) -> BoxFuture<'static, StorageResult<()>> {
        let result = self.ensure_online("save time slot").map(|()| {
            self.inner.time_slots.insert(slot.id, slot);
        });
        Box::pin(async move { result })
    }

    fn delete_time_slot(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let result = self
            .ensure_online("delete time slot")
            .map(|()| self.inner.time_slots.remove(&id).is_some());
        Box::pin(async move { result })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let result = self.ensure_online("health check");
        Box::pin(async move { result })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let result = self.ensure_online("reconnect");
        Box::pin(async move { result })
    }
}

#[cfg(test)]
mod tests {
    use time::{Duration, macros::datetime};

    use super::*;

    fn planned_match(kickoff: OffsetDateTime) -> MatchEntity {
        MatchEntity {
            id: Uuid::new_v4(),
            kickoff,
            home_club_id: Uuid::new_v4(),
            away_club_id: Uuid::new_v4(),
            home_score: None,
            away_score: None,
            status: MatchStatus::Planned,
        }
    }

    fn prediction(user_id: Uuid, match_id: Uuid, home: u16, away: u16) -> PredictionEntity {
        let at = datetime!(2026-06-01 12:00 UTC);
        PredictionEntity {
            user_id,
            match_id,
            predicted_home_score: home,
            predicted_away_score: away,
            created_at: at,
            updated_at: at,
        }
    }

    #[tokio::test]
    async fn transition_only_touches_matching_rows() {
        let store = MemoryStore::new();
        let now = datetime!(2026-06-01 18:00 UTC);
        let due = planned_match(now - Duration::minutes(1));
        let upcoming = planned_match(now + Duration::minutes(1));
        store.insert_match(due.clone()).await.unwrap();
        store.insert_match(upcoming.clone()).await.unwrap();

        let changed = TippingStore::transition_matches(
            &store,
            MatchStatus::Planned,
            MatchStatus::Live,
            now,
        )
        .await
        .unwrap();

        assert_eq!(changed, 1);
        let due = store.find_match(due.id).await.unwrap().unwrap();
        let upcoming = store.find_match(upcoming.id).await.unwrap().unwrap();
        assert_eq!(due.status, MatchStatus::Live);
        assert_eq!(upcoming.status, MatchStatus::Planned);
    }

    #[tokio::test]
    async fn upsert_keeps_one_row_and_created_at() {
        let store = MemoryStore::new();
        let (user_id, match_id) = (Uuid::new_v4(), Uuid::new_v4());

        let first = prediction(user_id, match_id, 1, 0);
        TippingStore::upsert_prediction(&store, first.clone())
            .await
            .unwrap();

        let mut second = prediction(user_id, match_id, 2, 2);
        second.created_at = first.created_at + Duration::hours(1);
        second.updated_at = second.created_at;
        let stored = TippingStore::upsert_prediction(&store, second.clone())
            .await
            .unwrap();

        assert_eq!(stored.created_at, first.created_at);
        assert_eq!(stored.updated_at, second.updated_at);
        assert_eq!(stored.predicted_home_score, 2);
        let rows = store.list_predictions_for_match(match_id).await.unwrap();
        assert_eq!(rows, vec![stored]);
    }

    #[tokio::test]
    async fn record_result_skips_planned_matches() {
        let store = MemoryStore::new();
        let entity = planned_match(datetime!(2026-06-01 18:00 UTC));
        store.insert_match(entity.clone()).await.unwrap();

        let update = ResultUpdate {
            home_score: 1,
            away_score: 1,
            finish: true,
        };
        let outcome = TippingStore::record_result(&store, entity.id, update)
            .await
            .unwrap();

        assert!(outcome.is_none());
        let stored = store.find_match(entity.id).await.unwrap().unwrap();
        assert_eq!(stored, entity);
    }

    #[tokio::test]
    async fn clubs_are_listed_by_name() {
        let store = MemoryStore::new();
        for name in ["Werder", "Bochum", "Mainz"] {
            store
                .insert_club(ClubEntity {
                    id: Uuid::new_v4(),
                    name: name.into(),
                })
                .await
                .unwrap();
        }

        let names: Vec<String> = store
            .list_clubs()
            .await
            .unwrap()
            .into_iter()
            .map(|club| club.name)
            .collect();
        assert_eq!(names, ["Bochum", "Mainz", "Werder"]);
    }

    #[tokio::test]
    async fn offline_store_fails_every_operation() {
        let store = MemoryStore::new();
        store.set_offline(true);

        assert!(store.health_check().await.is_err());
        assert!(TippingStore::list_matches(&store).await.is_err());

        store.set_offline(false);
        assert!(store.health_check().await.is_ok());
    }
}
