#![allow(dead_code)]

use std::sync::Arc;

use time::{Duration, OffsetDateTime, macros::datetime};
use tipping_back::{
    clock::ManualClock,
    config::AppConfig,
    dao::{
        models::{MatchEntity, MatchStatus, UserEntity, UserRole},
        tipping_store::{MemoryStore, TippingStore},
    },
    state::{AppState, SharedState},
};
use uuid::Uuid;

pub const START: OffsetDateTime = datetime!(2026-05-09 15:00 UTC);

pub struct Harness {
    pub state: SharedState,
    pub store: MemoryStore,
    pub clock: Arc<ManualClock>,
}

/// Shared state over an empty memory store, 10 + 10 minute matches and no read debounce.
pub async fn harness() -> Harness {
    let config = AppConfig {
        read_debounce: Duration::ZERO,
        ..AppConfig::default()
    };
    let store = MemoryStore::new();
    let clock = Arc::new(ManualClock::new(START));
    let state = AppState::with_store(config, clock.clone(), Arc::new(store.clone())).await;
    Harness {
        state,
        store,
        clock,
    }
}

impl Harness {
    /// Insert a match with an explicit stored status, bypassing the timer.
    pub async fn seed_match(&self, kickoff: OffsetDateTime, status: MatchStatus) -> Uuid {
        let id = Uuid::new_v4();
        TippingStore::insert_match(
            &self.store,
            MatchEntity {
                id,
                kickoff,
                home_club_id: Uuid::new_v4(),
                away_club_id: Uuid::new_v4(),
                home_score: None,
                away_score: None,
                status,
            },
        )
        .await
        .expect("insert match");
        id
    }

    pub async fn seed_user(&self, role: UserRole) -> Uuid {
        let id = Uuid::new_v4();
        TippingStore::insert_user(
            &self.store,
            UserEntity {
                id,
                name: format!("{} {id}", role.as_str()),
                role,
            },
        )
        .await
        .expect("insert user");
        id
    }

    pub async fn store_match(&self, id: Uuid) -> MatchEntity {
        TippingStore::find_match(&self.store, id)
            .await
            .expect("load match")
            .expect("match exists")
    }

    pub async fn status_of(&self, id: Uuid) -> MatchStatus {
        self.store_match(id).await.status
    }
}
