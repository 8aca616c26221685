//! Test utilities
//!
//! Service tests run against `MemoryStore` and a `ManualClock`.

use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::config::Config;
use crate::db::MemoryStore;
use crate::models::{
    Competition, CompetitionDraft, CompetitionEntry, NewEntry, NewParameter, Principal, Rubric,
};
use crate::services::{CompetitionService, EntryService, RubricService};
use crate::state::AppState;
use crate::utils::ManualClock;

pub fn admin() -> Principal {
    Principal::admin(Uuid::new_v4())
}

pub fn user() -> Principal {
    Principal::user(Uuid::new_v4())
}

/// State over a fresh in-memory store with a controllable clock
pub struct TestContext {
    pub state: AppState,
    pub store: Arc<MemoryStore>,
    pub clock: Arc<ManualClock>,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let state = AppState::new(store.clone(), clock.clone(), config);
        Self {
            state,
            store,
            clock,
        }
    }

    /// Taste 40, Color 30, Aroma 30
    pub async fn rubric(&self) -> Rubric {
        RubricService::create(
            &self.state,
            &admin(),
            &format!("Tea {}", Uuid::new_v4()),
            vec![
                NewParameter::new("Taste", 40),
                NewParameter::new("Color", 30),
                NewParameter::new("Aroma", 30),
            ],
        )
        .await
        .expect("Failed to create rubric")
    }

    /// Open competition with a deadline one day ahead
    pub async fn competition(&self, creator: &Principal, model_id: Uuid) -> Competition {
        let draft = CompetitionDraft {
            name: "Harvest cup".to_string(),
            description: None,
            model_id: Some(model_id),
            creator_id: None,
            deadline: Some(self.clock_now() + Duration::days(1)),
        };
        CompetitionService::create(&self.state, creator, draft, &[])
            .await
            .expect("Failed to create competition")
    }

    pub async fn entry(&self, competition: &Competition, name: &str) -> CompetitionEntry {
        EntryService::add_entry(
            &self.state,
            competition.id,
            NewEntry {
                name: name.to_string(),
                description: None,
                file_path: None,
                contestant_id: None,
            },
        )
        .await
        .expect("Failed to add entry")
    }

    fn clock_now(&self) -> chrono::DateTime<Utc> {
        self.state.now()
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
