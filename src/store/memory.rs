use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{info, warn};

use super::{GameSession, SessionStore};
use crate::circuit::CircuitDescriptor;
use crate::error::{StoreError, StoreResult};
use crate::eval::{evaluate_answer, EvaluationResult};

/// In-memory session store.
///
/// Sessions live behind per-entry locks so that answering one game never
/// blocks another, and so the created-to-answered transition is atomic for
/// a given id. The outer map lock is held only for lookups and inserts,
/// never across an evaluation.
#[derive(Default)]
pub struct MemoryStore {
    sessions: RwLock<HashMap<String, Arc<RwLock<GameSession>>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    async fn entry(&self, game_id: &str) -> Option<Arc<RwLock<GameSession>>> {
        self.sessions.read().await.get(game_id).cloned()
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn create(&self, circuit: CircuitDescriptor) -> StoreResult<GameSession> {
        let session = GameSession::new(circuit);
        self.sessions
            .write()
            .await
            .insert(session.id.clone(), Arc::new(RwLock::new(session.clone())));
        info!(game_id = %session.id, "Game session created");
        Ok(session)
    }

    async fn get(&self, game_id: &str) -> StoreResult<Option<GameSession>> {
        match self.entry(game_id).await {
            Some(entry) => Ok(Some(entry.read().await.clone())),
            None => Ok(None),
        }
    }

    async fn record_answer(&self, game_id: &str, answer: Value) -> StoreResult<EvaluationResult> {
        let entry = self
            .entry(game_id)
            .await
            .ok_or_else(|| StoreError::SessionNotFound {
                game_id: game_id.to_string(),
            })?;

        let mut session = entry.write().await;
        if session.answered {
            if let Some(result) = &session.result {
                // First answer is authoritative; repeat submissions only
                // re-read it.
                warn!(game_id, "Repeat submission for answered session");
                return Ok(result.clone());
            }
        }

        let result = evaluate_answer(&session.circuit, &answer);
        session.answered = true;
        session.user_answer = Some(answer);
        session.result = Some(result.clone());
        Ok(result)
    }

    async fn sweep(&self, max_age: Duration) -> StoreResult<usize> {
        let cutoff = Utc::now() - max_age;
        let ids: Vec<String> = self.sessions.read().await.keys().cloned().collect();
        let mut removed = 0;

        for id in ids {
            let expired = match self.entry(&id).await {
                Some(entry) => entry.read().await.created_at < cutoff,
                None => false,
            };
            if !expired {
                continue;
            }
            // Re-check under the write lock; the snapshot above may be
            // stale by the time we get here.
            let mut sessions = self.sessions.write().await;
            if let Some(entry) = sessions.get(&id).cloned() {
                if entry.read().await.created_at < cutoff {
                    sessions.remove(&id);
                    removed += 1;
                }
            }
        }

        Ok(removed)
    }

    async fn count(&self) -> StoreResult<usize> {
        Ok(self.sessions.read().await.len())
    }
}
