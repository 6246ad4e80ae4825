//! Game session persistence.
//!
//! Sessions are keyed by opaque game id and move through exactly two
//! states: created, then answered. The store owns that transition; the
//! first successful answer wins and later submissions re-read its result.

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::circuit::CircuitDescriptor;
use crate::error::StoreResult;
use crate::eval::EvaluationResult;

/// One logic-game round and its answer state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSession {
    /// Opaque session identifier.
    pub id: String,
    /// The accepted circuit, answer values included; never sent to the
    /// client unmasked.
    pub circuit: CircuitDescriptor,
    /// Whether an answer has been recorded.
    pub answered: bool,
    /// The first submitted answer, verbatim.
    pub user_answer: Option<Value>,
    /// Evaluation of the first answer; immutable once set.
    pub result: Option<EvaluationResult>,
    /// When the session was created; drives expiry.
    pub created_at: DateTime<Utc>,
}

impl GameSession {
    /// Create a fresh, unanswered session for an accepted circuit.
    pub fn new(circuit: CircuitDescriptor) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            circuit,
            answered: false,
            user_answer: None,
            result: None,
            created_at: Utc::now(),
        }
    }
}

/// Keyed session storage.
///
/// Implementations must make the answer transition atomic per session id:
/// two racing submissions for one id may not both evaluate.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Persist a new session for an accepted circuit.
    async fn create(&self, circuit: CircuitDescriptor) -> StoreResult<GameSession>;

    /// Fetch a session snapshot by id.
    async fn get(&self, game_id: &str) -> StoreResult<Option<GameSession>>;

    /// Record an answer and return its evaluation.
    ///
    /// Idempotent: once a session is answered, every later call returns
    /// the stored result unchanged, whatever the new answer says.
    async fn record_answer(&self, game_id: &str, answer: Value) -> StoreResult<EvaluationResult>;

    /// Remove sessions older than `max_age`; returns how many went away.
    async fn sweep(&self, max_age: Duration) -> StoreResult<usize>;

    /// Number of live sessions.
    async fn count(&self) -> StoreResult<usize>;
}
