//! Round orchestration.
//!
//! The engine ties the generator client, the circuit checks, and the
//! session store together. Its one hard promise: creating a game never
//! fails because of the generator — candidates that error, fail the
//! consistency replay, or get rejected for lack of diversity are retried a
//! bounded number of times and then replaced from the emergency pool.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::circuit::{self, CircuitDescriptor, ComplexityType, Difficulty};
use crate::config::GameConfig;
use crate::error::AppResult;
use crate::eval::EvaluationResult;
use crate::generator::{CircuitRequest, GeneratorClient};
use crate::store::{GameSession, SessionStore};

/// Client-facing payload for a newly created round.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedGame {
    /// Session id for later submissions.
    pub game_id: String,
    /// Answer-hidden circuit view.
    pub circuit: Value,
}

/// Client-facing session state.
#[derive(Debug, Clone, Serialize)]
pub struct SessionStatus {
    /// Session id.
    pub game_id: String,
    /// Whether an answer has been recorded.
    pub answered: bool,
    /// Evaluation of the recorded answer, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<EvaluationResult>,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
    /// Answer-hidden circuit view.
    pub circuit: Value,
}

impl From<GameSession> for SessionStatus {
    fn from(session: GameSession) -> Self {
        Self {
            game_id: session.id,
            answered: session.answered,
            result: session.result,
            created_at: session.created_at,
            circuit: session.circuit.public_view(),
        }
    }
}

/// The logic-game engine.
pub struct GameEngine {
    generator: GeneratorClient,
    store: Arc<dyn SessionStore>,
    config: GameConfig,
}

impl GameEngine {
    /// Create an engine over a generator client and a session store.
    pub fn new(generator: GeneratorClient, store: Arc<dyn SessionStore>, config: GameConfig) -> Self {
        Self {
            generator,
            store,
            config,
        }
    }

    /// Create a new round at the given difficulty.
    ///
    /// The complexity tier defaults from the difficulty when the request
    /// does not pick one. Generator trouble is absorbed here; the caller
    /// always receives a playable circuit.
    pub async fn create_game(
        &self,
        difficulty: Difficulty,
        complexity: Option<ComplexityType>,
    ) -> AppResult<CreatedGame> {
        let tier = complexity.unwrap_or_else(|| difficulty.default_complexity());

        // Generator I/O happens before any store lock is taken.
        let descriptor = self.obtain_circuit(difficulty, tier).await;
        let session = self.store.create(descriptor).await?;

        info!(
            game_id = %session.id,
            difficulty = %difficulty,
            complexity = %tier,
            "Logic game created"
        );

        Ok(CreatedGame {
            game_id: session.id,
            circuit: session.circuit.public_view(),
        })
    }

    /// Submit an answer for a session.
    ///
    /// Idempotent per session: the first answer is evaluated and stored,
    /// later submissions get that stored result back.
    pub async fn submit_answer(&self, game_id: &str, answer: Value) -> AppResult<EvaluationResult> {
        let result = self.store.record_answer(game_id, answer).await?;
        info!(
            game_id,
            correct = result.correct,
            partial_score = result.partial_score,
            "Answer recorded"
        );
        Ok(result)
    }

    /// Fetch the public state of a session.
    pub async fn game_status(&self, game_id: &str) -> AppResult<Option<SessionStatus>> {
        Ok(self.store.get(game_id).await?.map(SessionStatus::from))
    }

    /// Sweep sessions older than the configured TTL.
    pub async fn sweep_expired(&self) -> AppResult<usize> {
        let max_age = chrono::Duration::hours(self.config.session_ttl_hours);
        Ok(self.store.sweep(max_age).await?)
    }

    /// Obtain an accepted circuit: bounded generation attempts, then the
    /// emergency pool.
    ///
    /// Each attempt must clear three independent hurdles in order — strict
    /// schema conversion, the consistency replay, and the diversity
    /// checks. A circuit can be internally consistent yet still too simple
    /// to be educational, so none of the hurdles subsumes another.
    async fn obtain_circuit(
        &self,
        difficulty: Difficulty,
        tier: ComplexityType,
    ) -> CircuitDescriptor {
        let max_attempts = self.config.max_generation_attempts;
        for attempt in 0..=max_attempts {
            let request = CircuitRequest::new(difficulty, tier);
            let candidate = match self.generator.generate(request).await {
                Ok(candidate) => candidate,
                Err(e) => {
                    warn!(attempt, error = %e, "Generator call failed");
                    continue;
                }
            };

            let descriptor = match candidate.into_descriptor(difficulty) {
                Ok(descriptor) => descriptor,
                Err(e) => {
                    warn!(
                        attempt,
                        difficulty = %difficulty,
                        complexity = %tier,
                        error = %e,
                        "Candidate failed schema validation"
                    );
                    continue;
                }
            };

            let report = circuit::simulate(&descriptor);
            if !report.valid {
                warn!(
                    attempt,
                    difficulty = %difficulty,
                    complexity = %tier,
                    reason = report.message.as_deref().unwrap_or("step mismatch"),
                    "Candidate failed consistency replay"
                );
                continue;
            }

            if let Err(rejection) = circuit::validate(&descriptor) {
                warn!(
                    attempt,
                    difficulty = %difficulty,
                    complexity = %tier,
                    rejection = %rejection,
                    "Candidate rejected by diversity checks"
                );
                continue;
            }

            return descriptor;
        }

        warn!(
            difficulty = %difficulty,
            complexity = %tier,
            attempts = max_attempts + 1,
            "Generator exhausted, serving emergency circuit"
        );
        circuit::supply(tier, difficulty)
    }
}
