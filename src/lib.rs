//! # Circuit Game Server
//!
//! An educational logic-gate circuit game engine: circuits are produced by
//! a hosted generator, defended by deterministic validation, and scored by
//! tier-specific evaluation strategies.
//!
//! ## Features
//!
//! - **Gate evaluation**: pure truth-table semantics for the 7 gate types
//! - **Tiered rounds**: single-output, multiple-cases, and
//!   pattern-analysis circuits keyed to difficulty
//! - **Generator defense**: strict schema conversion, consistency replay,
//!   and diversity checks on every untrusted candidate
//! - **Fallback guarantee**: hand-authored emergency circuits so game
//!   creation never fails
//! - **Idempotent sessions**: one answer per game, first writer wins
//!
//! ## Architecture
//!
//! ```text
//! HTTP Client → axum handlers → GameEngine → Generator API (HTTP)
//!                                   ↓
//!                          SessionStore (in-memory)
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use circuit_game_server::{Config, GameEngine, MemoryStore};
//! use circuit_game_server::generator::GeneratorClient;
//! use circuit_game_server::store::SessionStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let generator = GeneratorClient::new(&config.generator, config.request.clone())?;
//!     let store: Arc<dyn SessionStore> = Arc::new(MemoryStore::new());
//!     let engine = GameEngine::new(generator, store, config.game.clone());
//!     let state = Arc::new(circuit_game_server::server::AppState { engine });
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8000").await?;
//!     axum::serve(listener, circuit_game_server::server::router(state)).await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

/// Circuit domain model: gates, descriptors, validation, simulation.
pub mod circuit;
/// Configuration management for the server.
pub mod config;
/// Game engine orchestrating generation, validation, and sessions.
pub mod engine;
/// Error types and result aliases for the application.
pub mod error;
/// Tiered answer evaluation strategies.
pub mod eval;
/// Circuit generator API client and wire types.
pub mod generator;
/// HTTP server implementation and request handling.
pub mod server;
/// Session storage layer.
pub mod store;

pub use config::Config;
pub use engine::GameEngine;
pub use error::{AppError, AppResult};
pub use eval::EvaluationResult;
pub use store::MemoryStore;
