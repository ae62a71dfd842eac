//! Game progression backend for a "who wants to be a millionaire" style quiz.
//!
//! [`game::GameEngine`] holds the rules: answering, lifelines and cashing out.
//! [`service::GameService`] wraps it with ownership checks, the one active game
//! per player rule, and balance crediting over a [`db::GameRepository`].

pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod game;
pub mod logging;
pub mod models;
pub mod questions;
pub mod service;

pub use config::{Config, GameConfig};
pub use db::{GameRepository, MemoryStore};
pub use error::GameError;
pub use game::{AnswerOutcome, GameEngine, PrizeTable, QUESTIONS_PER_GAME};
pub use models::{AnswerKey, Game, GameId, GameQuestion, GameStatus, HelpType, Player, PlayerId, Question};
pub use questions::QuestionPool;
pub use service::GameService;
