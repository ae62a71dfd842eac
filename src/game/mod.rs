// Game progression engine

pub mod engine;
pub mod help;
pub mod prizes;

pub use engine::{AnswerOutcome, GameEngine};
pub use prizes::{PrizeTable, QUESTIONS_PER_GAME};
