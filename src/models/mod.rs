pub mod game;
pub mod player;
pub mod question;

pub use game::{
    // Aggregate root
    Game, GameId, GameStatus,
    // Per-question state
    FriendCall, GameQuestion, HelpState, HelpType,
};
pub use player::{Player, PlayerId};
pub use question::{AnswerKey, Question, ANSWER_COUNT};
