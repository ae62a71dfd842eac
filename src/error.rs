use thiserror::Error;

use crate::models::{GameId, HelpType, PlayerId};

/// Expected, user-facing failures of game operations. None of them are fatal
/// and none are worth retrying.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// Carries the unfinished game so the caller can send the player back to it
    #[error("player {player_id} already has game {game_id} in progress")]
    GameAlreadyInProgress { player_id: PlayerId, game_id: GameId },

    #[error("help {0} was already used in this game")]
    HelpAlreadyUsed(HelpType),

    #[error("invalid answer key {0:?}, expected one of a, b, c, d")]
    InvalidAnswerKey(String),

    #[error("unknown help type {0:?}")]
    UnknownHelpType(String),

    /// Missing game, or a game owned by another player
    #[error("game {0} not found")]
    GameNotFoundOrForbidden(GameId),

    #[error("player {0} not found")]
    PlayerNotFound(PlayerId),

    #[error("game {0} is already finished")]
    GameFinished(GameId),

    /// Another request changed the game after it was loaded
    #[error("game {0} was changed by another request")]
    ConcurrentUpdate(GameId),

    #[error("no question available for level {level}")]
    NotEnoughQuestions { level: usize },

    #[error("nothing to cash out in game {0} before the first correct answer")]
    EmptyCashOut(GameId),
}
