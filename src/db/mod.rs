use crate::{
    error::GameError,
    models::{Game, GameId, Player, PlayerId},
};

pub mod memory;

pub use memory::MemoryStore;

/// Storage for players and games.
///
/// Implementations must make `insert_game` refuse a second unfinished game for
/// the same player atomically, so two concurrent starts cannot both succeed.
/// `save_game` is a compare-and-set on the game's revision for the same reason.
pub trait GameRepository: Send + Sync {
    fn find_player(&self, player_id: PlayerId) -> Option<Player>;

    fn save_player(&self, player: Player);

    /// Add `amount` to the player's balance and return the updated player
    fn credit_balance(&self, player_id: PlayerId, amount: u64) -> Result<Player, GameError>;

    fn find_game(&self, game_id: GameId) -> Option<Game>;

    /// The player's unfinished game, if any
    fn active_game_for(&self, player_id: PlayerId) -> Option<GameId>;

    fn insert_game(&self, game: Game) -> Result<(), GameError>;

    /// Persist `game` only if the stored copy is still at `expected_revision`
    /// and not finished. Fails with `GameFinished` or `ConcurrentUpdate`
    /// otherwise, leaving the stored game untouched.
    fn save_game(&self, game: &Game, expected_revision: u64) -> Result<(), GameError>;

    fn game_count(&self) -> usize;
}
