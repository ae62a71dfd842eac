use dashmap::{mapref::entry::Entry, DashMap};

use super::GameRepository;
use crate::{
    error::GameError,
    models::{Game, GameId, Player, PlayerId},
};

/// In-memory repository
#[derive(Default)]
pub struct MemoryStore {
    players: DashMap<PlayerId, Player>,
    games: DashMap<GameId, Game>,
    /// Unfinished game per player
    active_games: DashMap<PlayerId, GameId>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GameRepository for MemoryStore {
    fn find_player(&self, player_id: PlayerId) -> Option<Player> {
        self.players.get(&player_id).map(|p| p.value().clone())
    }

    fn save_player(&self, player: Player) {
        self.players.insert(player.player_id, player);
    }

    fn credit_balance(&self, player_id: PlayerId, amount: u64) -> Result<Player, GameError> {
        let mut player = self
            .players
            .get_mut(&player_id)
            .ok_or(GameError::PlayerNotFound(player_id))?;
        player.balance = player.balance.saturating_add(amount);
        Ok(player.value().clone())
    }

    fn find_game(&self, game_id: GameId) -> Option<Game> {
        self.games.get(&game_id).map(|g| g.value().clone())
    }

    fn active_game_for(&self, player_id: PlayerId) -> Option<GameId> {
        self.active_games.get(&player_id).map(|id| *id)
    }

    fn insert_game(&self, game: Game) -> Result<(), GameError> {
        // The entry guard holds the shard lock until the game is stored
        match self.active_games.entry(game.player_id) {
            Entry::Occupied(existing) => Err(GameError::GameAlreadyInProgress {
                player_id: game.player_id,
                game_id: *existing.get(),
            }),
            Entry::Vacant(slot) => {
                if !game.finished() {
                    slot.insert(game.game_id);
                }
                self.games.insert(game.game_id, game);
                Ok(())
            }
        }
    }

    fn save_game(&self, game: &Game, expected_revision: u64) -> Result<(), GameError> {
        // The write guard holds the shard lock across check and replace
        let mut stored = self
            .games
            .get_mut(&game.game_id)
            .ok_or(GameError::GameNotFoundOrForbidden(game.game_id))?;
        if stored.finished() {
            return Err(GameError::GameFinished(game.game_id));
        }
        if stored.revision != expected_revision {
            return Err(GameError::ConcurrentUpdate(game.game_id));
        }
        *stored = game.clone();
        drop(stored);

        if game.finished() {
            self.active_games
                .remove_if(&game.player_id, |_, active| *active == game.game_id);
        }
        Ok(())
    }

    fn game_count(&self) -> usize {
        self.games.len()
    }
}
