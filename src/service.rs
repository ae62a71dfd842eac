use rand::Rng;

use crate::{
    config::GameConfig,
    db::GameRepository,
    error::GameError,
    game::{AnswerOutcome, GameEngine, PrizeTable},
    models::{AnswerKey, Game, GameId, HelpType, Player, PlayerId},
    questions::QuestionPool,
};

/// Entry point for a request layer: every call names the acting player and
/// is checked against game ownership before the engine runs.
pub struct GameService<R> {
    repository: R,
    engine: GameEngine,
    pool: QuestionPool,
    config: GameConfig,
}

impl<R: GameRepository> GameService<R> {
    pub fn new(repository: R, pool: QuestionPool, config: GameConfig) -> Self {
        let engine =
            GameEngine::new(PrizeTable::STANDARD).with_friend_call_accuracy(config.friend_call_accuracy);
        Self {
            repository,
            engine,
            pool,
            config,
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    pub fn register_player(&self, player_id: PlayerId, name: &str) -> Player {
        let player = Player::new(player_id, name);
        self.repository.save_player(player.clone());
        tracing::info!("Registered player {} ({})", name, player_id);
        player
    }

    /// Start a new game. Fails with `GameAlreadyInProgress` (naming the
    /// unfinished game) if the player already has one; nothing is created then.
    pub fn start_game(&self, player_id: PlayerId, rng: &mut impl Rng) -> Result<Game, GameError> {
        self.player(player_id)?;

        if let Some(game_id) = self.repository.active_game_for(player_id) {
            tracing::warn!(
                "Player {} tried to start a game while game {} is in progress",
                player_id,
                game_id
            );
            return Err(GameError::GameAlreadyInProgress { player_id, game_id });
        }

        let questions = self.pool.draw(rng)?;
        let game = self.engine.start_game(player_id, questions, rng)?;
        self.repository.insert_game(game.clone())?;

        tracing::info!("Player {} started game {}", player_id, game.game_id);
        Ok(game)
    }

    pub fn show(&self, player_id: PlayerId, game_id: GameId) -> Result<Game, GameError> {
        self.owned_game(player_id, game_id)
    }

    /// Answer the current question with a letter `a`..`d`
    pub fn answer(
        &self,
        player_id: PlayerId,
        game_id: GameId,
        letter: &str,
    ) -> Result<(Game, AnswerOutcome), GameError> {
        let mut game = self.owned_game(player_id, game_id)?;
        let key: AnswerKey = letter.parse()?;

        let level = game.current_level();
        let outcome = self.engine.answer(&mut game, key)?;
        self.commit(&mut game)?;

        tracing::debug!(
            "Game {}: answer {} at level {} -> {:?}",
            game_id,
            key,
            level,
            outcome
        );
        match outcome {
            AnswerOutcome::Advanced { .. } => {}
            AnswerOutcome::Won { prize } | AnswerOutcome::Failed { prize, .. } => {
                self.settle(&game, prize)?;
            }
        }

        Ok((game, outcome))
    }

    /// End the game and credit the current level's prize to the player
    pub fn take_money(&self, player_id: PlayerId, game_id: GameId) -> Result<Game, GameError> {
        let mut game = self.owned_game(player_id, game_id)?;

        if game.current_level() == 0 && !game.finished() {
            if !self.config.allow_empty_cash_out {
                tracing::warn!("Game {}: refused cash-out before first correct answer", game_id);
                return Err(GameError::EmptyCashOut(game_id));
            }
            tracing::warn!("Game {}: cashing out before first correct answer", game_id);
        }

        let prize = self.engine.take_money(&mut game)?;
        self.commit(&mut game)?;
        self.settle(&game, prize)?;

        Ok(game)
    }

    /// Use a lifeline by name (`fifty_fifty`, `audience_help`, `friend_call`)
    pub fn use_help(
        &self,
        player_id: PlayerId,
        game_id: GameId,
        help_type: &str,
        rng: &mut impl Rng,
    ) -> Result<Game, GameError> {
        let mut game = self.owned_game(player_id, game_id)?;
        let help_type: HelpType = help_type.parse()?;

        if let Err(e) = self.engine.use_help(&mut game, help_type, rng) {
            tracing::warn!("Game {}: help {} rejected: {}", game_id, help_type, e);
            return Err(e);
        }
        self.commit(&mut game)?;

        tracing::debug!(
            "Game {}: used {} at level {}",
            game_id,
            help_type,
            game.current_level()
        );
        Ok(game)
    }

    fn player(&self, player_id: PlayerId) -> Result<Player, GameError> {
        self.repository
            .find_player(player_id)
            .ok_or(GameError::PlayerNotFound(player_id))
    }

    /// Missing games and other players' games are indistinguishable to the caller
    fn owned_game(&self, player_id: PlayerId, game_id: GameId) -> Result<Game, GameError> {
        match self.repository.find_game(game_id) {
            Some(game) if game.player_id == player_id => Ok(game),
            Some(_) => {
                tracing::warn!(
                    "Player {} requested game {} owned by another player",
                    player_id,
                    game_id
                );
                Err(GameError::GameNotFoundOrForbidden(game_id))
            }
            None => Err(GameError::GameNotFoundOrForbidden(game_id)),
        }
    }

    /// Store the changed game. Fails if another request saved it first, so a
    /// game is only ever settled once.
    fn commit(&self, game: &mut Game) -> Result<(), GameError> {
        let expected = game.revision;
        game.revision += 1;
        if let Err(e) = self.repository.save_game(game, expected) {
            tracing::warn!("Game {}: discarding update: {}", game.game_id, e);
            return Err(e);
        }
        Ok(())
    }

    fn settle(&self, game: &Game, prize: u64) -> Result<(), GameError> {
        tracing::info!(
            "Game {} finished with status {} and prize {}",
            game.game_id,
            game.status(),
            prize
        );
        if prize > 0 {
            self.repository.credit_balance(game.player_id, prize)?;
        }
        Ok(())
    }
}
