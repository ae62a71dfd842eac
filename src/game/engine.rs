use std::collections::BTreeSet;

use chrono::Utc;
use rand::Rng;
use serde::Serialize;
use uuid::Uuid;

use super::{
    help::{self, DEFAULT_FRIEND_CALL_ACCURACY},
    prizes::{PrizeTable, QUESTIONS_PER_GAME},
};
use crate::{
    error::GameError,
    models::{AnswerKey, Game, GameQuestion, GameStatus, HelpType, PlayerId, Question},
};

/// What happened after an answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum AnswerOutcome {
    /// Correct, moved on to `level`
    Advanced { level: usize },
    /// Correct on the last question
    Won { prize: u64 },
    /// Wrong; the game ends with the fireproof prize
    Failed { prize: u64, correct_key: AnswerKey },
}

/// Game progression rules. Holds no game state of its own.
#[derive(Debug, Clone)]
pub struct GameEngine {
    prizes: PrizeTable,
    friend_call_accuracy: u8,
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new(PrizeTable::STANDARD)
    }
}

impl GameEngine {
    pub fn new(prizes: PrizeTable) -> Self {
        Self {
            prizes,
            friend_call_accuracy: DEFAULT_FRIEND_CALL_ACCURACY,
        }
    }

    pub fn with_friend_call_accuracy(mut self, accuracy: u8) -> Self {
        self.friend_call_accuracy = accuracy.min(100);
        self
    }

    pub fn prizes(&self) -> &PrizeTable {
        &self.prizes
    }

    /// Build a fresh game from one question per level, in level order.
    /// Questions past the fifteenth are ignored.
    pub fn start_game(
        &self,
        player_id: PlayerId,
        questions: Vec<Question>,
        rng: &mut impl Rng,
    ) -> Result<Game, GameError> {
        if questions.len() < QUESTIONS_PER_GAME {
            return Err(GameError::NotEnoughQuestions {
                level: questions.len(),
            });
        }

        let game_questions = questions
            .into_iter()
            .take(QUESTIONS_PER_GAME)
            .map(|question| GameQuestion::shuffled(question, rng))
            .collect();

        Ok(Game {
            game_id: Uuid::new_v4(),
            player_id,
            game_questions,
            current_level: 0,
            status: GameStatus::InProgress,
            prize: 0,
            used_helps: BTreeSet::new(),
            revision: 0,
            created_at: Utc::now(),
            finished_at: None,
        })
    }

    /// Answer the current question
    pub fn answer(&self, game: &mut Game, key: AnswerKey) -> Result<AnswerOutcome, GameError> {
        Self::ensure_in_progress(game)?;

        let question = game.current_game_question();
        if !question.answer_correct(key) {
            let correct_key = question.correct_answer_key();
            let prize = self.prizes.fireproof_prize(game.current_level);
            Self::finish(game, GameStatus::Fail, prize);
            return Ok(AnswerOutcome::Failed { prize, correct_key });
        }

        if game.current_level == QUESTIONS_PER_GAME - 1 {
            let prize = self.prizes.top_prize();
            Self::finish(game, GameStatus::Won, prize);
            return Ok(AnswerOutcome::Won { prize });
        }

        game.current_level += 1;
        Ok(AnswerOutcome::Advanced {
            level: game.current_level,
        })
    }

    /// Apply a lifeline to the current question
    pub fn use_help(
        &self,
        game: &mut Game,
        help_type: HelpType,
        rng: &mut impl Rng,
    ) -> Result<(), GameError> {
        Self::ensure_in_progress(game)?;
        if game.help_used(help_type) {
            return Err(GameError::HelpAlreadyUsed(help_type));
        }

        let accuracy = self.friend_call_accuracy;
        let question = game.current_game_question_mut();
        let correct = question.correct_answer_key();
        match help_type {
            HelpType::FiftyFifty => {
                question.help.fifty_fifty = Some(help::fifty_fifty(correct, rng));
            }
            HelpType::AudienceHelp => {
                question.help.audience_help = Some(help::audience_distribution(correct, rng));
            }
            HelpType::FriendCall => {
                question.help.friend_call = Some(help::friend_call(correct, accuracy, rng));
            }
        }

        game.used_helps.insert(help_type);
        Ok(())
    }

    /// Cash out with the prize held at the current level. Returns the prize.
    pub fn take_money(&self, game: &mut Game) -> Result<u64, GameError> {
        Self::ensure_in_progress(game)?;

        let prize = self.prizes.prize_at(game.current_level);
        Self::finish(game, GameStatus::Money, prize);
        Ok(prize)
    }

    fn ensure_in_progress(game: &Game) -> Result<(), GameError> {
        if game.finished() {
            return Err(GameError::GameFinished(game.game_id));
        }
        Ok(())
    }

    fn finish(game: &mut Game, status: GameStatus, prize: u64) {
        game.status = status;
        game.prize = prize;
        game.finished_at = Some(Utc::now());
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use proptest::prelude::*;
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    pub(crate) fn sample_questions() -> Vec<Question> {
        (0..QUESTIONS_PER_GAME as u8)
            .map(|level| {
                Question::new(
                    level,
                    format!("Question {}", level),
                    format!("right {}", level),
                    [
                        format!("wrong {}-1", level),
                        format!("wrong {}-2", level),
                        format!("wrong {}-3", level),
                    ],
                )
            })
            .collect()
    }

    fn new_game(seed: u64) -> (GameEngine, Game, StdRng) {
        let engine = GameEngine::default();
        let mut rng = StdRng::seed_from_u64(seed);
        let game = engine.start_game(1, sample_questions(), &mut rng).unwrap();
        (engine, game, rng)
    }

    fn wrong_key(game: &Game) -> AnswerKey {
        let correct = game.current_game_question().correct_answer_key();
        AnswerKey::ALL.into_iter().find(|k| *k != correct).unwrap()
    }

    fn answer_correctly(engine: &GameEngine, game: &mut Game, times: usize) {
        for _ in 0..times {
            let key = game.current_game_question().correct_answer_key();
            engine.answer(game, key).unwrap();
        }
    }

    #[test]
    fn test_start_game() {
        let (_, game, _) = new_game(1);
        assert_eq!(game.status(), GameStatus::InProgress);
        assert!(!game.finished());
        assert_eq!(game.current_level(), 0);
        assert_eq!(game.prize(), 0);
        assert_eq!(game.game_questions().len(), QUESTIONS_PER_GAME);
        assert!(HelpType::ALL.iter().all(|help| !game.help_used(*help)));
        assert_eq!(game.current_game_question().level(), 0);
    }

    #[test]
    fn test_start_game_needs_fifteen_questions() {
        let engine = GameEngine::default();
        let mut questions = sample_questions();
        questions.truncate(10);
        let result = engine.start_game(1, questions, &mut StdRng::seed_from_u64(0));
        assert_eq!(result, Err(GameError::NotEnoughQuestions { level: 10 }));
    }

    #[test]
    fn test_correct_answer_advances_one_level() {
        let (engine, mut game, _) = new_game(2);
        let key = game.current_game_question().correct_answer_key();

        let outcome = engine.answer(&mut game, key).unwrap();

        assert_eq!(outcome, AnswerOutcome::Advanced { level: 1 });
        assert_eq!(game.current_level(), 1);
        assert_eq!(game.status(), GameStatus::InProgress);
        assert_eq!(game.previous_game_question().unwrap().level(), 0);
    }

    #[test]
    fn test_last_correct_answer_wins_top_prize() {
        let (engine, mut game, _) = new_game(3);
        answer_correctly(&engine, &mut game, QUESTIONS_PER_GAME - 1);
        assert_eq!(game.current_level(), 14);

        let key = game.current_game_question().correct_answer_key();
        let outcome = engine.answer(&mut game, key).unwrap();

        assert_eq!(outcome, AnswerOutcome::Won { prize: 1_000_000 });
        assert_eq!(game.status(), GameStatus::Won);
        assert_eq!(game.prize(), engine.prizes().top_prize());
        assert_eq!(game.current_level(), 14);
        assert!(game.finished_at.is_some());
    }

    #[test]
    fn test_wrong_answer_fails_at_any_level() {
        for level in [0, 3, 7, 14] {
            let (engine, mut game, _) = new_game(4);
            answer_correctly(&engine, &mut game, level);

            let key = wrong_key(&game);
            let outcome = engine.answer(&mut game, key).unwrap();

            assert!(matches!(outcome, AnswerOutcome::Failed { .. }));
            assert_eq!(game.status(), GameStatus::Fail);
            assert!(game.finished());
            assert_eq!(game.current_level(), level);
        }
    }

    #[test]
    fn test_wrong_answer_keeps_fireproof_prize() {
        let (engine, mut game, _) = new_game(5);
        answer_correctly(&engine, &mut game, 7);
        let correct = game.current_game_question().correct_answer_key();

        let key = wrong_key(&game);
        let outcome = engine.answer(&mut game, key).unwrap();

        assert_eq!(
            outcome,
            AnswerOutcome::Failed {
                prize: 1_000,
                correct_key: correct
            }
        );
        assert_eq!(game.prize(), 1_000);
    }

    #[test]
    fn test_take_money_banks_current_level() {
        let (engine, mut game, _) = new_game(6);
        answer_correctly(&engine, &mut game, 2);

        let prize = engine.take_money(&mut game).unwrap();

        assert_eq!(prize, 200);
        assert_eq!(game.prize(), 200);
        assert_eq!(game.status(), GameStatus::Money);
        assert!(game.finished());
    }

    #[test]
    fn test_take_money_at_level_zero_yields_nothing() {
        let (engine, mut game, _) = new_game(7);
        assert_eq!(engine.take_money(&mut game).unwrap(), 0);
        assert_eq!(game.status(), GameStatus::Money);
    }

    #[test]
    fn test_finished_game_is_immutable() {
        let (engine, mut game, mut rng) = new_game(8);
        answer_correctly(&engine, &mut game, 3);
        engine.take_money(&mut game).unwrap();
        let snapshot = game.clone();
        let id = game.game_id;

        let key = game.current_game_question().correct_answer_key();
        assert_eq!(engine.answer(&mut game, key), Err(GameError::GameFinished(id)));
        assert_eq!(engine.take_money(&mut game), Err(GameError::GameFinished(id)));
        assert_eq!(
            engine.use_help(&mut game, HelpType::FiftyFifty, &mut rng),
            Err(GameError::GameFinished(id))
        );
        assert_eq!(game, snapshot);
    }

    #[test]
    fn test_fifty_fifty() {
        let (engine, mut game, mut rng) = new_game(9);
        assert!(!game.fifty_fifty_used());
        assert!(game.current_game_question().help.fifty_fifty.is_none());

        engine
            .use_help(&mut game, HelpType::FiftyFifty, &mut rng)
            .unwrap();

        let question = game.current_game_question();
        let visible = question.help.fifty_fifty.as_ref().unwrap();
        assert!(game.fifty_fifty_used());
        assert_eq!(game.status(), GameStatus::InProgress);
        assert_eq!(visible.len(), 2);
        assert!(visible.contains(&question.correct_answer_key()));
    }

    #[test]
    fn test_help_cannot_be_reused() {
        let (engine, mut game, mut rng) = new_game(10);
        for help in HelpType::ALL {
            engine.use_help(&mut game, help, &mut rng).unwrap();
            assert_eq!(
                engine.use_help(&mut game, help, &mut rng),
                Err(GameError::HelpAlreadyUsed(help))
            );
        }

        // Reuse is blocked on later questions too
        answer_correctly(&engine, &mut game, 1);
        assert_eq!(
            engine.use_help(&mut game, HelpType::FiftyFifty, &mut rng),
            Err(GameError::HelpAlreadyUsed(HelpType::FiftyFifty))
        );
        assert!(game.current_game_question().help.fifty_fifty.is_none());
    }

    #[test]
    fn test_audience_and_friend_help_fill_current_question() {
        let (engine, mut game, mut rng) = new_game(11);
        let engine = engine.with_friend_call_accuracy(100);
        engine
            .use_help(&mut game, HelpType::AudienceHelp, &mut rng)
            .unwrap();
        engine
            .use_help(&mut game, HelpType::FriendCall, &mut rng)
            .unwrap();

        let question = game.current_game_question();
        assert_eq!(question.help.audience_help.as_ref().unwrap().len(), 4);
        assert_eq!(
            question.help.friend_call.as_ref().unwrap().suggested,
            question.correct_answer_key()
        );
        assert!(game.audience_help_used());
        assert!(game.friend_call_used());
    }

    #[derive(Debug, Clone)]
    enum Op {
        Answer(bool),
        Help(usize),
        TakeMoney,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            4 => any::<bool>().prop_map(Op::Answer),
            1 => (0..HelpType::ALL.len()).prop_map(Op::Help),
            1 => Just(Op::TakeMoney),
        ]
    }

    proptest! {
        /// Property: finished flag always mirrors the status, and levels never go back
        #[test]
        fn prop_finished_matches_status(seed in any::<u64>(), ops in prop::collection::vec(op(), 0..40)) {
            let (engine, mut game, mut rng) = new_game(seed);
            let mut last_level = game.current_level();

            for op in ops {
                let was_finished = game.finished();
                let before = game.clone();
                let result = match op {
                    Op::Answer(correct) => {
                        let key = if correct {
                            game.current_game_question().correct_answer_key()
                        } else {
                            wrong_key(&game)
                        };
                        engine.answer(&mut game, key).map(|_| ())
                    }
                    Op::Help(index) => engine.use_help(&mut game, HelpType::ALL[index], &mut rng),
                    Op::TakeMoney => engine.take_money(&mut game).map(|_| ()),
                };

                prop_assert_eq!(game.finished(), game.status() != GameStatus::InProgress);
                prop_assert!(game.current_level() >= last_level);
                if was_finished {
                    prop_assert!(result.is_err());
                    prop_assert_eq!(&game, &before);
                }
                if game.status() == GameStatus::Fail {
                    prop_assert!(game.prize() <= engine.prizes().prize_at(game.current_level()));
                }
                last_level = game.current_level();
            }
        }
    }
}
