use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
    str::FromStr,
};

use chrono::{DateTime, Utc};
use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AnswerKey, PlayerId, Question, ANSWER_COUNT};
use crate::error::GameError;

pub type GameId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    InProgress,
    /// All questions answered correctly
    Won,
    /// Ended by a wrong answer
    Fail,
    /// Ended by cashing out
    Money,
}

impl GameStatus {
    pub fn is_finished(self) -> bool {
        self != GameStatus::InProgress
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GameStatus::InProgress => "in_progress",
            GameStatus::Won => "won",
            GameStatus::Fail => "fail",
            GameStatus::Money => "money",
        };
        f.write_str(name)
    }
}

/// One-time lifelines a player can use during a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HelpType {
    FiftyFifty,
    AudienceHelp,
    FriendCall,
}

impl HelpType {
    pub const ALL: [HelpType; 3] = [HelpType::FiftyFifty, HelpType::AudienceHelp, HelpType::FriendCall];

    pub fn as_str(self) -> &'static str {
        match self {
            HelpType::FiftyFifty => "fifty_fifty",
            HelpType::AudienceHelp => "audience_help",
            HelpType::FriendCall => "friend_call",
        }
    }
}

impl fmt::Display for HelpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HelpType {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HelpType::ALL
            .into_iter()
            .find(|help| help.as_str() == s.trim())
            .ok_or_else(|| GameError::UnknownHelpType(s.to_string()))
    }
}

/// Result of a friend call lifeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriendCall {
    pub friend: String,
    pub suggested: AnswerKey,
}

impl fmt::Display for FriendCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} thinks the answer is {}",
            self.friend,
            self.suggested.as_char().to_ascii_uppercase()
        )
    }
}

/// Lifeline results attached to a single question
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelpState {
    /// Keys left visible after a 50/50
    pub fifty_fifty: Option<Vec<AnswerKey>>,
    /// Audience vote in percent, per key
    pub audience_help: Option<BTreeMap<AnswerKey, u8>>,
    pub friend_call: Option<FriendCall>,
}

/// Assignment of answers to keys. `layout[key]` indexes into
/// `Question::answers()`, where index 0 is the correct answer.
/// Always a permutation of `0..4`; deserialization rejects anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "[usize; ANSWER_COUNT]", into = "[usize; ANSWER_COUNT]")]
struct Layout([usize; ANSWER_COUNT]);

impl Layout {
    const IN_ORDER: Layout = Layout([0, 1, 2, 3]);

    fn shuffled(rng: &mut impl Rng) -> Self {
        let mut indexes = Self::IN_ORDER.0;
        indexes.shuffle(rng);
        Layout(indexes)
    }

    fn answer_index(self, key: AnswerKey) -> usize {
        self.0[key.index()]
    }
}

impl TryFrom<[usize; ANSWER_COUNT]> for Layout {
    type Error = String;

    fn try_from(indexes: [usize; ANSWER_COUNT]) -> Result<Self, Self::Error> {
        let mut sorted = indexes;
        sorted.sort_unstable();
        if sorted != Self::IN_ORDER.0 {
            return Err(format!("answer layout {:?} is not a permutation of 0..4", indexes));
        }
        Ok(Layout(indexes))
    }
}

impl From<Layout> for [usize; ANSWER_COUNT] {
    fn from(layout: Layout) -> Self {
        layout.0
    }
}

/// A question as it appears in one game: answers shuffled onto keys, plus help state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameQuestion {
    pub question: Question,
    layout: Layout,
    pub help: HelpState,
}

impl GameQuestion {
    /// Place the answers on random keys
    pub fn shuffled(question: Question, rng: &mut impl Rng) -> Self {
        Self {
            question,
            layout: Layout::shuffled(rng),
            help: HelpState::default(),
        }
    }

    pub fn text(&self) -> &str {
        &self.question.text
    }

    pub fn level(&self) -> u8 {
        self.question.level
    }

    /// Answer texts by key, as shown to the player
    pub fn variants(&self) -> BTreeMap<AnswerKey, &str> {
        let answers = self.question.answers();
        AnswerKey::ALL
            .into_iter()
            .map(|key| (key, answers[self.layout.answer_index(key)]))
            .collect()
    }

    pub fn correct_answer_key(&self) -> AnswerKey {
        AnswerKey::ALL
            .into_iter()
            .find(|key| self.layout.answer_index(*key) == 0)
            .unwrap_or(AnswerKey::A)
    }

    pub fn correct_answer(&self) -> &str {
        &self.question.correct_answer
    }

    pub fn answer_correct(&self, key: AnswerKey) -> bool {
        key == self.correct_answer_key()
    }
}

/// A single player's run through 15 questions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub game_id: GameId,
    pub player_id: PlayerId,
    pub(crate) game_questions: Vec<GameQuestion>,
    pub(crate) current_level: usize,
    pub(crate) status: GameStatus,
    pub(crate) prize: u64,
    pub(crate) used_helps: BTreeSet<HelpType>,
    /// Bumped on every successful save; repositories reject writes based on a stale copy
    #[serde(default)]
    pub(crate) revision: u64,
    pub created_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl Game {
    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn finished(&self) -> bool {
        self.status.is_finished()
    }

    /// Number of questions answered correctly so far
    pub fn current_level(&self) -> usize {
        self.current_level
    }

    /// Banked prize. Always 0 while the game is in progress.
    pub fn prize(&self) -> u64 {
        self.prize
    }

    pub fn game_questions(&self) -> &[GameQuestion] {
        &self.game_questions
    }

    pub fn current_game_question(&self) -> &GameQuestion {
        &self.game_questions[self.current_level]
    }

    pub(crate) fn current_game_question_mut(&mut self) -> &mut GameQuestion {
        &mut self.game_questions[self.current_level]
    }

    /// The question before the current one, if any
    pub fn previous_game_question(&self) -> Option<&GameQuestion> {
        self.current_level
            .checked_sub(1)
            .map(|level| &self.game_questions[level])
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn help_used(&self, help: HelpType) -> bool {
        self.used_helps.contains(&help)
    }

    pub fn fifty_fifty_used(&self) -> bool {
        self.help_used(HelpType::FiftyFifty)
    }

    pub fn audience_help_used(&self) -> bool {
        self.help_used(HelpType::AudienceHelp)
    }

    pub fn friend_call_used(&self) -> bool {
        self.help_used(HelpType::FriendCall)
    }
}
