use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::GameError;

/// Number of answer options shown for every question
pub const ANSWER_COUNT: usize = 4;

/// Label of an answer option as shown to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerKey {
    A,
    B,
    C,
    D,
}

impl AnswerKey {
    pub const ALL: [AnswerKey; ANSWER_COUNT] = [AnswerKey::A, AnswerKey::B, AnswerKey::C, AnswerKey::D];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_char(self) -> char {
        match self {
            AnswerKey::A => 'a',
            AnswerKey::B => 'b',
            AnswerKey::C => 'c',
            AnswerKey::D => 'd',
        }
    }
}

impl fmt::Display for AnswerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Parses a submitted letter. Case and surrounding whitespace are ignored.
impl FromStr for AnswerKey {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a" => Ok(AnswerKey::A),
            "b" => Ok(AnswerKey::B),
            "c" => Ok(AnswerKey::C),
            "d" => Ok(AnswerKey::D),
            _ => Err(GameError::InvalidAnswerKey(s.to_string())),
        }
    }
}

/// A quiz question. The correct answer is stored apart from the wrong ones,
/// so every question has exactly one correct option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: Uuid,
    /// Difficulty slot (0..15) this question can fill in a game
    pub level: u8,
    pub text: String,
    pub correct_answer: String,
    pub wrong_answers: [String; 3],
}

impl Question {
    pub fn new(
        level: u8,
        text: impl Into<String>,
        correct_answer: impl Into<String>,
        wrong_answers: [String; 3],
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            level,
            text: text.into(),
            correct_answer: correct_answer.into(),
            wrong_answers,
        }
    }

    /// All answer texts, the correct one first
    pub fn answers(&self) -> [&str; ANSWER_COUNT] {
        [
            &self.correct_answer,
            &self.wrong_answers[0],
            &self.wrong_answers[1],
            &self.wrong_answers[2],
        ]
    }
}
