use std::path::Path;

use anyhow::{bail, Context, Result};
use rand::{seq::IndexedRandom, Rng};
use serde::Deserialize;
use tokio::fs;

use crate::{error::GameError, game::QUESTIONS_PER_GAME, models::Question};

/// One entry of a question pool file
#[derive(Debug, Deserialize)]
struct QuestionRecord {
    level: u8,
    text: String,
    correct_answer: String,
    wrong_answers: Vec<String>,
}

/// Questions grouped by level, ready to be drawn into new games
#[derive(Debug)]
pub struct QuestionPool {
    by_level: Vec<Vec<Question>>,
}

impl QuestionPool {
    /// Load a pool from a JSON array of question records
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read question pool {}", path.display()))?;
        let pool = Self::parse(&content)?;

        tracing::info!("Loaded {} questions into pool", pool.len());

        Ok(pool)
    }

    /// Parse a pool from JSON text
    pub fn parse(json: &str) -> Result<Self> {
        let records: Vec<QuestionRecord> =
            serde_json::from_str(json).context("Question pool is not valid JSON")?;

        let mut questions = Vec::with_capacity(records.len());
        for (index, record) in records.into_iter().enumerate() {
            if usize::from(record.level) >= QUESTIONS_PER_GAME {
                bail!(
                    "Question #{} has level {}, expected 0..{}",
                    index,
                    record.level,
                    QUESTIONS_PER_GAME
                );
            }
            let count = record.wrong_answers.len();
            let wrong_answers: [String; 3] = match record.wrong_answers.try_into() {
                Ok(wrong) => wrong,
                Err(_) => bail!("Question #{} has {} wrong answers, expected 3", index, count),
            };
            questions.push(Question::new(
                record.level,
                record.text,
                record.correct_answer,
                wrong_answers,
            ));
        }

        Ok(Self::from_questions(questions))
    }

    /// Build a pool from questions already in memory.
    /// Questions with a level outside the game are skipped.
    pub fn from_questions(questions: impl IntoIterator<Item = Question>) -> Self {
        let mut by_level = vec![Vec::new(); QUESTIONS_PER_GAME];
        for question in questions {
            match by_level.get_mut(usize::from(question.level)) {
                Some(bucket) => bucket.push(question),
                None => tracing::warn!(
                    "Skipping question {} with out-of-range level {}",
                    question.id,
                    question.level
                ),
            }
        }
        Self { by_level }
    }

    /// Create an empty pool (for testing)
    pub fn empty() -> Self {
        Self::from_questions(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.by_level.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn count_for_level(&self, level: usize) -> usize {
        self.by_level.get(level).map_or(0, Vec::len)
    }

    /// Pick one random question for every level, in level order
    pub fn draw(&self, rng: &mut impl Rng) -> Result<Vec<Question>, GameError> {
        self.by_level
            .iter()
            .enumerate()
            .map(|(level, bucket)| {
                bucket
                    .choose(rng)
                    .cloned()
                    .ok_or(GameError::NotEnoughQuestions { level })
            })
            .collect()
    }
}
