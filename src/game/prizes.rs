use serde::Serialize;

/// Questions in every game
pub const QUESTIONS_PER_GAME: usize = 15;

/// Prize for answering each question correctly, by question index
pub const PRIZES: [u64; QUESTIONS_PER_GAME] = [
    100, 200, 300, 500, 1_000, 2_000, 4_000, 8_000, 16_000, 32_000, 64_000, 125_000, 250_000,
    500_000, 1_000_000,
];

/// Question indexes whose prize survives a later wrong answer
pub const FIREPROOF_LEVELS: [usize; 3] = [4, 9, 14];

/// Fixed prize ladder. Levels count correct answers, so the amount held at
/// level `L` is the prize of question `L - 1`, and nothing at level 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrizeTable {
    prizes: [u64; QUESTIONS_PER_GAME],
    fireproof: [usize; 3],
}

impl PrizeTable {
    pub const STANDARD: PrizeTable = PrizeTable::new(PRIZES, FIREPROOF_LEVELS);

    pub const fn new(prizes: [u64; QUESTIONS_PER_GAME], fireproof: [usize; 3]) -> Self {
        Self { prizes, fireproof }
    }

    /// Amount a player holds after `level` correct answers
    pub fn prize_at(&self, level: usize) -> u64 {
        match level.min(QUESTIONS_PER_GAME) {
            0 => 0,
            answered => self.prizes[answered - 1],
        }
    }

    pub fn top_prize(&self) -> u64 {
        self.prizes[QUESTIONS_PER_GAME - 1]
    }

    /// Prize kept when failing after `level` correct answers
    pub fn fireproof_prize(&self, level: usize) -> u64 {
        self.fireproof
            .iter()
            .copied()
            .filter(|&question| question < level)
            .max()
            .map_or(0, |question| self.prizes[question])
    }

}

impl Default for PrizeTable {
    fn default() -> Self {
        Self::STANDARD
    }
}
