use std::collections::BTreeMap;

use rand::{seq::IndexedRandom, Rng};

use crate::models::{AnswerKey, FriendCall};

/// Friends a player may call
pub const FRIENDS: &[&str] = &["Grandma", "Alex", "Coach Miller", "Dr. Nakamura", "Sam from work"];

/// Default chance, in percent, that a called friend suggests the right answer
pub const DEFAULT_FRIEND_CALL_ACCURACY: u8 = 80;

fn wrong_keys(correct: AnswerKey) -> Vec<AnswerKey> {
    AnswerKey::ALL
        .into_iter()
        .filter(|key| *key != correct)
        .collect()
}

/// Keep the correct key and one random wrong key, in key order
pub fn fifty_fifty(correct: AnswerKey, rng: &mut impl Rng) -> Vec<AnswerKey> {
    let wrong = wrong_keys(correct);
    let other = *wrong.choose(rng).unwrap_or(&correct);

    let mut keys = vec![correct, other];
    keys.sort_unstable();
    keys
}

/// Audience vote in percent for every key, summing to 100.
///
/// The correct key gets a larger weight range than the wrong ones, so the
/// audience is usually but not always right.
pub fn audience_distribution(correct: AnswerKey, rng: &mut impl Rng) -> BTreeMap<AnswerKey, u8> {
    let weights: Vec<(AnswerKey, u32)> = AnswerKey::ALL
        .into_iter()
        .map(|key| {
            let weight = if key == correct {
                rng.random_range(20..=70)
            } else {
                rng.random_range(5..=30)
            };
            (key, weight)
        })
        .collect();
    let total: u32 = weights.iter().map(|(_, weight)| weight).sum();

    let mut votes: BTreeMap<AnswerKey, u8> = weights
        .iter()
        .map(|(key, weight)| (*key, (weight * 100 / total) as u8))
        .collect();

    // Rounding leftovers go to the correct key
    let assigned: u32 = votes.values().map(|&pct| pct as u32).sum();
    if let Some(pct) = votes.get_mut(&correct) {
        *pct += (100 - assigned) as u8;
    }

    votes
}

/// A random friend suggests the correct key with `accuracy` percent probability
pub fn friend_call(correct: AnswerKey, accuracy: u8, rng: &mut impl Rng) -> FriendCall {
    let friend = FRIENDS.choose(rng).copied().unwrap_or("A friend");

    let suggested = if rng.random_range(0..100) < accuracy {
        correct
    } else {
        *wrong_keys(correct).choose(rng).unwrap_or(&correct)
    };

    FriendCall {
        friend: friend.to_string(),
        suggested,
    }
}
