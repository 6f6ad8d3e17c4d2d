//! Letter-by-letter feedback for a guess against the secret word.

use std::fmt;

use crate::game::word::{Word, WORD_LEN};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    /// Right letter, right position.
    Green,
    /// Letter present elsewhere in the secret.
    Yellow,
    /// Letter absent, or all its occurrences already accounted for.
    Black,
}

impl Feedback {
    pub fn as_char(&self) -> char {
        match self {
            Feedback::Green => 'G',
            Feedback::Yellow => 'Y',
            Feedback::Black => 'B',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pattern([Feedback; WORD_LEN]);

impl Pattern {
    pub fn feedback(&self) -> &[Feedback; WORD_LEN] {
        &self.0
    }

    pub fn is_win(&self) -> bool {
        self.0.iter().all(|f| *f == Feedback::Green)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|fb| write!(f, "{}", fb.as_char()))
    }
}

/// Scores `guess` against `secret`.
///
/// Exact matches are claimed first. Each remaining guess letter then takes
/// the first unclaimed matching position of the secret, so a repeated letter
/// is never credited more often than it occurs in the secret.
pub fn evaluate(secret: &Word, guess: &Word) -> Pattern {
    let secret = secret.letters();
    let guess = guess.letters();

    let mut result = [Feedback::Black; WORD_LEN];
    let mut used_in_guess = [false; WORD_LEN];
    let mut used_in_secret = [false; WORD_LEN];

    for i in 0..WORD_LEN {
        if guess[i] == secret[i] {
            result[i] = Feedback::Green;
            used_in_guess[i] = true;
            used_in_secret[i] = true;
        }
    }

    for i in 0..WORD_LEN {
        if used_in_guess[i] {
            continue;
        }
        if let Some(j) = (0..WORD_LEN).find(|&j| !used_in_secret[j] && guess[i] == secret[j]) {
            result[i] = Feedback::Yellow;
            used_in_guess[i] = true;
            used_in_secret[j] = true;
        }
    }

    Pattern(result)
}
