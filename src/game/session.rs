//! Per-player game state.
//!
//! A session owns one secret word and the guesses made against it. Guesses
//! move it from `Playing` to one of the terminal states; once terminal, the
//! state never changes again.

use std::fmt;
use std::time::Duration;

use tokio::time::Instant;
use uuid::Uuid;

use crate::game::evaluator::{evaluate, Pattern};
use crate::game::word::Word;
use crate::game::words::WordSet;

pub const MAX_ATTEMPTS: usize = 6;

/// Opaque session token carried in the `SESSID` cookie.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// A fresh random 128-bit identifier in hyphenated hex form.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Accepts any non-empty run of lowercase hex digits and hyphens.
    pub fn parse(s: &str) -> Option<Self> {
        let well_formed = !s.is_empty()
            && s.bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b) || b == b'-');
        well_formed.then(|| Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    Win,
    Gameover,
}

impl GameStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GameStatus::Playing)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Playing => "Playing",
            GameStatus::Win => "Win",
            GameStatus::Gameover => "Gameover",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuessRecord {
    pub guess: Word,
    pub pattern: Pattern,
}

/// Result of submitting one guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessOutcome {
    /// Not a dictionary word; nothing was recorded.
    Invalid { guess: Word },
    /// Recorded at `row`, game continues.
    Playing { row: usize, record: GuessRecord },
    Win { secret: Word },
    Gameover { secret: Word },
}

impl GuessOutcome {
    pub fn status(&self) -> &'static str {
        match self {
            GuessOutcome::Invalid { .. } => "Invalid",
            GuessOutcome::Playing { .. } => GameStatus::Playing.as_str(),
            GuessOutcome::Win { .. } => GameStatus::Win.as_str(),
            GuessOutcome::Gameover { .. } => GameStatus::Gameover.as_str(),
        }
    }

    /// `<row>:<guess>:<pattern>` while playing, the secret once finished,
    /// the rejected word when invalid.
    pub fn message(&self) -> String {
        match self {
            GuessOutcome::Invalid { guess } => guess.to_string(),
            GuessOutcome::Playing { row, record } => {
                format!("{}:{}:{}", row, record.guess, record.pattern)
            }
            GuessOutcome::Win { secret } | GuessOutcome::Gameover { secret } => secret.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionState {
    secret: Word,
    attempt: usize,
    history: [Option<GuessRecord>; MAX_ATTEMPTS],
    status: GameStatus,
    last_activity: Instant,
}

impl SessionState {
    pub fn new(secret: Word) -> Self {
        Self {
            secret,
            attempt: 0,
            history: [None; MAX_ATTEMPTS],
            status: GameStatus::Playing,
            last_activity: Instant::now(),
        }
    }

    pub fn secret(&self) -> &Word {
        &self.secret
    }

    /// Number of guesses consumed so far.
    pub fn attempt(&self) -> usize {
        self.attempt
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Recorded guesses in order.
    pub fn history(&self) -> impl Iterator<Item = &GuessRecord> {
        self.history.iter().flatten()
    }

    pub fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    pub fn is_expired(&self, timeout: Duration) -> bool {
        self.last_activity.elapsed() > timeout
    }

    /// Evaluates `guess` and advances the game.
    ///
    /// Words outside `words` are rejected without consuming an attempt. A
    /// finished game repeats its final outcome and records nothing.
    pub fn play(&mut self, guess: Word, words: &dyn WordSet) -> GuessOutcome {
        match self.status {
            GameStatus::Win => return GuessOutcome::Win { secret: self.secret },
            GameStatus::Gameover => return GuessOutcome::Gameover { secret: self.secret },
            GameStatus::Playing => {}
        }

        if !words.contains(&guess) {
            return GuessOutcome::Invalid { guess };
        }

        let record = GuessRecord {
            guess,
            pattern: evaluate(&self.secret, &guess),
        };
        let row = self.attempt;
        self.history[row] = Some(record);
        self.attempt += 1;

        if record.pattern.is_win() {
            self.status = GameStatus::Win;
            GuessOutcome::Win { secret: self.secret }
        } else if self.attempt >= MAX_ATTEMPTS {
            self.status = GameStatus::Gameover;
            GuessOutcome::Gameover { secret: self.secret }
        } else {
            GuessOutcome::Playing { row, record }
        }
    }

    /// Board serialization handed to the page renderer:
    /// `-1:secret:secret;0:guess:pattern;...;5:guess:pattern;`, with empty
    /// fields for rows not yet played.
    pub fn game_state(&self) -> String {
        let mut out = format!("-1:{0}:{0};", self.secret);
        for (row, entry) in self.history.iter().enumerate() {
            match entry {
                Some(record) => {
                    out.push_str(&format!("{}:{}:{};", row, record.guess, record.pattern))
                }
                None => out.push_str(&format!("{}::;", row)),
            }
        }
        out
    }
}
