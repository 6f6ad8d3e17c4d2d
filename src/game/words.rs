//! The dictionary of playable words.

use std::collections::HashSet;
use std::path::Path;

use anyhow::Context;
use rand::seq::SliceRandom;

use crate::game::word::Word;

const BUILTIN_WORDS: &str = include_str!("words.txt");

/// Set-membership oracle over valid five-letter words.
pub trait WordSet: Send + Sync {
    fn contains(&self, word: &Word) -> bool;

    /// Picks a secret word uniformly at random.
    fn random_word(&self) -> Word;
}

#[derive(Debug, Clone)]
pub struct Dictionary {
    words: Vec<Word>,
    index: HashSet<Word>,
}

impl Dictionary {
    /// Builds a dictionary from newline-separated text.
    ///
    /// Lines that are not five ASCII letters are skipped. Fails if nothing
    /// usable remains.
    pub fn parse(text: &str) -> anyhow::Result<Self> {
        let mut index = HashSet::new();
        let mut words = Vec::new();

        for word in text.lines().filter_map(|line| Word::parse(line.trim())) {
            if index.insert(word) {
                words.push(word);
            }
        }

        if words.is_empty() {
            anyhow::bail!("word list contains no five-letter words");
        }

        Ok(Self { words, index })
    }

    pub fn builtin() -> anyhow::Result<Self> {
        Self::parse(BUILTIN_WORDS)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read word list {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("invalid word list {}", path.display()))
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl WordSet for Dictionary {
    fn contains(&self, word: &Word) -> bool {
        self.index.contains(word)
    }

    fn random_word(&self) -> Word {
        // `parse` guarantees at least one word.
        self.words
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or_else(|| self.words[0])
    }
}
