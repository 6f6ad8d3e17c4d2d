use std::fmt;

pub const WORD_LEN: usize = 5;

/// Five lowercase ASCII letters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Word([u8; WORD_LEN]);

impl Word {
    /// Accepts exactly five ASCII letters in any case and lowercases them.
    ///
    /// ```
    /// # use wordle_server::game::word::Word;
    /// assert_eq!(Word::parse("CRANE").unwrap().as_str(), "crane");
    /// assert!(Word::parse("cran").is_none());
    /// assert!(Word::parse("cr4ne").is_none());
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        let bytes: [u8; WORD_LEN] = s.as_bytes().try_into().ok()?;
        if !bytes.iter().all(u8::is_ascii_alphabetic) {
            return None;
        }
        Some(Self(bytes.map(|b| b.to_ascii_lowercase())))
    }

    pub fn letters(&self) -> &[u8; WORD_LEN] {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        // Only ASCII letters are ever stored.
        std::str::from_utf8(&self.0).unwrap_or_default()
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
