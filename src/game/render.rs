//! HTML page rendering.
//!
//! The router only hands a renderer the board serialization produced by
//! `SessionState::game_state`; page layout lives entirely behind `Renderer`.

use crate::game::session::MAX_ATTEMPTS;
use crate::game::word::WORD_LEN;

pub trait Renderer: Send + Sync {
    fn render(&self, game_state: &str) -> String;
}

/// One row of a decoded board.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardRow {
    pub guess: String,
    pub pattern: String,
}

/// Decoded `-1:secret:secret;0:guess:pattern;...` serialization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    pub secret: String,
    pub rows: Vec<BoardRow>,
}

impl Board {
    /// Decodes a board, ignoring malformed entries.
    pub fn decode(game_state: &str) -> Self {
        let mut board = Board {
            secret: String::new(),
            rows: vec![BoardRow::default(); MAX_ATTEMPTS],
        };

        for entry in game_state.split(';').filter(|e| !e.is_empty()) {
            let mut fields = entry.splitn(3, ':');
            let (Some(index), Some(guess), Some(pattern)) = (fields.next(), fields.next(), fields.next())
            else {
                continue;
            };
            match index.parse::<i32>() {
                Ok(-1) => board.secret = guess.to_string(),
                Ok(row) if (0..MAX_ATTEMPTS as i32).contains(&row) => {
                    board.rows[row as usize] = BoardRow {
                        guess: guess.to_string(),
                        pattern: pattern.to_string(),
                    };
                }
                _ => {}
            }
        }

        board
    }

    /// Rows that hold a guess.
    pub fn played(&self) -> usize {
        self.rows.iter().take_while(|r| !r.guess.is_empty()).count()
    }

    pub fn is_won(&self) -> bool {
        self.rows.iter().any(|r| r.pattern == "G".repeat(WORD_LEN))
    }

    pub fn is_finished(&self) -> bool {
        self.is_won() || self.played() >= MAX_ATTEMPTS
    }
}

/// Self-contained play page: board, AJAX script and a no-script form.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageRenderer;

impl Renderer for PageRenderer {
    fn render(&self, game_state: &str) -> String {
        let board = Board::decode(game_state);

        let mut grid = String::new();
        for (r, row) in board.rows.iter().enumerate() {
            grid.push_str("<div class=\"row\">");
            let letters: Vec<char> = row.guess.chars().collect();
            let marks: Vec<char> = row.pattern.chars().collect();
            for c in 0..WORD_LEN {
                let class = match marks.get(c) {
                    Some('G') => " green",
                    Some('Y') => " yellow",
                    Some('B') => " darkened",
                    _ => "",
                };
                let letter = letters
                    .get(c)
                    .map(|l| l.to_ascii_uppercase().to_string())
                    .unwrap_or_default();
                grid.push_str(&format!(
                    "<div class=\"cell{class}\" id=\"cell-{r}-{c}\">{letter}</div>"
                ));
            }
            grid.push_str("</div>");
        }

        let banner = if board.is_won() {
            "<p class=\"banner\">Congratulations, you won!</p>".to_string()
        } else if board.is_finished() {
            format!(
                "<p class=\"banner\">Game over! The word was {}.</p>",
                escape(&board.secret.to_ascii_uppercase())
            )
        } else {
            String::new()
        };

        format!(
            "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>Wordle</title>\
             <style>{STYLE}</style></head><body>\
             <h1>WORDLE</h1>{banner}<div id=\"board\">{grid}</div>\
             <noscript><form action=\"/play.html/guess\" method=\"post\">\
             <input type=\"text\" name=\"guess\" required pattern=\"[A-Za-z]{{5}}\" maxlength=\"5\">\
             <input type=\"submit\" value=\"Submit Guess\"></form></noscript>\
             <script>let currentRow = {played};{SCRIPT}</script>\
             </body></html>",
            // A finished board takes no more input
            played = if board.is_finished() { MAX_ATTEMPTS } else { board.played() },
        )
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const STYLE: &str = "body{font-family:sans-serif;text-align:center}\
.row{display:flex;justify-content:center}\
.cell{width:3em;height:3em;margin:2px;border:2px solid #ccc;font-size:1.5em;line-height:3em}\
.green{background:#6aaa64}.yellow{background:#c9b458}.darkened{background:#787c7e}";

const SCRIPT: &str = "let currentGuess = '';\
document.addEventListener('keydown', (event) => {\
  if (currentRow >= 6) return;\
  const key = event.key.toUpperCase();\
  if (/^[A-Z]$/.test(key) && currentGuess.length < 5) {\
    document.getElementById(`cell-${currentRow}-${currentGuess.length}`).textContent = key;\
    currentGuess += key;\
  } else if (key === 'BACKSPACE' && currentGuess.length > 0) {\
    currentGuess = currentGuess.slice(0, -1);\
    document.getElementById(`cell-${currentRow}-${currentGuess.length}`).textContent = '';\
  } else if (key === 'ENTER' && currentGuess.length === 5) {\
    sendGuess(currentGuess);\
  }\
});\
function sendGuess(guess) {\
  fetch(`/play.html/guess?word=${guess}`, {\
    headers: { 'Row': currentRow.toString(), 'JS-Enabled': 'true', 'X-Requested-With': 'XMLHttpRequest' }\
  })\
  .then(response => response.json())\
  .then(data => {\
    if (data.Status === 'Invalid') { alert('Not in word list'); return; }\
    if (data.Status === 'Playing') { paint(data.Message.split(':')[2]); return; }\
    paint(data.Status === 'Win' ? 'GGGGG' : null);\
    alert(data.Status === 'Win' ? 'Congratulations, you won!' : `Game over! The word was ${data.Message.toUpperCase()}.`);\
    currentRow = 6;\
  });\
}\
function paint(pattern) {\
  if (pattern) {\
    const classes = { G: 'green', Y: 'yellow', B: 'darkened' };\
    for (let i = 0; i < 5; i++) {\
      document.getElementById(`cell-${currentRow}-${i}`).classList.add(classes[pattern[i]]);\
    }\
  }\
  currentRow++;\
  currentGuess = '';\
}";
