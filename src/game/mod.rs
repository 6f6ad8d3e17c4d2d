//! Word-guessing game
//!
//! Feedback evaluation, per-player session state, the shared session
//! registry, and the router that ties them to HTTP requests.

pub mod evaluator;
pub mod registry;
pub mod render;
pub mod router;
pub mod session;
pub mod word;
pub mod words;

pub use evaluator::{evaluate, Feedback, Pattern};
pub use registry::SessionRegistry;
pub use router::GameRouter;
pub use session::{GameStatus, GuessOutcome, SessionId, SessionState};
pub use word::Word;
pub use words::{Dictionary, WordSet};
