//! Wordle over HTTP/1.1
//!
//! Hand-written HTTP layer, per-player game sessions, and the accept loop
//! serving them.

pub mod config;
pub mod game;
pub mod http;
pub mod server;
