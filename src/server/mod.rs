//! Server assembly and the accept loop.

pub mod listener;

use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::game::render::PageRenderer;
use crate::game::{Dictionary, GameRouter, SessionRegistry, WordSet};
use crate::http::connection::ConnectionSettings;

/// Everything a worker needs to serve one connection.
#[derive(Clone)]
pub struct Server {
    pub router: Arc<GameRouter>,
    pub settings: Arc<ConnectionSettings>,
    pub max_connections: usize,
    pub sweep_interval: Option<Duration>,
}

impl Server {
    /// Builds the word list, registry and router described by `cfg`.
    pub fn from_config(cfg: &Config) -> anyhow::Result<Self> {
        let words: Arc<dyn WordSet> = match &cfg.game.words_path {
            Some(path) => Arc::new(Dictionary::from_file(path)?),
            None => Arc::new(Dictionary::builtin()?),
        };

        let registry = SessionRegistry::new(cfg.session_timeout());
        let router = GameRouter::new(registry, words, Arc::new(PageRenderer));

        let server_id = cfg
            .server
            .server_id
            .clone()
            .unwrap_or_else(|| format!("wordle-server/{:08x}", rand::random::<u32>()));

        Ok(Self {
            router: Arc::new(router),
            settings: Arc::new(ConnectionSettings::from_config(cfg, server_id)),
            max_connections: cfg.server.max_connections,
            sweep_interval: cfg.sweep_interval(),
        })
    }
}
