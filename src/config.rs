//! Server configuration.
//!
//! Defaults cover every field. An optional YAML file named by `WORDLE_CONFIG`
//! is layered on top, and `LISTEN` overrides the bind address last.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub http: HttpConfig,
    pub game: GameConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g. "0.0.0.0:8008").
    pub listen_addr: String,
    /// Upper bound on connections handled at once.
    pub max_connections: usize,
    /// Per-read socket timeout.
    pub read_timeout_secs: u64,
    /// Value of the `Server` response header. Random when absent.
    pub server_id: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8008".to_string(),
            max_connections: 256,
            read_timeout_secs: 30,
            server_id: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Bodies longer than this are sent chunked, in slices of this size.
    pub chunk_threshold: usize,
    pub max_header_bytes: usize,
    pub max_body_bytes: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            chunk_threshold: 128,
            max_header_bytes: 8 * 1024,
            max_body_bytes: 64 * 1024,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub session_timeout_secs: u64,
    /// Word list, one word per line. The built-in list is used when absent.
    pub words_path: Option<PathBuf>,
    /// Period of the expired-session sweep. Expiry is lazy when absent.
    pub sweep_interval_secs: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            session_timeout_secs: 600,
            words_path: None,
            sweep_interval_secs: None,
        }
    }
}

impl Config {
    /// Loads defaults, then `WORDLE_CONFIG` (YAML) if set, then `LISTEN`.
    pub fn load() -> anyhow::Result<Self> {
        let mut cfg = match std::env::var_os("WORDLE_CONFIG") {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };

        if let Ok(listen_addr) = std::env::var("LISTEN") {
            cfg.server.listen_addr = listen_addr;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> anyhow::Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server.max_connections == 0 {
            anyhow::bail!("server.max_connections must be greater than zero");
        }
        if self.server.read_timeout_secs == 0 {
            anyhow::bail!("server.read_timeout_secs must be greater than zero");
        }
        if self.http.chunk_threshold == 0 {
            anyhow::bail!("http.chunk_threshold must be greater than zero");
        }
        if self.game.session_timeout_secs == 0 {
            anyhow::bail!("game.session_timeout_secs must be greater than zero");
        }
        if self.game.sweep_interval_secs == Some(0) {
            anyhow::bail!("game.sweep_interval_secs must be greater than zero");
        }
        Ok(())
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.server.read_timeout_secs)
    }

    pub fn session_timeout(&self) -> Duration {
        Duration::from_secs(self.game.session_timeout_secs)
    }

    pub fn sweep_interval(&self) -> Option<Duration> {
        self.game.sweep_interval_secs.map(Duration::from_secs)
    }
}
