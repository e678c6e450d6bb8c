use std::{env, fmt, net::SocketAddr, path::PathBuf};

use anyhow::{Context, Result};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Runtime configuration (from environment with sensible defaults)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub bind_addr: SocketAddr,
    // JSON snapshot for the game store; memory only when unset.
    // Environment variable: GAMES_FILE
    pub games_file: Option<PathBuf>,
    // Fixed seed for target draws. Environment variable: GAME_SEED
    pub seed: Option<u64>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup, so callers other than the binary
    /// don't need to touch the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let bind_addr: SocketAddr = lookup("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .context("Invalid configuration: BIND_ADDR must be a socket address")?;
        let games_file = lookup("GAMES_FILE")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);
        let seed = lookup("GAME_SEED")
            .map(|v| v.trim().parse::<u64>())
            .transpose()
            .context("Invalid configuration: GAME_SEED must be a non-negative integer")?;

        Ok(Self {
            bind_addr,
            games_file,
            seed,
        })
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bind = {}", self.bind_addr)?;
        match &self.games_file {
            Some(p) => write!(f, ", games_file = {}", p.display())?,
            None => write!(f, ", games_file = (memory)")?,
        }
        match self.seed {
            Some(s) => write!(f, ", seed = {}", s),
            None => write!(f, ", seed = (random)"),
        }
    }
}
