use std::env;

use crate::blockchain::{BLOCK_REWARD, DEFAULT_DIFFICULTY};
use crate::error::ConfigError;

/// Hex characters in a SHA-256 digest; the difficulty can never exceed it.
const MAX_DIFFICULTY: usize = 64;

/// Runtime settings, read from the environment (and `.env` via dotenvy).
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Leading zero hex characters a proof digest must carry.
    pub difficulty: usize,
    pub block_reward: f64,
    pub node_id: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            difficulty: DEFAULT_DIFFICULTY,
            block_reward: BLOCK_REWARD,
            node_id: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(host) = lookup("HOST") {
            cfg.host = host;
        }

        if let Some(raw) = lookup("PORT") {
            cfg.port = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "PORT",
                value: raw.clone(),
                reason: "expected a port number",
            })?;
        }

        if let Some(raw) = lookup("DIFFICULTY") {
            let difficulty: usize = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "DIFFICULTY",
                value: raw.clone(),
                reason: "expected an integer",
            })?;
            if difficulty == 0 || difficulty > MAX_DIFFICULTY {
                return Err(ConfigError::InvalidValue {
                    key: "DIFFICULTY",
                    value: raw,
                    reason: "must be between 1 and 64",
                });
            }
            cfg.difficulty = difficulty;
        }

        if let Some(raw) = lookup("BLOCK_REWARD") {
            let reward: f64 = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "BLOCK_REWARD",
                value: raw.clone(),
                reason: "expected a number",
            })?;
            if !reward.is_finite() || reward < 0.0 {
                return Err(ConfigError::InvalidValue {
                    key: "BLOCK_REWARD",
                    value: raw,
                    reason: "must be finite and non-negative",
                });
            }
            cfg.block_reward = reward;
        }

        cfg.node_id = lookup("NODE_ID").filter(|id| !id.trim().is_empty());

        Ok(cfg)
    }
}
