use std::{
    env,
    net::{AddrParseError, SocketAddr},
    time::Duration,
};

use runtime::SpikeSource;
use thiserror::Error;

const DEFAULT_TICK_INTERVAL_MS: u64 = 50;
const MAX_TICK_INTERVAL_MS: u64 = 1_000;

const ENV_ADDR: &str = "LAB_SERVER_ADDR";
const ENV_TICK_INTERVAL: &str = "LAB_TICK_INTERVAL_MS";
const ENV_SPIKE_SEED: &str = "LAB_SPIKE_SEED";

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub tick_interval: Duration,
    pub spike_source: SpikeSource,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("LAB_SERVER_ADDR is not a valid socket address: {0}")]
    InvalidListenAddr(#[source] AddrParseError),
    #[error("LAB_TICK_INTERVAL_MS must be an integer between 1 and 1000")]
    InvalidTickInterval,
    #[error("LAB_SPIKE_SEED must be an unsigned 64-bit integer")]
    InvalidSpikeSeed,
    #[error("{0} contains non-unicode data")]
    NonUnicode(&'static str),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let listen_addr = match read_env(ENV_ADDR)? {
            Some(value) => value.parse().map_err(ConfigError::InvalidListenAddr)?,
            None => SocketAddr::from(([0, 0, 0, 0], 8080)),
        };

        let tick_interval_ms = match read_env(ENV_TICK_INTERVAL)? {
            Some(value) => value
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|ms| (1..=MAX_TICK_INTERVAL_MS).contains(ms))
                .ok_or(ConfigError::InvalidTickInterval)?,
            None => DEFAULT_TICK_INTERVAL_MS,
        };

        let spike_source = match read_env(ENV_SPIKE_SEED)? {
            Some(value) => SpikeSource::Seeded(
                value
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidSpikeSeed)?,
            ),
            None => SpikeSource::Entropy,
        };

        Ok(Self {
            listen_addr,
            tick_interval: Duration::from_millis(tick_interval_ms),
            spike_source,
        })
    }
}

fn read_env(key: &'static str) -> Result<Option<String>, ConfigError> {
    match env::var(key) {
        Ok(value) => Ok(Some(value)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(_)) => Err(ConfigError::NonUnicode(key)),
    }
}
