//! Game timing and setup configuration.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Timing constants and setup options. Every field has a default, so a config file only needs
/// the fields it overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Time between automatic plays.
    pub autoplay_interval_ms: u64,
    /// Time between a failed obligation and the pile changing hands.
    pub collect_delay_ms: u64,
    /// Time between a false claim and the penalty being paid.
    pub penalty_delay_ms: u64,
    /// How long a successful claim is displayed before play continues.
    pub message_ms: u64,
    /// Seed for the shuffle. Unseeded games are shuffled from entropy.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            autoplay_interval_ms: 1300,
            collect_delay_ms: 1000,
            penalty_delay_ms: 600,
            message_ms: 1200,
            seed: None,
        }
    }
}

impl Config {
    /// Reads and validates a config from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let reader = BufReader::new(File::open(path)?);
        let config: Config = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.autoplay_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        Ok(())
    }

    /// The random number generator for shuffling, seeded if a seed is configured.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    pub fn autoplay_interval(&self) -> Duration {
        Duration::from_millis(self.autoplay_interval_ms)
    }

    pub fn collect_delay(&self) -> Duration {
        Duration::from_millis(self.collect_delay_ms)
    }

    pub fn penalty_delay(&self) -> Duration {
        Duration::from_millis(self.penalty_delay_ms)
    }

    pub fn message_duration(&self) -> Duration {
        Duration::from_millis(self.message_ms)
    }
}

#[cfg(test)]
mod test {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn test_partial() {
        let config: Config = serde_json::from_str(r#"{"seed": 42, "message_ms": 10}"#).unwrap();
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.message_duration(), Duration::from_millis(10));
        assert_eq!(config.autoplay_interval_ms, Config::default().autoplay_interval_ms);
    }

    #[test]
    fn test_zero_interval() {
        let config = Config {
            autoplay_interval_ms: 0,
            ..Config::default()
        };
        assert_matches!(config.validate(), Err(ConfigError::ZeroInterval));
        Config::default().validate().unwrap();
    }
}
