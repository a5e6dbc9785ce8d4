//! Environment options, loadable from a TOML file.

use std::path::Path;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// What happens when a move would push the blank off the board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum OutOfBoundsPolicy {
    /// The move is a no-op.
    #[default]
    Ignore,
    /// The move fails with [`Error::OutOfBounds`].
    Strict,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum RewardScheme {
    /// 1 when solved, 0 otherwise.
    #[default]
    Sparse,
    /// 1 when solved, -1 otherwise.
    Penalty,
}

impl RewardScheme {
    pub fn reward(self, solved: bool) -> i32 {
        match (self, solved) {
            (_, true) => 1,
            (RewardScheme::Sparse, false) => 0,
            (RewardScheme::Penalty, false) => -1,
        }
    }
}

/// Shape of the observation returned from a step or reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Encoding {
    #[default]
    Grid,
    OneHot,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnvConfig {
    pub reward: RewardScheme,
    pub encoding: Encoding,
    pub out_of_bounds: OutOfBoundsPolicy,
    /// Fixed RNG seed; entropy when absent.
    pub seed: Option<u64>,
}

impl EnvConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Self::parse(source, "<inline>")
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| Error::Io {
            operation: format!("read config file {}", path.display()),
            source,
        })?;
        Self::parse(&source, &path.display().to_string())
    }

    fn parse(source: &str, path: &str) -> Result<Self> {
        toml::from_str(source).map_err(|e| Error::Config {
            path: path.to_string(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let config = EnvConfig::from_toml_str("").unwrap();
        assert_eq!(config, EnvConfig::default());
        assert_eq!(config.reward, RewardScheme::Sparse);
        assert_eq!(config.encoding, Encoding::Grid);
        assert_eq!(config.out_of_bounds, OutOfBoundsPolicy::Ignore);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn parses_every_field() {
        let config = EnvConfig::from_toml_str(
            r#"
            reward = "penalty"
            encoding = "one-hot"
            out_of_bounds = "strict"
            seed = 42
            "#,
        )
        .unwrap();
        assert_eq!(
            config,
            EnvConfig {
                reward: RewardScheme::Penalty,
                encoding: Encoding::OneHot,
                out_of_bounds: OutOfBoundsPolicy::Strict,
                seed: Some(42),
            }
        );
    }

    #[test]
    fn rejects_unknown_values() {
        assert!(matches!(
            EnvConfig::from_toml_str(r#"reward = "dense""#),
            Err(Error::Config { .. })
        ));
        assert!(matches!(
            EnvConfig::from_toml_str("steps = 3"),
            Err(Error::Config { .. })
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(
            EnvConfig::load("/nonexistent/tile-env.toml"),
            Err(Error::Io { .. })
        ));
    }

    #[test]
    fn reward_schemes() {
        assert_eq!(RewardScheme::Sparse.reward(true), 1);
        assert_eq!(RewardScheme::Sparse.reward(false), 0);
        assert_eq!(RewardScheme::Penalty.reward(true), 1);
        assert_eq!(RewardScheme::Penalty.reward(false), -1);
    }
}
