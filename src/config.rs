//! Settings read from the environment.
//!
//! Variables use the bot's historical names (`MAX_DICE`, `MAX_SIDES`,
//! `MAX_MULTIROLL`, `LOG_LEVEL`, `DATA_DIR`); unset ones keep their defaults.

use crate::common::UInt;
use crate::parse::Limits;
use figment::providers::{Env, Serialized};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub max_dice: usize,
    pub max_sides: UInt,
    pub max_multiroll: usize,
    pub log_level: String,
    /// Directory holding one character file per guild.
    pub data_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_dice: Limits::DEFAULT_MAX_DICE,
            max_sides: Limits::DEFAULT_MAX_SIDES,
            max_multiroll: 10,
            log_level: "info".to_owned(),
            data_dir: PathBuf::from("data/characters"),
        }
    }
}

impl Config {
    const ENV_KEYS: &'static [&'static str] = &[
        "max_dice",
        "max_sides",
        "max_multiroll",
        "log_level",
        "data_dir",
    ];

    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Env::raw().only(Self::ENV_KEYS))
    }

    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }

    pub fn limits(&self) -> Limits {
        Limits::new(self.max_dice, self.max_sides)
    }

    /// `log_level` as an `EnvFilter` directive.
    pub fn log_directive(&self) -> String {
        self.log_level.trim().to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_defaults() {
        Jail::expect_with(|_| {
            let config = Config::load()?;
            assert_eq!(config, Config::default());
            assert_eq!(config.limits(), Limits::default());
            assert_eq!(config.max_multiroll, 10);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides() {
        Jail::expect_with(|jail| {
            jail.set_env("MAX_DICE", "20");
            jail.set_env("MAX_SIDES", "100");
            jail.set_env("MAX_MULTIROLL", "3");
            jail.set_env("LOG_LEVEL", "DEBUG");
            let config = Config::load()?;
            assert_eq!(config.limits(), Limits::new(20, 100));
            assert_eq!(config.max_multiroll, 3);
            assert_eq!(config.log_directive(), "debug");
            Ok(())
        });
    }

    #[test]
    fn test_bad_number_is_an_error() {
        Jail::expect_with(|jail| {
            jail.set_env("MAX_DICE", "lots");
            assert!(Config::load().is_err());
            Ok(())
        });
    }
}
