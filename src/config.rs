use crate::availability::DEFAULT_BLOCK_CAPACITY;
use crate::blocks::{default_blocks, parse_block_list, TimeBlock};
use crate::errors::RackError;
use crate::stats::StatisticsMode;
use std::{env, path::PathBuf};

#[derive(Debug, Clone, PartialEq)]
pub struct RackSettings {
    pub default_blocks: Vec<TimeBlock>,
    pub statistics_mode: StatisticsMode,
    pub block_capacity: u32,
}

impl Default for RackSettings {
    fn default() -> Self {
        Self {
            default_blocks: default_blocks(),
            statistics_mode: StatisticsMode::Local,
            block_capacity: DEFAULT_BLOCK_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SourceConfig {
    File(PathBuf),
    Http(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub port: u16,
    pub source: SourceConfig,
    pub statistics_url: Option<String>,
    pub rack: RackSettings,
}

impl Config {
    pub fn from_env() -> Result<Self, RackError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, RackError> {
        let port = lookup("PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(8080);

        let source = if let Some(path) = lookup("RACK_RESERVATIONS_PATH") {
            SourceConfig::File(PathBuf::from(path))
        } else if let Some(url) = lookup("RACK_SOURCE_URL") {
            SourceConfig::Http(url)
        } else {
            SourceConfig::File(PathBuf::from("data/reservations.json"))
        };

        let statistics_mode = match lookup("RACK_STATISTICS_MODE") {
            Some(value) => value.parse()?,
            None => StatisticsMode::Local,
        };
        let statistics_url = lookup("RACK_STATISTICS_URL");

        let default_blocks = match lookup("RACK_DEFAULT_BLOCKS") {
            Some(raw) => parse_block_list(&raw)?,
            None => default_blocks(),
        };

        let block_capacity = match lookup("RACK_BLOCK_CAPACITY") {
            Some(raw) => raw.trim().parse::<u32>().map_err(|err| {
                RackError::Config(format!("RACK_BLOCK_CAPACITY {raw:?}: {err}"))
            })?,
            None => DEFAULT_BLOCK_CAPACITY,
        };

        Ok(Self {
            port,
            source,
            statistics_url,
            rack: RackSettings {
                default_blocks,
                statistics_mode,
                block_capacity,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_without_env() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.rack, RackSettings::default());
        assert_eq!(
            config.source,
            SourceConfig::File(PathBuf::from("data/reservations.json"))
        );
    }

    #[test]
    fn file_source_wins_over_url() {
        let config = Config::from_lookup(lookup(&[
            ("RACK_RESERVATIONS_PATH", "/tmp/r.json"),
            ("RACK_SOURCE_URL", "http://localhost:8085/api/v1/reservas/por-fechas"),
        ]))
        .unwrap();
        assert_eq!(config.source, SourceConfig::File(PathBuf::from("/tmp/r.json")));
    }

    #[test]
    fn server_mode_with_and_without_statistics_url() {
        let embedded = Config::from_lookup(lookup(&[("RACK_STATISTICS_MODE", "server")])).unwrap();
        assert_eq!(embedded.rack.statistics_mode, StatisticsMode::Server);
        assert_eq!(embedded.statistics_url, None);

        let bad = Config::from_lookup(lookup(&[("RACK_STATISTICS_MODE", "blended")]));
        assert!(matches!(bad, Err(RackError::Config(_))));

        let config = Config::from_lookup(lookup(&[
            ("RACK_STATISTICS_MODE", "server"),
            ("RACK_STATISTICS_URL", "http://localhost:8087/api/v1/rack/semanal/estadisticas"),
        ]))
        .unwrap();
        assert_eq!(config.rack.statistics_mode, StatisticsMode::Server);
    }

    #[test]
    fn custom_blocks_and_capacity_are_parsed() {
        let config = Config::from_lookup(lookup(&[
            ("RACK_DEFAULT_BLOCKS", "10:00-11:00,08:00-09:00"),
            ("RACK_BLOCK_CAPACITY", "12"),
        ]))
        .unwrap();
        assert_eq!(config.rack.default_blocks[0].label(), "08:00-09:00");
        assert_eq!(config.rack.block_capacity, 12);

        let bad = Config::from_lookup(lookup(&[("RACK_DEFAULT_BLOCKS", "nine-ten")]));
        assert!(matches!(bad, Err(RackError::InvalidBlock(_))));
    }
}
