use crate::loaders::LoaderKind;
use crate::penalty::PenaltyPolicy;
use eyre::{WrapErr, eyre};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub solver: SolverConfig,
    pub penalties: PenaltyPolicy,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SolverConfig {
    pub loader: LoaderKind,
    pub input: PathBuf,
    pub output: PathBuf,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            loader: LoaderKind::Csv,
            input: PathBuf::from("."),
            output: PathBuf::from("."),
        }
    }
}

impl Config {
    pub fn load(file_name: &Path) -> eyre::Result<Config> {
        let content = fs::read_to_string(file_name)
            .wrap_err_with(|| format!("cannot load configuration file {}", file_name.display()))?;
        Self::parse(&content)
            .wrap_err_with(|| format!("invalid configuration file {}", file_name.display()))
    }

    pub fn parse(content: &str) -> eyre::Result<Config> {
        let config: Config = toml::from_str(content)?;
        config.penalties.max_penalty().ok_or_else(|| {
            eyre!(
                "penalties overflow: the largest rank cost times the largest multiplier exceeds {}",
                u32::MAX
            )
        })?;
        Ok(config)
    }
}
