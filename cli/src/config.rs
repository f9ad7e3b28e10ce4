use std::{collections::BTreeMap, path::Path};

use clap::ValueEnum;
use config::ConfigError;
use serde::Deserialize;

use common::{
    config::{ConfigFile, load_config},
    log_info,
};
use translator::GraphStyle;

pub(crate) const CONFIG_ENV_PREFIX: &str = "BVXLATE";
const CONFIG_FILENAME: &str = "bvxlate.toml";

/// What to do with the translated formula.
#[derive(ValueEnum, Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum Emit {
    /// Print a QF_BV script
    #[default]
    #[serde(alias = "smt2")]
    Smtlib,
    /// Print the script as JSON
    Json,
    /// Check the formula in a fresh solver and print the verdict
    Check,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub(crate) struct CliConfig {
    #[serde(default)]
    pub emit: Emit,
    #[serde(default)]
    pub solver: SolverConfig,
    #[serde(default)]
    pub graph: GraphStyle,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub(crate) struct SolverConfig {
    /// Global parameters of the checking solver, e.g. `timeout = 1000`.
    #[serde(default)]
    pub params: BTreeMap<String, String>,
}

pub(crate) fn load(path: Option<&Path>) -> Result<CliConfig, ConfigError> {
    let file = match path {
        Some(path) => ConfigFile::Explicit(path),
        None => ConfigFile::Searched(CONFIG_FILENAME),
    };
    load_config(file, CONFIG_ENV_PREFIX, |b| Ok(b))
        .and_then(|c| c.try_deserialize())
        .inspect(|c| log_info!("Loaded configurations: {:?}", c))
}
