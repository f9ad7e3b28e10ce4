use std::{io, path::PathBuf};

use config::ConfigError;
use derive_more as dm;

use translator::{Sort, TranslateError};

#[derive(Debug, dm::Display, dm::Error, dm::From)]
pub(crate) enum CliError {
    #[display("Failed to read configurations: {_0}")]
    Config(ConfigError),
    #[display("Failed to access `{}`: {source}", path.display())]
    #[from(ignore)]
    Io { path: PathBuf, source: io::Error },
    #[display("Failed to parse `{}`: {reason}", path.display())]
    #[from(ignore)]
    Parse { path: PathBuf, reason: String },
    Translate(TranslateError),
    #[display("The input is not a formula: its sort is {sort}")]
    #[from(ignore)]
    NotAFormula { sort: Sort },
    #[display("Failed to serialize the output: {_0}")]
    Json(serde_json::Error),
}

impl CliError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }
}
