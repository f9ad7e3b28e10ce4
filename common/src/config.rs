use std::env;

use config::{
    Config, ConfigBuilder, ConfigError, Environment, File, FileFormat, FileStoredFormat,
    builder::DefaultState,
};

use crate::{log_debug, log_warn, utils::search_current_ancestor_dirs_for};

pub const CONFIG_STR: &str = "CONFIG_STR";
pub const CONFIG_STR_FORMAT: &str = "CONFIG_STR_FMT";

/// Where to look for the configuration file.
pub enum ConfigFile<'a> {
    /// A file with this name in the current directory or one of its ancestors.
    /// Missing files are ignored.
    Searched(&'a str),
    /// A file explicitly given by the user. It must exist.
    Explicit(&'a std::path::Path),
}

/// Layers the configuration sources, later ones overriding earlier ones:
/// the defaults set by `config_builder`, the configuration file, an inline
/// string in `{env_prefix}_CONFIG_STR` (with its format in
/// `{env_prefix}_CONFIG_STR_FMT`), and finally `{env_prefix}_*` variables
/// with `__` as the nesting separator.
pub fn load_config(
    file: ConfigFile<'_>,
    env_prefix: &str,
    config_builder: impl FnOnce(
        ConfigBuilder<DefaultState>,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError>,
) -> Result<Config, ConfigError> {
    let mut builder = config_builder(Config::builder())?;
    builder = builder.add_source(match file {
        ConfigFile::Searched(file_name) => File::with_name(
            &search_current_ancestor_dirs_for(file_name)
                .map(|p| p.to_string_lossy().to_string())
                .unwrap_or_else(|| file_name.to_string()),
        )
        .required(false),
        ConfigFile::Explicit(path) => File::from(path).required(true),
    });
    if let Some((str, format)) = Option::zip(
        env::var(format!("{env_prefix}_{CONFIG_STR}")).ok(),
        env::var(format!("{env_prefix}_{CONFIG_STR_FORMAT}")).ok(),
    ) {
        if let Ok(format) = try_parse_format(&format) {
            builder = builder.add_source(File::from_str(str.as_str(), format));
        } else {
            log_warn!("Unknown format for config string: {}", format);
        }
    }
    builder = builder.add_source(
        Environment::with_prefix(env_prefix)
            .prefix_separator("_")
            .separator("__"),
    );

    builder
        .build()
        .inspect(|c| log_debug!("Loaded raw configurations: {:?}", c))
}

fn try_parse_format(format: &str) -> Result<FileFormat, &str> {
    use FileFormat::*;
    let all_formats = [Toml, Json, Json5, Yaml, Ron, Ini];
    all_formats
        .into_iter()
        .find(|f| f.file_extensions().contains(&format))
        .ok_or(format)
}
