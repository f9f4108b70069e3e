mod settings;

use config::{Config, ConfigError, Environment, File};

use settings::PartialSettings;

pub use settings::{BusSettings, LogSettings, Settings};

/// File stem read by `load_config`, relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "config/default";

/// Prefix of the environment variables read by `load_config`,
/// e.g. `TOPICBUS_BUS__CAPACITY=16`.
pub const ENV_PREFIX: &str = "TOPICBUS";

/// Loads the configuration from the default file and environment variables
/// and merges it over the default values.
pub fn load_config() -> Result<Settings, ConfigError> {
    load_config_from(DEFAULT_CONFIG_FILE)
}

/// Like `load_config`, reading the optional file `name` (any supported
/// extension) instead of the default one.
pub fn load_config_from(name: &str) -> Result<Settings, ConfigError> {
    let builder = Config::builder()
        .add_source(File::with_name(name).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

    let config = builder.build()?;

    // Try to deserialize what is available
    let partial: PartialSettings = config.try_deserialize()?;

    Ok(partial.merge(Settings::default()))
}
