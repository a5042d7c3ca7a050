use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

const ENV_PREFIX: &str = "AVERAGE_PRICE";

#[derive(Debug, Deserialize, Clone)]
pub struct EndpointConfig {
    pub url: String,
    // Falls back to the reqwest default when unset.
    pub request_timeout_seconds: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DisplayConfig {
    pub currency_symbol: String,
    pub selected_bedrooms: Option<u32>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub endpoint: EndpointConfig,
    pub display: DisplayConfig,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Layers `<dir>/default.toml`, an optional `<dir>/local.toml`, then
    /// `AVERAGE_PRICE__SECTION__KEY` environment variables.
    pub fn load_from(dir: &str) -> Result<Self, ConfigError> {
        Self::load_with_env_prefix(dir, ENV_PREFIX)
    }

    fn load_with_env_prefix(dir: &str, env_prefix: &str) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::with_name(&format!("{}/default", dir)).required(true))
            .add_source(File::with_name(&format!("{}/local", dir)).required(false))
            .add_source(Environment::with_prefix(env_prefix).separator("__"));

        builder.build()?.try_deserialize()
    }
}
