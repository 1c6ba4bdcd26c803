use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

const DEFAULT_CONFIG_FILE: &str = "trivia.toml";

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct DatabaseSettings {
    pub path: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
}

impl Settings {
    /// Defaults, then `trivia.toml` (or the file named by `TRIVIA_CONFIG`) if
    /// present, then `TRIVIA__SECTION__KEY` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        let file = std::env::var("TRIVIA_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_owned());
        Self::builder(&file)?
            .add_source(
                Environment::with_prefix("TRIVIA")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    fn builder(file: &str) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Ok(Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("database.path", "trivia.db")?
            .set_default("database.max_connections", 5)?
            .add_source(File::with_name(file).required(false)))
    }
}
