//! Handles settings for the application. Configuration is read from
//! `settings.toml` (or the file passed with `--config`) and from `RATEIO__*`
//! environment variables, e.g. `RATEIO__APP__LEVEL=debug`.
use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct App {
    pub level: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Format {
    Json,
    Table,
}

#[derive(Debug, Deserialize)]
pub struct Report {
    pub format: Format,
    pub currency_symbol: String,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub report: Report,
}

impl Settings {
    /// Loads the settings. Without an explicit `path` a `settings.toml` in the
    /// working directory is used when present.
    pub fn new(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name("settings").required(false),
        };

        let settings = Config::builder()
            .set_default("app.level", "info")?
            .set_default("report.format", "table")?
            .set_default("report.currency_symbol", "R$")?
            .add_source(file)
            .add_source(Environment::with_prefix("RATEIO").separator("__"))
            .build()?;

        settings.try_deserialize()
    }
}
