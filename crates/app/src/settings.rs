//! Handles settings for the application.
//!
//! Values are layered, later sources winning:
//!
//! 1. built-in defaults, meant for local development only;
//! 2. an optional `settings.toml` next to the binary;
//! 3. `ROSTER__<SECTION>__<KEY>` environment variables;
//! 4. the plain `DB_HOST`, `DB_USER`, `DB_PASSWORD`, `DB_NAME` and `PORT`
//!    variables.
use std::{collections::HashMap, time::Duration};

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use url::{Url, form_urlencoded};

const PLAIN_VARIABLES: [(&str, &str); 5] = [
    ("DB_HOST", "database.host"),
    ("DB_USER", "database.user"),
    ("DB_PASSWORD", "database.password"),
    ("DB_NAME", "database.name"),
    ("PORT", "server.port"),
];

#[derive(Debug, Deserialize)]
pub struct App {
    pub level: String,
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct Database {
    /// Full connection URL. When set, the individual parts are ignored.
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub max_connections: u32,
    pub retry_delay_secs: u64,
    /// Keep the process alive and wait for the background reconnect instead
    /// of exiting when the first connection attempt fails.
    pub wait_for_connection: bool,
}

/// Percent-encode a URL component, spaces included.
fn encode(component: &str) -> String {
    // `byte_serialize` writes spaces as `+`, which the driver would keep.
    form_urlencoded::byte_serialize(component.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

impl Database {
    pub fn url(&self) -> Result<String, ConfigError> {
        if let Some(url) = &self.url {
            return Ok(url.clone());
        }

        let url = format!(
            "mysql://{}:{}@{}:{}/{}",
            encode(&self.user),
            encode(&self.password),
            self.host,
            self.port,
            encode(&self.name)
        );
        Url::parse(&url)
            .map_err(|err| ConfigError::Message(format!("invalid database settings: {err}")))?;

        Ok(url)
    }

    pub fn pool_options(&self) -> Result<engine::PoolOptions, ConfigError> {
        Ok(engine::PoolOptions::new(self.url()?)
            .max_connections(self.max_connections)
            .retry_delay(Duration::from_secs(self.retry_delay_secs)))
    }
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Server,
    pub database: Database,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::build(Some("settings"), std::env::vars().collect())
    }

    fn build(file: Option<&str>, vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("app.level", "info")?
            .set_default("server.bind", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("database.host", "mariadb")?
            .set_default("database.port", 3306)?
            .set_default("database.user", "root")?
            .set_default("database.password", "rootpassword")?
            .set_default("database.name", "userdb")?
            .set_default(
                "database.max_connections",
                i64::from(engine::pool::DEFAULT_MAX_CONNECTIONS),
            )?
            .set_default(
                "database.retry_delay_secs",
                engine::pool::DEFAULT_RETRY_DELAY.as_secs() as i64,
            )?
            .set_default("database.wait_for_connection", false)?;

        if let Some(file) = file {
            builder = builder.add_source(File::with_name(file).required(false));
        }

        builder = builder.add_source(
            Environment::with_prefix("ROSTER")
                .separator("__")
                .try_parsing(true)
                .source(Some(vars.clone())),
        );

        for (variable, key) in PLAIN_VARIABLES {
            builder = builder.set_override_option(key, vars.get(variable).cloned())?;
        }

        builder.build()?.try_deserialize()
    }
}
