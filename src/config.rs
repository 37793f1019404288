//! Application-level configuration sourced from the environment.

use std::env;

use crate::dao::document_store::couchdb::CouchConfig;

/// Default external catalog endpoint.
const DEFAULT_CATALOG_BASE_URL: &str = "https://api.deezer.com";
/// Environment variable overriding [`DEFAULT_CATALOG_BASE_URL`].
const CATALOG_BASE_URL_ENV: &str = "CATALOG_BASE_URL";
/// Default HTTP listen port.
const DEFAULT_PORT: u16 = 8080;

/// Immutable runtime configuration shared across the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port the HTTP server binds to.
    pub port: u16,
    /// Base URL of the external music catalog.
    pub catalog_base_url: String,
    /// Document store connection settings.
    pub couch: CouchConfig,
}

impl AppConfig {
    /// Load the configuration from environment variables, falling back to
    /// local development defaults.
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .or_else(|_| env::var("SERVER_PORT"))
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let catalog_base_url =
            env::var(CATALOG_BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_CATALOG_BASE_URL.into());

        Self {
            port,
            catalog_base_url,
            couch: CouchConfig::from_env(),
        }
    }
}
