use std::env;

/// Default CouchDB endpoint used when no environment override is present.
const DEFAULT_BASE_URL: &str = "http://localhost:5984";
/// Default database name.
const DEFAULT_DATABASE: &str = "song_guesser";

/// Runtime configuration describing how to connect to CouchDB.
#[derive(Debug, Clone)]
pub struct CouchConfig {
    /// Base URL of the CouchDB node, without a trailing slash.
    pub base_url: String,
    /// Database holding playlist/song/game documents.
    pub database: String,
    /// Optional basic-auth user.
    pub username: Option<String>,
    /// Optional basic-auth password.
    pub password: Option<String>,
}

impl CouchConfig {
    /// Construct a configuration from explicit base URL and database name.
    pub fn new(base_url: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            database: database.into(),
            username: None,
            password: None,
        }
    }

    /// Attach basic-auth credentials to the configuration.
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Build a configuration from `COUCH_*` environment variables, falling
    /// back to the local development defaults.
    pub fn from_env() -> Self {
        let base_url = env::var("COUCH_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        let database = env::var("COUCH_DB").unwrap_or_else(|_| DEFAULT_DATABASE.into());

        let mut config = Self::new(base_url, database);

        if let (Ok(username), Ok(password)) =
            (env::var("COUCH_USERNAME"), env::var("COUCH_PASSWORD"))
        {
            config = config.with_credentials(username, password);
        }

        config
    }
}
