//! Environment-sourced backend configuration (spec.md §6 "Environment/config
//! surface"). This is a design-level surface, not a CLI: callers may also
//! construct these directly without touching the process environment.

use rdf_graph::GraphError;

/// Connection settings for a Stardog database, normally read from
/// `STARDOG_ENDPOINT`/`STARDOG_USERNAME`/`STARDOG_PASSWORD`/`STARDOG_DATABASE`.
#[derive(Debug, Clone)]
pub struct StardogConfig {
    pub endpoint: String,
    pub database: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl StardogConfig {
    pub fn new(endpoint: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            database: database.into(),
            username: None,
            password: None,
        }
    }

    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Reads `STARDOG_ENDPOINT`, `STARDOG_DATABASE`, and optionally
    /// `STARDOG_USERNAME`/`STARDOG_PASSWORD` from the process environment.
    pub fn from_env() -> Result<Self, GraphError> {
        let endpoint = required_env("STARDOG_ENDPOINT")?;
        let database = required_env("STARDOG_DATABASE")?;
        let username = std::env::var("STARDOG_USERNAME").ok();
        let password = std::env::var("STARDOG_PASSWORD").ok();
        Ok(Self {
            endpoint,
            database,
            username,
            password,
        })
    }
}

/// Connection settings for a GraphDB/RDF4J repository, normally read from
/// `GRAPHDB_ENDPOINT`/`GRAPHDB_REPOSITORY`.
#[derive(Debug, Clone)]
pub struct GraphDbConfig {
    pub endpoint: String,
    pub repository: String,
}

impl GraphDbConfig {
    pub fn new(endpoint: impl Into<String>, repository: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            repository: repository.into(),
        }
    }

    /// Reads `GRAPHDB_ENDPOINT` and `GRAPHDB_REPOSITORY` from the process
    /// environment. GraphDB auth is either unauthenticated or caller-supplied
    /// (spec.md §4.6 Auth), so there is no credentials pair here.
    pub fn from_env() -> Result<Self, GraphError> {
        Ok(Self {
            endpoint: required_env("GRAPHDB_ENDPOINT")?,
            repository: required_env("GRAPHDB_REPOSITORY")?,
        })
    }
}

fn required_env(name: &str) -> Result<String, GraphError> {
    std::env::var(name).map_err(|_| GraphError::connection(name, "environment variable not set"))
}
