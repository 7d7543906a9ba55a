//! TOML configuration for showlog callers.
//!
//! # Responsibility
//! - Describe where the database lives, how logging is set up, and which
//!   base URL and route templates representation links use.
//! - Fill every omitted section or key with a working default.
//!
//! # Invariants
//! - `validate()` passing means `route_table()` cannot fail.

use crate::logging::default_log_level;
use crate::schema::RouteTable;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const DEFAULT_BASE_URL: &str = "http://localhost:5555";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowlogConfig {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub links: LinkConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite file. Callers that need persistence use `require_path`.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// One of `trace|debug|info|warn|error`.
    pub level: String,
    /// Absolute log directory. `None` leaves file logging off.
    pub directory: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// Prefix for every generated link, e.g. `https://api.example.com`.
    pub base_url: String,
    /// Template overrides keyed by route identifier.
    pub routes: BTreeMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level().to_string(),
            directory: None,
        }
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            routes: BTreeMap::new(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(toml::de::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        Self::Parse(value)
    }
}

impl ShowlogConfig {
    /// Reads and validates a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Parses and validates config text.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.links.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("links.base_url cannot be empty".to_string()));
        }
        self.links.route_table()?;
        if let Some(directory) = &self.logging.directory {
            if !directory.is_absolute() {
                return Err(ConfigError::Invalid(format!(
                    "logging.directory must be absolute, got `{}`",
                    directory.display()
                )));
            }
        }
        Ok(())
    }
}

impl DatabaseConfig {
    /// Returns the configured SQLite file, failing when none is set.
    pub fn require_path(&self) -> Result<&Path, ConfigError> {
        self.path.as_deref().ok_or_else(|| {
            ConfigError::Invalid("database.path must name an SQLite file".to_string())
        })
    }
}

impl LinkConfig {
    /// Builds the route table with any configured template overrides.
    pub fn route_table(&self) -> Result<RouteTable, ConfigError> {
        self.routes
            .iter()
            .try_fold(RouteTable::new(self.base_url.trim()), |table, (name, template)| {
                table
                    .with_named_template(name, template.clone())
                    .map_err(|err| ConfigError::Invalid(err.to_string()))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, ShowlogConfig};
    use crate::schema::Route;

    #[test]
    fn empty_config_uses_defaults() {
        let config = ShowlogConfig::from_toml_str("").unwrap();
        assert_eq!(config, ShowlogConfig::default());
        assert!(config.database.path.is_none());
        assert_eq!(config.links.base_url, "http://localhost:5555");
    }

    #[test]
    fn route_overrides_reach_the_table() {
        let config = ShowlogConfig::from_toml_str(
            r#"
            [links]
            base_url = "https://api.example.com/"

            [links.routes]
            singleepisoderesource = "/v2/episodes/{episode_id}"
            "#,
        )
        .unwrap();

        let table = config.links.route_table().unwrap();
        assert_eq!(
            table.url_for(Route::SingleEpisode, &[("episode_id", 4)]).unwrap(),
            "https://api.example.com/v2/episodes/4"
        );
    }

    #[test]
    fn unknown_route_override_is_rejected() {
        let err = ShowlogConfig::from_toml_str(
            r#"
            [links.routes]
            episoderesource = "/e/{episode_id}"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(message) if message.contains("episoderesource")));
    }

    #[test]
    fn route_override_without_leading_slash_is_rejected() {
        let err = ShowlogConfig::from_toml_str(
            r#"
            [links]
            base_url = "https://api.example.com"

            [links.routes]
            singleepisoderesource = "episodes/{episode_id}"
            "#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid(message) if message.contains("must start with `/`")
        ));
    }

    #[test]
    fn database_path_is_required_on_request() {
        let config = ShowlogConfig::default();
        assert!(matches!(
            config.database.require_path(),
            Err(ConfigError::Invalid(message)) if message.contains("database.path")
        ));

        let config = ShowlogConfig::from_toml_str(
            r#"
            [database]
            path = "/var/lib/showlog/show.db"
            "#,
        )
        .unwrap();
        assert_eq!(
            config.database.require_path().unwrap(),
            std::path::Path::new("/var/lib/showlog/show.db")
        );
    }

    #[test]
    fn relative_log_directory_is_rejected() {
        let err = ShowlogConfig::from_toml_str(
            r#"
            [logging]
            directory = "logs"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = ShowlogConfig::from_toml_str("[links").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
