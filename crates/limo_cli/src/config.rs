//! Configuration file support for limo.
//!
//! Configuration is loaded with the following precedence (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (prefixed with `LIMO_`, e.g., `LIMO_DATABASE_URL`)
//! 3. Config file (./limo.toml, then ~/.config/limo/config.toml)
//! 4. Built-in defaults
//!
//! The database URL defaults to `sqlite://~/.local/state/limo/limo.db` on Linux
//! (using the XDG state directory) if not explicitly configured.
//!
//! Example config file:
//! ```toml
//! [database]
//! url = "sqlite://~/.local/state/limo/limo.db"  # optional, this is the default
//!
//! [github]
//! token = "ghp_..."  # or use LIMO_GITHUB_TOKEN env var
//! user = "octocat"   # optional, defaults to the token's owner
//!
//! [gitlab]
//! host = "gitlab.com"  # or self-hosted instance
//! token = "glpat-..."  # or use LIMO_GITLAB_TOKEN env var
//!
//! [http]
//! timeout = 30
//! insecure = false
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{fs, io};

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use directories::ProjectDirs;
use limo::source::SourceOptions;
use serde::Deserialize;

const APP_NAME: &str = "limo";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub github: ServiceConfig,
    pub gitlab: GitLabConfig,
    pub http: HttpConfig,
}

/// Database configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database connection URL.
    /// Defaults to `sqlite://~/.local/state/limo/limo.db` if not specified.
    pub url: Option<String>,
}

/// Credentials for one hosting service.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// API token, written by `limo login`.
    pub token: Option<String>,
    /// Whose stars to sync. Empty means the token's owner.
    pub user: Option<String>,
}

/// GitLab configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GitLabConfig {
    /// GitLab host (e.g., "gitlab.com" or "https://gitlab.example.com").
    /// Can also be set via LIMO_GITLAB_HOST environment variable.
    pub host: String,
    pub token: Option<String>,
    pub user: Option<String>,
}

impl Default for GitLabConfig {
    fn default() -> Self {
        Self {
            host: "gitlab.com".to_string(),
            token: None,
            user: None,
        }
    }
}

/// HTTP client settings shared by every adapter.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout in seconds.
    pub timeout: u64,
    /// Accept invalid TLS certificates.
    pub insecure: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: 30,
            insecure: false,
        }
    }
}

impl Config {
    /// Load configuration using the config crate's layered approach.
    ///
    /// Sources are loaded in order (later sources override earlier):
    /// 1. Built-in defaults
    /// 2. XDG config file (~/.config/limo/config.toml)
    /// 3. Local config file (./limo.toml)
    /// 4. Environment variables with LIMO_ prefix
    pub fn load() -> Self {
        let mut builder = ConfigBuilder::builder();

        if let Some(xdg_config) = Self::default_config_path()
            && xdg_config.exists()
        {
            tracing::debug!("Loading config from {:?}", xdg_config);
            builder = builder.add_source(
                File::from(xdg_config)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        let local_config = PathBuf::from("limo.toml");
        if local_config.exists() {
            tracing::debug!("Loading config from ./limo.toml");
            builder = builder.add_source(
                File::from(local_config)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        // LIMO_GITHUB_TOKEN -> github.token
        builder = builder.add_source(
            Environment::with_prefix("LIMO")
                .separator("_")
                .try_parsing(true),
        );

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<Config>() {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Failed to deserialize config: {}", e);
                    Config::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to build config: {}", e);
                Config::default()
            }
        }
    }

    /// Get the database URL, falling back to the default state directory path.
    ///
    /// The `mode=rwc` parameter creates the SQLite file if it doesn't exist.
    pub fn database_url(&self) -> Option<String> {
        self.database.url.clone().or_else(|| {
            Self::default_state_dir().map(|state_dir| {
                let db_path = state_dir.join("limo.db");
                format!("sqlite://{}?mode=rwc", db_path.display())
            })
        })
    }

    /// Token and user configured for `service`.
    fn credentials(&self, service: &str) -> (Option<&String>, Option<&String>) {
        match service.to_lowercase().as_str() {
            "github" => (self.github.token.as_ref(), self.github.user.as_ref()),
            "gitlab" => (self.gitlab.token.as_ref(), self.gitlab.user.as_ref()),
            _ => (None, None),
        }
    }

    /// The stored token for `service`, if any.
    pub fn token_for(&self, service: &str) -> Option<String> {
        self.credentials(service)
            .0
            .filter(|t| !t.trim().is_empty())
            .cloned()
    }

    /// The configured user for `service`, or empty for the token's owner.
    pub fn user_for(&self, service: &str) -> String {
        self.credentials(service).1.cloned().unwrap_or_default()
    }

    /// Adapter options. `insecure` from the command line wins over the file.
    pub fn source_options(&self, insecure: bool) -> SourceOptions {
        SourceOptions {
            timeout: Duration::from_secs(self.http.timeout),
            insecure: insecure || self.http.insecure,
            gitlab_host: self.gitlab.host.clone(),
            ..SourceOptions::default()
        }
    }

    /// Get the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Get the default state directory path.
    ///
    /// On Linux, this is `$XDG_STATE_HOME/limo` or `~/.local/state/limo`.
    /// On macOS/Windows, falls back to the data directory.
    pub fn default_state_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", APP_NAME).map(|dirs| {
            // state_dir() returns None on macOS/Windows
            dirs.state_dir()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| dirs.data_dir().to_path_buf())
        })
    }

    /// Save a token for `service` to the default config file.
    pub fn save_token(service: &str, token: &str) -> io::Result<PathBuf> {
        let config_path = Self::default_config_path().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                "Could not determine config directory",
            )
        })?;
        Self::save_token_to(&config_path, service, token)?;
        Ok(config_path)
    }

    /// Save a token into the `[service]` table of the file at `config_path`.
    ///
    /// Creates the file and parent directories if they don't exist. Only the
    /// `token` key is touched; formatting, comments, and other settings are
    /// preserved.
    pub fn save_token_to(config_path: &Path, service: &str, token: &str) -> io::Result<()> {
        use toml_edit::{DocumentMut, value};

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            String::new()
        };

        let mut doc: DocumentMut = content.parse().map_err(|e| {
            io::Error::new(io::ErrorKind::InvalidData, format!("Invalid TOML: {}", e))
        })?;

        let section = service.to_lowercase();
        let section = section.as_str();
        if !doc.contains_key(section) {
            doc[section] = toml_edit::table();
        }
        doc[section]["token"] = value(token);

        fs::write(config_path, doc.to_string())
    }
}
