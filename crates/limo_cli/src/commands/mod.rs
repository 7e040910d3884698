//! Subcommand handlers.

pub(crate) mod list;
pub(crate) mod login;
pub(crate) mod meta;
pub(crate) mod migrate;
pub(crate) mod output;
pub(crate) mod prune;
pub(crate) mod stars;
pub(crate) mod tags;
pub(crate) mod update;

use std::sync::Arc;

use limo::source::{ServiceRegistry, SourceError, StarSource};
use sea_orm::DatabaseConnection;

use crate::GlobalArgs;
use crate::config::Config;

pub(crate) type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Everything a database-backed command needs.
pub(crate) struct Context {
    pub config: Config,
    pub db: DatabaseConnection,
    pub registry: ServiceRegistry,
    pub global: GlobalArgs,
}

impl Context {
    /// The source selected with `--service`.
    pub fn source(&self) -> Arc<dyn StarSource> {
        self.registry.for_name(&self.global.service)
    }

    /// The saved token for `service`.
    pub fn token_for(&self, service: &str) -> Result<String, String> {
        require_token(&self.config, service)
    }
}

fn require_token(config: &Config, service: &str) -> Result<String, String> {
    config
        .token_for(service)
        .ok_or_else(|| format!("not logged in to {service} (run `limo login --service {service}`)"))
}

/// Build the registry of every adapter compiled into this binary.
pub(crate) fn build_registry(config: &Config, insecure: bool) -> Result<ServiceRegistry, SourceError> {
    #[cfg(any(feature = "github", feature = "gitlab"))]
    {
        ServiceRegistry::with_defaults(&config.source_options(insecure))
    }
    #[cfg(not(any(feature = "github", feature = "gitlab")))]
    {
        let _ = (config, insecure);
        Ok(ServiceRegistry::new())
    }
}
