//! Configuration loader
//!
//! Merges defaults, a TOML file, and `VB_`-prefixed environment variables
//! through figment, then validates the result. Configuration errors fail
//! fast: retrying cannot fix misconfiguration.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use tracing::{info, warn};

use vb_domain::error::{Error, Result};
use vb_domain::value_objects::RoutePreference;

use super::types::AppConfig;

/// Environment variable prefix
const CONFIG_ENV_PREFIX: &str = "VB";

/// Default configuration file name
const DEFAULT_CONFIG_FILENAME: &str = "vectorbridge.toml";

/// Configuration loader service
#[derive(Clone, Default)]
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a loader with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the configuration file path
    pub fn with_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Load configuration from all sources
    ///
    /// Sources merge in order, later overriding earlier:
    /// 1. `AppConfig::default()`
    /// 2. TOML file (explicit path, else `./vectorbridge.toml` if present)
    /// 3. Environment variables (e.g. `VB_SERVER_PORT`)
    pub fn load(&self) -> Result<AppConfig> {
        let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));

        let path = self.config_path.clone().or_else(Self::find_default_config_path);
        if let Some(path) = path {
            if path.exists() {
                info!(path = %path.display(), "loading configuration file");
                figment = figment.merge(Toml::file(&path));
            } else {
                warn!(path = %path.display(), "configuration file not found, using defaults");
            }
        }

        figment = figment.merge(Env::prefixed(&format!("{CONFIG_ENV_PREFIX}_")).split("_"));

        let config: AppConfig = figment
            .extract()
            .map_err(|e| Error::config_with_source("failed to extract configuration", e))?;

        validate_app_config(&config)?;
        Ok(config)
    }

    /// Reload configuration from the same sources
    pub fn reload(&self) -> Result<AppConfig> {
        self.load()
    }

    /// Persist configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, config: &AppConfig, path: P) -> Result<()> {
        let toml_string = toml::to_string_pretty(config)
            .map_err(|e| Error::config_with_source("failed to serialize configuration", e))?;
        std::fs::write(path.as_ref(), toml_string)?;
        Ok(())
    }

    /// The configured file path, if any
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    fn find_default_config_path() -> Option<PathBuf> {
        let candidate = std::env::current_dir().ok()?.join(DEFAULT_CONFIG_FILENAME);
        candidate.exists().then_some(candidate)
    }
}

/// Validate every configuration section
pub fn validate_app_config(config: &AppConfig) -> Result<()> {
    validate_server(config)?;
    validate_cache(config)?;
    validate_routing(config)?;
    validate_ingestion(config)?;
    validate_query(config)?;
    validate_providers(config)?;
    Ok(())
}

fn validate_server(config: &AppConfig) -> Result<()> {
    if config.server.port == 0 {
        return Err(Error::config("server port cannot be 0"));
    }
    Ok(())
}

fn validate_cache(config: &AppConfig) -> Result<()> {
    if config.cache.capacity == 0 {
        return Err(Error::config("cache capacity cannot be 0"));
    }
    for (tier, ttl) in [
        ("embedding", config.cache.embedding_ttl_secs),
        ("context", config.cache.context_ttl_secs),
        ("result", config.cache.result_ttl_secs),
    ] {
        if ttl == 0 {
            return Err(Error::config(format!("{tier} cache TTL cannot be 0")));
        }
    }
    Ok(())
}

fn validate_routing(config: &AppConfig) -> Result<()> {
    if config.routing.call_timeout_secs == 0 {
        return Err(Error::config("provider call timeout cannot be 0"));
    }
    if config.routing.balanced_batch_threshold == 0 {
        return Err(Error::config("balanced batch threshold cannot be 0"));
    }
    for (tenant, preference) in &config.routing.tenant_preferences {
        tenant
            .parse::<u64>()
            .map_err(|_| Error::config(format!("tenant id '{tenant}' is not numeric")))?;
        preference.parse::<RoutePreference>()?;
    }
    Ok(())
}

fn validate_ingestion(config: &AppConfig) -> Result<()> {
    let ingestion = &config.ingestion;
    if ingestion.concurrency == 0 {
        return Err(Error::config("ingestion concurrency cannot be 0"));
    }
    if ingestion.batch_min == 0 || ingestion.batch_max < ingestion.batch_min {
        return Err(Error::config(format!(
            "invalid ingestion batch window {}..{}",
            ingestion.batch_min, ingestion.batch_max
        )));
    }
    Ok(())
}

fn validate_query(config: &AppConfig) -> Result<()> {
    if config.query.concurrency == 0 {
        return Err(Error::config("query concurrency cannot be 0"));
    }
    if !(0.0..=1.0).contains(&config.query.simple_threshold) {
        return Err(Error::config(
            "query simple threshold must be within [0, 1]",
        ));
    }
    Ok(())
}

fn validate_providers(config: &AppConfig) -> Result<()> {
    if !config.providers.embedding.iter().any(|e| e.active) {
        return Err(Error::config(
            "at least one active embedding endpoint is required",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(validate_app_config(&AppConfig::default()).is_ok());
    }

    #[test]
    fn toml_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vectorbridge.toml");
        std::fs::write(
            &path,
            r#"
                [server]
                port = 9191

                [cache]
                negative_ttl_secs = 600

                [[providers.embedding]]
                provider = "null"
                priority = 5
            "#,
        )
        .unwrap();

        let config = ConfigLoader::new().with_config_path(&path).load().unwrap();
        assert_eq!(config.server.port, 9191);
        assert_eq!(config.cache.negative_ttl_secs, Some(600));
        assert_eq!(config.providers.embedding.len(), 1);
        assert_eq!(config.providers.embedding[0].priority, 5);
        // Untouched sections keep their defaults
        assert_eq!(config.ingestion.concurrency, 4);
    }

    #[test]
    fn save_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vectorbridge.toml");
        let loader = ConfigLoader::new().with_config_path(&path);

        let mut config = AppConfig::default();
        config.server.port = 7777;
        loader.save_to_file(&config, &path).unwrap();

        assert_eq!(loader.load().unwrap().server.port, 7777);
    }

    #[test]
    fn zero_port_fails_fast() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        let err = validate_app_config(&config).expect_err("must fail");
        assert!(err.is_fatal());
    }

    #[test]
    fn empty_endpoint_pool_is_rejected() {
        let mut config = AppConfig::default();
        config.providers.embedding.clear();
        assert!(validate_app_config(&config).is_err());
    }

    #[test]
    fn bad_tenant_preference_is_rejected() {
        let mut config = AppConfig::default();
        config
            .routing
            .tenant_preferences
            .insert("7".to_string(), "warp-speed".to_string());
        assert!(validate_app_config(&config).is_err());

        config
            .routing
            .tenant_preferences
            .insert("7".to_string(), "quality".to_string());
        assert!(validate_app_config(&config).is_ok());
    }
}
