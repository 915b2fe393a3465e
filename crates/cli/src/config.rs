//! Configuration for the CLI binary: a YAML file merged with environment
//! overrides, mirroring the original solver's `Config` (API domain, token,
//! timeout, solver choice) generalized with a reconstruction strategy pick.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "aedificium.yaml";
const DEFAULT_PRODUCTION_URL: &str = "https://31pwr5t6ij.execute-api.eu-west-2.amazonaws.com";
const DEFAULT_LOCAL_URL: &str = "http://localhost:8080";

/// The two base URLs a deployment knows about, following the source's own
/// `ApiDomain { local, production }` shape. Which one is actually used is
/// picked by [`Environment`], not by this struct.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ApiDomain {
    #[serde(default)]
    pub local: Option<String>,
    #[serde(default)]
    pub production: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Local,
    Production,
}

impl Default for Environment {
    fn default() -> Self {
        Environment::Production
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SolverStrategy {
    Dfs,
    Anneal,
    Auto,
}

impl Default for SolverStrategy {
    fn default() -> Self {
        SolverStrategy::Auto
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api_domain: Option<ApiDomain>,
    #[serde(default)]
    pub env: Environment,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    #[serde(default)]
    pub solver: SolverStrategy,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_domain: None,
            env: Environment::default(),
            token: None,
            request_timeout_secs: None,
            solver: SolverStrategy::default(),
        }
    }
}

impl Config {
    /// Loads `aedificium.yaml` if present, then lets environment variables
    /// (already merged into `std::env` by `dotenvy::dotenv()`) override it.
    pub fn load() -> Result<Self> {
        let mut config = Self::from_file(DEFAULT_CONFIG_PATH)?.unwrap_or_default();
        config.apply_env_overrides();
        Ok(config)
    }

    fn from_file(path: impl AsRef<Path>) -> Result<Option<Self>> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        Ok(Some(config))
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(token) = std::env::var("ICFPC_TEAM_ID") {
            self.token = Some(token);
        }
        if let Ok(env) = std::env::var("AEDIFICIUM_ENV") {
            self.env = match env.to_lowercase().as_str() {
                "local" => Environment::Local,
                "production" => Environment::Production,
                _ => self.env,
            };
        }
        if let Ok(solver) = std::env::var("AEDIFICIUM_SOLVER") {
            self.solver = match solver.to_lowercase().as_str() {
                "dfs" => SolverStrategy::Dfs,
                "anneal" => SolverStrategy::Anneal,
                "auto" => SolverStrategy::Auto,
                _ => self.solver,
            };
        }
    }

    pub fn token(&self) -> Result<String> {
        self.token.clone().ok_or_else(|| {
            anyhow::anyhow!(
                "Team ID is required. Set via ICFPC_TEAM_ID environment variable, .env file, or aedificium.yaml"
            )
        })
    }

    /// The base URL for `self.env`, falling back to the known production
    /// endpoint or to localhost if `api_domain` leaves it unset.
    pub fn base_url(&self) -> String {
        let domain = self.api_domain.as_ref();
        match self.env {
            Environment::Local => domain
                .and_then(|d| d.local.clone())
                .unwrap_or_else(|| DEFAULT_LOCAL_URL.to_string()),
            Environment::Production => domain
                .and_then(|d| d.production.clone())
                .unwrap_or_else(|| DEFAULT_PRODUCTION_URL.to_string()),
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_auto_solver_with_no_token() {
        let config = Config::default();
        assert_eq!(config.solver, SolverStrategy::Auto);
        assert!(config.token().is_err());
    }

    #[test]
    fn parses_a_minimal_yaml_document() {
        let yaml = "env: production\ntoken: abc123\nsolver: dfs\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.env, Environment::Production);
        assert_eq!(config.token.as_deref(), Some("abc123"));
        assert_eq!(config.solver, SolverStrategy::Dfs);
    }

    #[test]
    fn local_env_prefers_configured_local_url_over_the_default() {
        let yaml = "env: local\napi_domain:\n  local: http://127.0.0.1:9000\n  production: https://example.test\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.base_url(), "http://127.0.0.1:9000");
    }

    #[test]
    fn production_env_falls_back_to_the_known_default_url() {
        let config = Config::default();
        assert_eq!(config.base_url(), DEFAULT_PRODUCTION_URL);
    }
}
