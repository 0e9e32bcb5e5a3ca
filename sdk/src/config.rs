//! Runtime configuration from the environment.
//!
//! | Variable           | Default                 |
//! |--------------------|-------------------------|
//! | `OLI_PROJECTS_URL` | growthepie registry     |
//! | `OLI_MAX_ROWS`     | 50                      |
//! | `OLI_PORT`         | 3000                    |
//! | `OLI_MODE`         | `simple`                |
//!
//! A `.env` file in the working directory is loaded first.

use serde::Serialize;
use std::env;

use crate::error::{ConfigError, ConfigResult};
use crate::projects::{ProjectClient, DEFAULT_PROJECTS_URL};
use crate::reference::ModeProfile;
use crate::validation::{ValidationOptions, DEFAULT_MAX_ROWS};

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SdkConfig {
    pub projects_url: String,
    pub max_rows: usize,
    pub port: u16,
    pub mode: ModeProfile,
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            projects_url: DEFAULT_PROJECTS_URL.to_string(),
            max_rows: DEFAULT_MAX_ROWS,
            port: DEFAULT_PORT,
            mode: ModeProfile::simple(),
        }
    }
}

impl SdkConfig {
    /// Load `.env`, then read the `OLI_*` variables.
    pub fn from_env() -> ConfigResult<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. Unset or blank keys keep their default.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        if let Some(url) = get("OLI_PROJECTS_URL") {
            config.projects_url = url;
        }
        if let Some(raw) = get("OLI_MAX_ROWS") {
            config.max_rows = parse_value("OLI_MAX_ROWS", &raw)?;
            if config.max_rows == 0 {
                return Err(ConfigError::InvalidValue {
                    key: "OLI_MAX_ROWS".to_string(),
                    value: raw,
                });
            }
        }
        if let Some(raw) = get("OLI_PORT") {
            config.port = parse_value("OLI_PORT", &raw)?;
        }
        if let Some(name) = get("OLI_MODE") {
            config.mode = ModeProfile::by_name(&name).ok_or(ConfigError::UnknownMode(name))?;
        }

        Ok(config)
    }

    /// Validation options carrying this mode and row ceiling.
    pub fn validation_options(&self) -> ValidationOptions {
        ValidationOptions::new()
            .with_mode(self.mode.clone())
            .with_max_rows(self.max_rows)
    }

    /// Registry client for `projects_url`. The public registry shares the
    /// process-wide cache.
    pub fn project_client(&self) -> ProjectClient {
        if self.projects_url == DEFAULT_PROJECTS_URL {
            ProjectClient::default()
        } else {
            ProjectClient::new(self.projects_url.clone())
        }
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, raw: &str) -> ConfigResult<T> {
    raw.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = SdkConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, SdkConfig::default());
        assert_eq!(config.max_rows, 50);
        assert_eq!(config.project_client().url(), DEFAULT_PROJECTS_URL);
    }

    #[test]
    fn test_overrides() {
        let config = SdkConfig::from_lookup(lookup(&[
            ("OLI_MAX_ROWS", "10"),
            ("OLI_PORT", " 8080 "),
            ("OLI_MODE", "Advanced"),
            ("OLI_PROJECTS_URL", "http://localhost:9000/projects.json"),
        ]))
        .unwrap();

        assert_eq!(config.max_rows, 10);
        assert_eq!(config.port, 8080);
        assert_eq!(config.mode.id, "advanced");
        assert_eq!(config.validation_options().max_rows, 10);
        assert_eq!(config.project_client().url(), "http://localhost:9000/projects.json");
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            SdkConfig::from_lookup(lookup(&[("OLI_MAX_ROWS", "many")])),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            SdkConfig::from_lookup(lookup(&[("OLI_MAX_ROWS", "0")])),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            SdkConfig::from_lookup(lookup(&[("OLI_MODE", "expert")])),
            Err(ConfigError::UnknownMode(_))
        ));
    }
}
