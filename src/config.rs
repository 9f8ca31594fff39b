use serde::{Deserialize, Serialize};

use crate::error::{Result, TenancyError};
use crate::organizations::OrganizationConfig;
use crate::utils::get_env_with_prefix;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub orgs: OrganizationConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Builder for Config with environment variable support
#[must_use = "builder does nothing until you call build()"]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    pub fn with_json_logging(mut self, enabled: bool) -> Self {
        self.config.logging.json = enabled;
        self
    }

    pub fn with_orgs(mut self, orgs: OrganizationConfig) -> Self {
        self.config.orgs = orgs;
        self
    }

    pub fn with_org_header(mut self, header: impl Into<String>) -> Self {
        self.config.orgs.org_header = header.into();
        self
    }

    /// Load configuration from environment variables with TENANCY_ prefix
    pub fn from_env(mut self) -> Self {
        if let Some(level) = get_env_with_prefix("LOG_LEVEL") {
            self.config.logging.level = level;
        }
        if let Some(json) = get_env_with_prefix("LOG_JSON") {
            self.config.logging.json = json.parse().unwrap_or(false);
        }
        if let Some(header) = get_env_with_prefix("ORG_HEADER") {
            self.config.orgs.org_header = header;
        }
        if let Some(len) = get_env_with_prefix("MAX_ORG_NAME_LEN") {
            if let Ok(len) = len.parse() {
                self.config.orgs.max_org_name_len = len;
            }
        }
        if let Some(len) = get_env_with_prefix("MAX_PROJECT_NAME_LEN") {
            if let Ok(len) = len.parse() {
                self.config.orgs.max_project_name_len = len;
            }
        }
        self
    }

    /// Build the configuration, validating all settings
    ///
    /// # Errors
    ///
    /// Returns a validation error for an unknown log level or invalid
    /// organization settings.
    pub fn build(self) -> Result<Config> {
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.config.logging.level.to_lowercase().as_str()) {
            return Err(TenancyError::validation(format!(
                "Invalid log level: {}. Must be one of: {}",
                self.config.logging.level,
                valid_log_levels.join(", ")
            )));
        }

        self.config.orgs.validate()?;

        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_build() {
        let config = ConfigBuilder::new().build().unwrap();
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json);
        assert_eq!(config.orgs.org_header, "x-org-id");
    }

    #[test]
    fn test_invalid_log_level() {
        let result = ConfigBuilder::new().with_log_level("loud").build();
        assert!(matches!(result, Err(TenancyError::Validation(_))));
    }

    #[test]
    fn test_invalid_org_header() {
        let result = ConfigBuilder::new().with_org_header("bad header").build();
        assert!(result.is_err());
    }

    #[test]
    fn test_from_env() {
        unsafe {
            std::env::set_var("TENANCY_ORG_HEADER", "x-workspace-id");
            std::env::set_var("TENANCY_MAX_PROJECT_NAME_LEN", "40");
        }

        let config = ConfigBuilder::new().from_env().build().unwrap();
        assert_eq!(config.orgs.org_header, "x-workspace-id");
        assert_eq!(config.orgs.max_project_name_len, 40);

        unsafe {
            std::env::remove_var("TENANCY_ORG_HEADER");
            std::env::remove_var("TENANCY_MAX_PROJECT_NAME_LEN");
        }
    }
}
