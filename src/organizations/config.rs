//! Organization configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TenancyError};

/// Default header carrying the organization context.
pub const DEFAULT_ORG_HEADER: &str = "x-org-id";

/// Configuration for organization-scoped operations.
///
/// # Example
///
/// ```rust
/// use tideway_tenancy::organizations::OrganizationConfig;
///
/// let config = OrganizationConfig::new()
///     .org_header("x-tenant-id")
///     .max_org_name_len(64);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct OrganizationConfig {
    /// Request header carrying the organization ID.
    #[serde(default = "default_org_header")]
    pub org_header: String,

    /// Maximum organization name length, in characters.
    #[serde(default = "default_name_len")]
    pub max_org_name_len: usize,

    /// Maximum project name length, in characters.
    #[serde(default = "default_name_len")]
    pub max_project_name_len: usize,
}

impl Default for OrganizationConfig {
    fn default() -> Self {
        Self {
            org_header: default_org_header(),
            max_org_name_len: default_name_len(),
            max_project_name_len: default_name_len(),
        }
    }
}

fn default_org_header() -> String {
    DEFAULT_ORG_HEADER.to_string()
}

fn default_name_len() -> usize {
    120
}

impl OrganizationConfig {
    /// Create a new configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the organization context header.
    #[must_use]
    pub fn org_header(mut self, header: impl Into<String>) -> Self {
        self.org_header = header.into();
        self
    }

    /// Set the maximum organization name length.
    #[must_use]
    pub fn max_org_name_len(mut self, max: usize) -> Self {
        self.max_org_name_len = max;
        self
    }

    /// Set the maximum project name length.
    #[must_use]
    pub fn max_project_name_len(mut self, max: usize) -> Self {
        self.max_project_name_len = max;
        self
    }

    /// Check the settings are usable.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an invalid header name or a zero length limit.
    pub fn validate(&self) -> Result<()> {
        if axum::http::HeaderName::from_bytes(self.org_header.as_bytes()).is_err() {
            return Err(TenancyError::validation(format!(
                "Invalid organization header name: {:?}",
                self.org_header
            )));
        }

        if self.max_org_name_len == 0 {
            return Err(TenancyError::validation(
                "max_org_name_len must be greater than 0",
            ));
        }

        if self.max_project_name_len == 0 {
            return Err(TenancyError::validation(
                "max_project_name_len must be greater than 0",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = OrganizationConfig::default();
        assert_eq!(config.org_header, "x-org-id");
        assert_eq!(config.max_org_name_len, 120);
        assert_eq!(config.max_project_name_len, 120);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_header_rejected() {
        let config = OrganizationConfig::new().org_header("x org id");
        assert!(matches!(config.validate(), Err(TenancyError::Validation(_))));

        let config = OrganizationConfig::new().org_header("");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_limits_rejected() {
        assert!(OrganizationConfig::new().max_org_name_len(0).validate().is_err());
        assert!(OrganizationConfig::new().max_project_name_len(0).validate().is_err());
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let config: OrganizationConfig =
            serde_json::from_str(r#"{"org_header": "x-tenant"}"#).unwrap();
        assert_eq!(config.org_header, "x-tenant");
        assert_eq!(config.max_org_name_len, 120);
    }
}
