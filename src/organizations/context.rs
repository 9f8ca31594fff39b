//! Organization context resolution.
//!
//! Every org-scoped operation reads the organization from one request
//! header. Resolution is a pure parse and runs before any store lookup.

use axum::http::{HeaderMap, HeaderName};

use super::config::{DEFAULT_ORG_HEADER, OrganizationConfig};
use super::types::OrgId;
use crate::error::{Result, TenancyError};

/// Resolves the organization a request claims to act within.
///
/// # Example
///
/// ```rust
/// use axum::http::HeaderMap;
/// use tideway_tenancy::organizations::OrgContextResolver;
///
/// let resolver = OrgContextResolver::default();
/// let mut headers = HeaderMap::new();
/// headers.insert("x-org-id", "6f1c1f9e-8f0b-4a53-9d0e-8f3b8f6f2a10".parse().unwrap());
///
/// let org_id = resolver.resolve(&headers).unwrap();
/// assert_eq!(org_id.to_string(), "6f1c1f9e-8f0b-4a53-9d0e-8f3b8f6f2a10");
/// ```
#[derive(Clone, Debug)]
pub struct OrgContextResolver {
    header: HeaderName,
}

impl Default for OrgContextResolver {
    fn default() -> Self {
        Self {
            header: HeaderName::from_static(DEFAULT_ORG_HEADER),
        }
    }
}

impl OrgContextResolver {
    /// Resolve from a custom header.
    #[must_use]
    pub fn new(header: HeaderName) -> Self {
        Self { header }
    }

    /// Build a resolver for the configured header.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the header name is invalid.
    pub fn from_config(config: &OrganizationConfig) -> Result<Self> {
        let header = HeaderName::from_bytes(config.org_header.as_bytes()).map_err(|_| {
            TenancyError::validation(format!(
                "Invalid organization header name: {:?}",
                config.org_header
            ))
        })?;
        Ok(Self { header })
    }

    /// The header this resolver reads.
    #[must_use]
    pub fn header(&self) -> &HeaderName {
        &self.header
    }

    /// Extract and validate the organization ID.
    ///
    /// # Errors
    ///
    /// - `MissingOrgContext` if the header is absent.
    /// - `InvalidOrgContext` if it is not a UUID (including empty values).
    pub fn resolve(&self, headers: &HeaderMap) -> Result<OrgId> {
        let value = headers
            .get(&self.header)
            .ok_or_else(|| TenancyError::missing_org_context(self.header.as_str()))?;

        value
            .to_str()
            .ok()
            .and_then(|raw| raw.trim().parse::<OrgId>().ok())
            .ok_or_else(|| TenancyError::invalid_org_context(self.header.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(name: &'static str, value: HeaderValue) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(name, value);
        headers
    }

    #[test]
    fn test_missing_header() {
        let resolver = OrgContextResolver::default();
        let err = resolver.resolve(&HeaderMap::new()).unwrap_err();
        assert!(matches!(err, TenancyError::MissingOrgContext { ref header } if header == "x-org-id"));
    }

    #[test]
    fn test_malformed_values() {
        let resolver = OrgContextResolver::default();
        for raw in ["", "   ", "acme", "1234", "6f1c1f9e-8f0b-4a53-9d0e", "6f1c1f9e-8f0b-4a53-9d0e-8f3b8f6f2a1z"] {
            let headers = headers_with("x-org-id", HeaderValue::from_str(raw).unwrap());
            let err = resolver.resolve(&headers).unwrap_err();
            assert!(
                matches!(err, TenancyError::InvalidOrgContext { .. }),
                "expected invalid context for {raw:?}, got {err:?}"
            );
        }
    }

    #[test]
    fn test_opaque_bytes_rejected() {
        let resolver = OrgContextResolver::default();
        let headers = headers_with("x-org-id", HeaderValue::from_bytes(b"\xfa\xfb").unwrap());
        assert!(matches!(
            resolver.resolve(&headers),
            Err(TenancyError::InvalidOrgContext { .. })
        ));
    }

    #[test]
    fn test_valid_uuid() {
        let resolver = OrgContextResolver::default();
        let id = OrgId::new();
        let headers = headers_with("x-org-id", HeaderValue::from_str(&id.to_string()).unwrap());
        assert_eq!(resolver.resolve(&headers).unwrap(), id);
    }

    #[test]
    fn test_header_lookup_case_insensitive() {
        let resolver = OrgContextResolver::default();
        let id = OrgId::new();
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_bytes(b"X-Org-Id").unwrap(),
            HeaderValue::from_str(&id.to_string()).unwrap(),
        );
        assert_eq!(resolver.resolve(&headers).unwrap(), id);
    }

    #[test]
    fn test_custom_header_from_config() {
        let config = OrganizationConfig::new().org_header("X-Tenant-Id");
        let resolver = OrgContextResolver::from_config(&config).unwrap();
        assert_eq!(resolver.header().as_str(), "x-tenant-id");

        let id = OrgId::new();
        let headers = headers_with("x-tenant-id", HeaderValue::from_str(&id.to_string()).unwrap());
        assert_eq!(resolver.resolve(&headers).unwrap(), id);

        // The default header is ignored once a custom one is configured
        let headers = headers_with("x-org-id", HeaderValue::from_str(&id.to_string()).unwrap());
        assert!(matches!(
            resolver.resolve(&headers),
            Err(TenancyError::MissingOrgContext { .. })
        ));
    }

    #[test]
    fn test_invalid_config_header() {
        let config = OrganizationConfig::new().org_header("bad header");
        assert!(OrgContextResolver::from_config(&config).is_err());
    }
}
