//! Organization storage trait.

use crate::error::Result;
use crate::organizations::types::{Membership, OrgId, Organization};
use async_trait::async_trait;

/// Trait for organization storage operations.
///
/// # Important: Name Uniqueness
///
/// Organization names are unique. The store is the authoritative
/// enforcement point: two concurrent creations with the same name must
/// leave exactly one organization, the other failing with
/// `DuplicateOrgName`.
///
/// ```sql
/// CREATE TABLE organizations (
///     id VARCHAR(36) PRIMARY KEY,
///     name VARCHAR(120) UNIQUE NOT NULL,
///     created_at BIGINT NOT NULL
/// );
/// ```
#[async_trait]
pub trait OrganizationStore: Send + Sync {
    /// Persist an organization together with its owner membership.
    ///
    /// Both rows become visible together or not at all; no reader may ever
    /// observe the organization without its owner.
    async fn create_with_owner(&self, org: &Organization, owner: &Membership) -> Result<()>;

    /// Find an organization by its ID.
    async fn find_by_id(&self, id: &OrgId) -> Result<Option<Organization>>;

    /// Find an organization by its exact name.
    async fn find_by_name(&self, name: &str) -> Result<Option<Organization>>;

    /// Check if a name is free.
    ///
    /// Advisory only; `create_with_owner` is the authoritative check.
    async fn is_name_available(&self, name: &str) -> Result<bool> {
        Ok(self.find_by_name(name).await?.is_none())
    }
}
