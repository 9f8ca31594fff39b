//! Membership storage trait.

use crate::error::Result;
use crate::organizations::types::{Membership, OrgId, Role, UserId};
use async_trait::async_trait;

/// Authoritative mapping of (user, org) to role.
///
/// # Uniqueness
///
/// At most one membership may exist per (user, org) pair. Implementations
/// **must** enforce this atomically (a unique key, or a single write guard
/// covering the check and the insert), never as a separate lookup followed
/// by an insert.
///
/// ```sql
/// CREATE TABLE organization_members (
///     org_id VARCHAR(36) NOT NULL,
///     user_id VARCHAR(255) NOT NULL,
///     role VARCHAR(20) NOT NULL,
///     created_at BIGINT NOT NULL,
///     PRIMARY KEY (org_id, user_id)  -- uniqueness lives here
/// );
/// ```
#[async_trait]
pub trait MembershipStore: Send + Sync {
    /// Exact lookup of one membership.
    async fn find(&self, user_id: &UserId, org_id: &OrgId) -> Result<Option<Membership>>;

    /// Create a membership.
    ///
    /// Fails with `DuplicateMembership` if one already exists for the pair.
    async fn create(&self, user_id: &UserId, org_id: &OrgId, role: Role) -> Result<Membership>;

    /// Create the membership, or set the role of the existing one.
    ///
    /// Returns the stored membership and whether it was created by this call.
    /// Under concurrent calls for the same pair exactly one caller sees `true`.
    async fn upsert(
        &self,
        user_id: &UserId,
        org_id: &OrgId,
        role: Role,
    ) -> Result<(Membership, bool)>;

    /// All memberships of a user, in no particular order.
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Membership>>;

    /// All memberships of an organization, in no particular order.
    async fn list_for_org(&self, org_id: &OrgId) -> Result<Vec<Membership>>;

    /// Check if a user is a member of an organization.
    async fn is_member(&self, user_id: &UserId, org_id: &OrgId) -> Result<bool> {
        Ok(self.find(user_id, org_id).await?.is_some())
    }
}
