//! Authorization gate.
//!
//! Runs before any org-scoped side effect: resolve the org context, load the
//! caller's membership, then check the role against the allowed set.

use axum::http::HeaderMap;
use tracing::{debug, instrument};

use super::context::OrgContextResolver;
use super::policy::is_allowed;
use super::storage::MembershipStore;
use super::types::{Membership, OrgId, Principal, RoleSet};
use crate::error::{Result, TenancyError};

/// Combines org context, membership lookup and role policy.
///
/// # Example
///
/// ```rust,ignore
/// use tideway_tenancy::organizations::{AuthorizationGate, OrgContextResolver, RoleSet};
///
/// let gate = AuthorizationGate::new(store, OrgContextResolver::default());
/// let (membership, org_id) = gate.authorize(&principal, &headers, RoleSet::ELEVATED).await?;
/// ```
#[derive(Clone)]
pub struct AuthorizationGate<M: MembershipStore> {
    membership_store: M,
    resolver: OrgContextResolver,
}

impl<M: MembershipStore> AuthorizationGate<M> {
    #[must_use]
    pub fn new(membership_store: M, resolver: OrgContextResolver) -> Self {
        Self {
            membership_store,
            resolver,
        }
    }

    /// Get a reference to the membership store.
    pub fn membership_store(&self) -> &M {
        &self.membership_store
    }

    /// Get a reference to the org context resolver.
    pub fn resolver(&self) -> &OrgContextResolver {
        &self.resolver
    }

    /// Authorize `principal` to act within the org named by `headers`.
    ///
    /// An empty `allowed` set only requires membership.
    ///
    /// # Errors
    ///
    /// - Context errors from [`OrgContextResolver::resolve`], unchanged.
    /// - `NotAMember` if the principal has no membership in the org.
    /// - `InsufficientRole` if the membership's role is not in `allowed`.
    #[instrument(skip(self, headers), fields(user_id = %principal.user_id))]
    pub async fn authorize(
        &self,
        principal: &Principal,
        headers: &HeaderMap,
        allowed: RoleSet,
    ) -> Result<(Membership, OrgId)> {
        let org_id = self.resolver.resolve(headers)?;

        let membership = self
            .membership_store
            .find(&principal.user_id, &org_id)
            .await?
            .ok_or_else(|| {
                debug!(%org_id, "Denied: not a member");
                TenancyError::NotAMember
            })?;

        if !allowed.is_empty() && !is_allowed(membership.role, allowed) {
            debug!(%org_id, role = %membership.role, %allowed, "Denied: insufficient role");
            return Err(TenancyError::insufficient_role(allowed.to_string()));
        }

        Ok((membership, org_id))
    }
}
