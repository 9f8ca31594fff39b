//! Organization manager.
//!
//! Handles organization creation and the caller's view of their orgs.

use axum::http::HeaderMap;
use tracing::{debug, info, instrument};

use super::config::OrganizationConfig;
use super::gate::AuthorizationGate;
use super::storage::{MembershipStore, OrganizationStore};
use super::types::{
    Membership, OrgId, OrgSummary, Organization, Principal, Profile, Role, RoleSet,
};
use super::utils::{current_timestamp, normalize_name};
use crate::error::{Result, TenancyError};

/// Organization manager.
///
/// # Example
///
/// ```rust,ignore
/// use tideway_tenancy::organizations::{
///     AuthorizationGate, InMemoryOrgStore, OrgContextResolver, OrganizationConfig,
///     OrganizationManager,
/// };
///
/// let store = InMemoryOrgStore::new();
/// let gate = AuthorizationGate::new(store.clone(), OrgContextResolver::default());
/// let manager = OrganizationManager::new(store, gate, OrganizationConfig::default());
///
/// let org = manager.create(&principal, "Acme").await?;
/// ```
#[derive(Clone)]
pub struct OrganizationManager<O, M>
where
    O: OrganizationStore,
    M: MembershipStore,
{
    org_store: O,
    gate: AuthorizationGate<M>,
    config: OrganizationConfig,
}

impl<O, M> OrganizationManager<O, M>
where
    O: OrganizationStore,
    M: MembershipStore,
{
    /// Create a new organization manager.
    #[must_use]
    pub fn new(org_store: O, gate: AuthorizationGate<M>, config: OrganizationConfig) -> Self {
        Self {
            org_store,
            gate,
            config,
        }
    }

    /// Get a reference to the organization store.
    pub fn org_store(&self) -> &O {
        &self.org_store
    }

    /// Get a reference to the authorization gate.
    pub fn gate(&self) -> &AuthorizationGate<M> {
        &self.gate
    }

    /// Create an organization owned by `principal`.
    ///
    /// The organization and the owner membership become visible together.
    ///
    /// # Errors
    ///
    /// - `Validation` if the name is blank or too long.
    /// - `DuplicateOrgName` if the name is taken.
    #[instrument(skip(self), fields(user_id = %principal.user_id))]
    pub async fn create(&self, principal: &Principal, name: &str) -> Result<OrgSummary> {
        let name = normalize_name("name", name, self.config.max_org_name_len)?;

        let now = current_timestamp();
        let org = Organization {
            id: OrgId::new(),
            name,
            created_at: now,
        };
        let owner = Membership {
            org_id: org.id,
            user_id: principal.user_id.clone(),
            role: Role::Owner,
            created_at: now,
        };

        self.org_store.create_with_owner(&org, &owner).await?;

        info!(org_id = %org.id, name = %org.name, "Organization created");

        Ok(OrgSummary {
            id: org.id,
            name: org.name,
            role: Role::Owner,
        })
    }

    /// List every organization the principal belongs to, with their role.
    ///
    /// Order is unspecified.
    #[instrument(skip(self), fields(user_id = %principal.user_id))]
    pub async fn list_my_orgs(&self, principal: &Principal) -> Result<Vec<OrgSummary>> {
        let memberships = self
            .gate
            .membership_store()
            .list_for_user(&principal.user_id)
            .await?;

        Ok(self
            .summarize(memberships)
            .await?
            .into_iter()
            .map(|(summary, _)| summary)
            .collect())
    }

    /// Get the organization named by the request's org context.
    ///
    /// # Errors
    ///
    /// - Any gate error (context, membership).
    /// - `NotFound` if the membership points at an organization that no
    ///   longer exists.
    #[instrument(skip(self, headers), fields(user_id = %principal.user_id))]
    pub async fn current(&self, principal: &Principal, headers: &HeaderMap) -> Result<OrgSummary> {
        let (membership, org_id) = self.gate.authorize(principal, headers, RoleSet::ANY).await?;

        let org = self
            .org_store
            .find_by_id(&org_id)
            .await?
            .ok_or_else(|| TenancyError::not_found(format!("organization {org_id}")))?;

        Ok(OrgSummary {
            id: org.id,
            name: org.name,
            role: membership.role,
        })
    }

    /// The principal's organizations plus a default one to act in.
    ///
    /// The default is the earliest-joined organization; ties go to the
    /// lowest org id.
    #[instrument(skip(self), fields(user_id = %principal.user_id))]
    pub async fn profile(&self, principal: &Principal) -> Result<Profile> {
        let memberships = self
            .gate
            .membership_store()
            .list_for_user(&principal.user_id)
            .await?;

        let summaries = self.summarize(memberships).await?;
        let default_org_id = summaries
            .iter()
            .min_by_key(|(summary, joined_at)| (*joined_at, summary.id))
            .map(|(summary, _)| summary.id);

        Ok(Profile {
            user_id: principal.user_id.clone(),
            orgs: summaries.into_iter().map(|(summary, _)| summary).collect(),
            default_org_id,
        })
    }

    /// Join memberships with their organizations, skipping dangling ones.
    async fn summarize(&self, memberships: Vec<Membership>) -> Result<Vec<(OrgSummary, u64)>> {
        let mut summaries = Vec::with_capacity(memberships.len());
        for membership in memberships {
            match self.org_store.find_by_id(&membership.org_id).await? {
                Some(org) => summaries.push((
                    OrgSummary {
                        id: org.id,
                        name: org.name,
                        role: membership.role,
                    },
                    membership.created_at,
                )),
                None => debug!(org_id = %membership.org_id, "Skipping membership of missing organization"),
            }
        }
        Ok(summaries)
    }
}
