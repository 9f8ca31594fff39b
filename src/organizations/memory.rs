//! In-memory store implementations.
//!
//! All organization, membership and project state lives behind one lock so
//! that every uniqueness check happens under the same write guard as the
//! insert it protects.

use super::storage::{MembershipStore, OrganizationStore, ProjectStore, UserDirectory};
use super::types::{Membership, OrgId, Organization, Project, Role, UserId};
use super::utils::current_timestamp;
use crate::error::{Result, TenancyError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

#[derive(Default)]
struct State {
    orgs: HashMap<OrgId, Organization>,
    orgs_by_name: HashMap<String, OrgId>,
    memberships: HashMap<(OrgId, UserId), Membership>,
    projects: HashMap<Uuid, Project>,
}

/// In-memory store implementing the organization, membership and project traits.
///
/// Cloning shares the same underlying data (uses Arc internally).
#[derive(Clone, Default)]
pub struct InMemoryOrgStore {
    state: Arc<RwLock<State>>,
}

impl InMemoryOrgStore {
    /// Create a new in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, State>> {
        self.state
            .read()
            .map_err(|_| TenancyError::storage("organization store lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, State>> {
        self.state
            .write()
            .map_err(|_| TenancyError::storage("organization store lock poisoned"))
    }
}

#[async_trait]
impl OrganizationStore for InMemoryOrgStore {
    async fn create_with_owner(&self, org: &Organization, owner: &Membership) -> Result<()> {
        let mut state = self.write()?;

        if state.orgs_by_name.contains_key(&org.name) {
            return Err(TenancyError::duplicate_org_name(&org.name));
        }
        if state.orgs.contains_key(&org.id) {
            return Err(TenancyError::storage(format!(
                "organization id collision: {}",
                org.id
            )));
        }

        let key = (owner.org_id, owner.user_id.clone());
        if state.memberships.contains_key(&key) {
            return Err(TenancyError::DuplicateMembership);
        }

        state.orgs_by_name.insert(org.name.clone(), org.id);
        state.orgs.insert(org.id, org.clone());
        state.memberships.insert(key, owner.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &OrgId) -> Result<Option<Organization>> {
        Ok(self.read()?.orgs.get(id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Organization>> {
        let state = self.read()?;
        Ok(state
            .orgs_by_name
            .get(name)
            .and_then(|id| state.orgs.get(id))
            .cloned())
    }
}

#[async_trait]
impl MembershipStore for InMemoryOrgStore {
    async fn find(&self, user_id: &UserId, org_id: &OrgId) -> Result<Option<Membership>> {
        Ok(self
            .read()?
            .memberships
            .get(&(*org_id, user_id.clone()))
            .cloned())
    }

    async fn create(&self, user_id: &UserId, org_id: &OrgId, role: Role) -> Result<Membership> {
        let mut state = self.write()?;
        let key = (*org_id, user_id.clone());
        if state.memberships.contains_key(&key) {
            return Err(TenancyError::DuplicateMembership);
        }

        let membership = Membership {
            org_id: *org_id,
            user_id: user_id.clone(),
            role,
            created_at: current_timestamp(),
        };
        state.memberships.insert(key, membership.clone());
        Ok(membership)
    }

    async fn upsert(
        &self,
        user_id: &UserId,
        org_id: &OrgId,
        role: Role,
    ) -> Result<(Membership, bool)> {
        let mut state = self.write()?;
        let key = (*org_id, user_id.clone());

        if let Some(existing) = state.memberships.get_mut(&key) {
            existing.role = role;
            return Ok((existing.clone(), false));
        }

        let membership = Membership {
            org_id: *org_id,
            user_id: user_id.clone(),
            role,
            created_at: current_timestamp(),
        };
        state.memberships.insert(key, membership.clone());
        Ok((membership, true))
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Membership>> {
        Ok(self
            .read()?
            .memberships
            .values()
            .filter(|m| &m.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list_for_org(&self, org_id: &OrgId) -> Result<Vec<Membership>> {
        Ok(self
            .read()?
            .memberships
            .values()
            .filter(|m| &m.org_id == org_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ProjectStore for InMemoryOrgStore {
    async fn create(&self, project: &Project) -> Result<()> {
        let mut state = self.write()?;
        if state.projects.contains_key(&project.id) {
            return Err(TenancyError::storage(format!(
                "project id collision: {}",
                project.id
            )));
        }
        state.projects.insert(project.id, project.clone());
        Ok(())
    }

    async fn list_for_org(&self, org_id: &OrgId) -> Result<Vec<Project>> {
        Ok(self
            .read()?
            .projects
            .values()
            .filter(|p| &p.org_id == org_id)
            .cloned()
            .collect())
    }
}

/// In-memory user directory keyed by lowercased email.
#[derive(Clone, Default)]
pub struct InMemoryUserDirectory {
    users: Arc<RwLock<HashMap<String, UserId>>>,
}

impl InMemoryUserDirectory {
    /// Create an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user under `email`.
    pub fn add_user(&self, email: &str, user_id: impl Into<UserId>) -> Result<UserId> {
        let user_id = user_id.into();
        self.users
            .write()
            .map_err(|_| TenancyError::storage("user directory lock poisoned"))?
            .insert(email.trim().to_lowercase(), user_id.clone());
        Ok(user_id)
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserId>> {
        Ok(self
            .users
            .read()
            .map_err(|_| TenancyError::storage("user directory lock poisoned"))?
            .get(email)
            .cloned())
    }
}
