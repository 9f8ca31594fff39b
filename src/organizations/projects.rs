//! Org-scoped project access.
//!
//! Reads need any membership; writes need owner or admin. The owning org of
//! a new project always comes from the gate.

use axum::http::HeaderMap;
use tracing::{info, instrument};
use uuid::Uuid;

use super::config::OrganizationConfig;
use super::gate::AuthorizationGate;
use super::storage::{MembershipStore, ProjectStore};
use super::types::{Principal, Project, ProjectSummary, RoleSet};
use super::utils::{current_timestamp, normalize_name};
use crate::error::Result;

/// Project manager.
#[derive(Clone)]
pub struct ProjectManager<P, M>
where
    P: ProjectStore,
    M: MembershipStore,
{
    project_store: P,
    gate: AuthorizationGate<M>,
    config: OrganizationConfig,
}

impl<P, M> ProjectManager<P, M>
where
    P: ProjectStore,
    M: MembershipStore,
{
    #[must_use]
    pub fn new(project_store: P, gate: AuthorizationGate<M>, config: OrganizationConfig) -> Self {
        Self {
            project_store,
            gate,
            config,
        }
    }

    /// List the projects of the org in context.
    #[instrument(skip(self, headers), fields(user_id = %principal.user_id))]
    pub async fn list(&self, principal: &Principal, headers: &HeaderMap) -> Result<Vec<ProjectSummary>> {
        let (_, org_id) = self.gate.authorize(principal, headers, RoleSet::ANY).await?;

        let projects = self.project_store.list_for_org(&org_id).await?;
        Ok(projects.into_iter().map(ProjectSummary::from).collect())
    }

    /// Create a project in the org in context.
    #[instrument(skip(self, headers), fields(user_id = %principal.user_id))]
    pub async fn create(
        &self,
        principal: &Principal,
        headers: &HeaderMap,
        name: &str,
    ) -> Result<ProjectSummary> {
        let (_, org_id) = self
            .gate
            .authorize(principal, headers, RoleSet::ELEVATED)
            .await?;

        let name = normalize_name("name", name, self.config.max_project_name_len)?;
        let project = Project {
            id: Uuid::new_v4(),
            org_id,
            name,
            created_at: current_timestamp(),
        };

        self.project_store.create(&project).await?;

        info!(%org_id, project_id = %project.id, "Project created");
        Ok(project.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TenancyError;
    use crate::organizations::context::OrgContextResolver;
    use crate::organizations::memory::InMemoryOrgStore;
    use crate::organizations::types::{OrgId, Role, UserId};
    use axum::http::HeaderValue;

    fn headers_for(org_id: &OrgId) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-org-id",
            HeaderValue::from_str(&org_id.to_string()).unwrap(),
        );
        headers
    }

    async fn setup() -> (ProjectManager<InMemoryOrgStore, InMemoryOrgStore>, InMemoryOrgStore, OrgId) {
        let store = InMemoryOrgStore::new();
        let org_id = OrgId::new();
        store.upsert(&UserId::from("alice"), &org_id, Role::Admin).await.unwrap();
        store.upsert(&UserId::from("mia"), &org_id, Role::Member).await.unwrap();

        let gate = AuthorizationGate::new(store.clone(), OrgContextResolver::default());
        (
            ProjectManager::new(store.clone(), gate, OrganizationConfig::default()),
            store,
            org_id,
        )
    }

    #[tokio::test]
    async fn test_admin_creates_member_lists() {
        let (manager, _, org_id) = setup().await;
        let headers = headers_for(&org_id);

        let created = manager
            .create(&Principal::new("alice"), &headers, " Website ")
            .await
            .unwrap();
        assert_eq!(created.name, "Website");

        let listed = manager.list(&Principal::new("mia"), &headers).await.unwrap();
        assert_eq!(listed, vec![created]);
    }

    #[tokio::test]
    async fn test_member_cannot_create() {
        let (manager, store, org_id) = setup().await;
        let err = manager
            .create(&Principal::new("mia"), &headers_for(&org_id), "Website")
            .await
            .unwrap_err();
        assert!(matches!(err, TenancyError::InsufficientRole { .. }));
        assert!(ProjectStore::list_for_org(&store, &org_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_projects_isolated_between_orgs() {
        let (manager, store, org_id) = setup().await;
        let other = OrgId::new();
        store.upsert(&UserId::from("alice"), &other, Role::Owner).await.unwrap();

        manager
            .create(&Principal::new("alice"), &headers_for(&org_id), "Website")
            .await
            .unwrap();

        assert!(manager
            .list(&Principal::new("alice"), &headers_for(&other))
            .await
            .unwrap()
            .is_empty());

        let err = manager
            .list(&Principal::new("mia"), &headers_for(&other))
            .await
            .unwrap_err();
        assert!(matches!(err, TenancyError::NotAMember));
    }

    #[tokio::test]
    async fn test_blank_name_rejected() {
        let (manager, _, org_id) = setup().await;
        let err = manager
            .create(&Principal::new("alice"), &headers_for(&org_id), "  ")
            .await
            .unwrap_err();
        assert!(matches!(err, TenancyError::Validation(_)));
    }
}
