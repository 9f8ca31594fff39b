//! Project storage trait.

use crate::error::Result;
use crate::organizations::types::{OrgId, Project};
use async_trait::async_trait;

/// Storage for org-scoped projects.
///
/// The store trusts the `org_id` on the project; callers set it from the
/// authorization gate, never from client input.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Persist a new project.
    async fn create(&self, project: &Project) -> Result<()>;

    /// List the projects of one organization.
    async fn list_for_org(&self, org_id: &OrgId) -> Result<Vec<Project>>;
}
