//! SeaORM-backed organization storage.
//!
//! Provides database persistence for organizations, memberships and
//! projects using SeaORM.
//!
//! # Example
//!
//! ```rust,ignore
//! use tideway_tenancy::organizations::{
//!     AuthorizationGate, OrgContextResolver, OrganizationConfig, OrganizationManager,
//!     SeaOrmOrgStore,
//! };
//!
//! let store = SeaOrmOrgStore::new(db.clone());
//! store.create_schema().await?;
//!
//! let gate = AuthorizationGate::new(store.clone(), OrgContextResolver::default());
//! let manager = OrganizationManager::new(store, gate, OrganizationConfig::default());
//! ```
//!
//! # Database Schema
//!
//! [`SeaOrmOrgStore::create_schema`] creates these tables from the entities.
//! The equivalent SQL is:
//!
//! ```sql
//! CREATE TABLE organizations (
//!     id VARCHAR(36) PRIMARY KEY,
//!     name VARCHAR(255) UNIQUE NOT NULL,
//!     created_at BIGINT NOT NULL
//! );
//!
//! CREATE TABLE organization_members (
//!     org_id VARCHAR(36) NOT NULL,
//!     user_id VARCHAR(255) NOT NULL,
//!     role VARCHAR(20) NOT NULL,
//!     created_at BIGINT NOT NULL,
//!     PRIMARY KEY (org_id, user_id)
//! );
//!
//! CREATE TABLE projects (
//!     id VARCHAR(36) PRIMARY KEY,
//!     org_id VARCHAR(36) NOT NULL,
//!     name VARCHAR(255) NOT NULL,
//!     created_at BIGINT NOT NULL
//! );
//! ```

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, ConnectionTrait, DatabaseConnection,
    DbErr, EntityTrait, QueryFilter, Schema, Set, SqlErr, TransactionTrait,
};
use uuid::Uuid;

use super::storage::{MembershipStore, OrganizationStore, ProjectStore};
use super::types::{Membership, OrgId, Organization, Project, Role, UserId};
use super::utils::current_timestamp;
use crate::error::{Result, TenancyError};

// =============================================================================
// SeaORM Entities
// =============================================================================

mod entity {
    use sea_orm::entity::prelude::*;

    // -------------------------------------------------------------------------
    // Organization Entity
    // -------------------------------------------------------------------------
    pub mod organization {
        use super::*;

        #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
        #[sea_orm(table_name = "organizations")]
        pub struct Model {
            #[sea_orm(primary_key, auto_increment = false)]
            pub id: String,
            #[sea_orm(unique)]
            pub name: String,
            pub created_at: i64,
        }

        #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
        pub enum Relation {}

        impl ActiveModelBehavior for ActiveModel {}
    }

    // -------------------------------------------------------------------------
    // Membership Entity
    // -------------------------------------------------------------------------
    pub mod membership {
        use super::*;

        #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
        #[sea_orm(table_name = "organization_members")]
        pub struct Model {
            #[sea_orm(primary_key, auto_increment = false)]
            pub org_id: String,
            #[sea_orm(primary_key, auto_increment = false)]
            pub user_id: String,
            pub role: String,
            pub created_at: i64,
        }

        #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
        pub enum Relation {}

        impl ActiveModelBehavior for ActiveModel {}
    }

    // -------------------------------------------------------------------------
    // Project Entity
    // -------------------------------------------------------------------------
    pub mod project {
        use super::*;

        #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
        #[sea_orm(table_name = "projects")]
        pub struct Model {
            #[sea_orm(primary_key, auto_increment = false)]
            pub id: String,
            pub org_id: String,
            pub name: String,
            pub created_at: i64,
        }

        #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
        pub enum Relation {}

        impl ActiveModelBehavior for ActiveModel {}
    }
}

use entity::{membership, organization, project};

// =============================================================================
// Helper Functions
// =============================================================================

/// Convert i64 to u64 safely (negative values become 0).
#[inline]
fn i64_to_u64(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

/// Convert u64 to i64 safely (values > i64::MAX become i64::MAX).
#[inline]
fn u64_to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

fn parse_org_id(raw: &str) -> Result<OrgId> {
    raw.parse()
        .map_err(|_| TenancyError::storage(format!("corrupt organization id: {raw:?}")))
}

fn model_to_organization(model: organization::Model) -> Result<Organization> {
    Ok(Organization {
        id: parse_org_id(&model.id)?,
        name: model.name,
        created_at: i64_to_u64(model.created_at),
    })
}

fn model_to_membership(model: membership::Model) -> Result<Membership> {
    let role = model.role.parse::<Role>().map_err(|_| {
        TenancyError::storage(format!("corrupt membership role: {:?}", model.role))
    })?;

    Ok(Membership {
        org_id: parse_org_id(&model.org_id)?,
        user_id: UserId::from(model.user_id),
        role,
        created_at: i64_to_u64(model.created_at),
    })
}

fn model_to_project(model: project::Model) -> Result<Project> {
    let id = Uuid::parse_str(&model.id)
        .map_err(|_| TenancyError::storage(format!("corrupt project id: {:?}", model.id)))?;

    Ok(Project {
        id,
        org_id: parse_org_id(&model.org_id)?,
        name: model.name,
        created_at: i64_to_u64(model.created_at),
    })
}

fn membership_active_model(membership: &Membership) -> membership::ActiveModel {
    membership::ActiveModel {
        org_id: Set(membership.org_id.to_string()),
        user_id: Set(membership.user_id.as_str().to_string()),
        role: Set(membership.role.as_str().to_string()),
        created_at: Set(u64_to_i64(membership.created_at)),
    }
}

// =============================================================================
// SeaOrmOrgStore
// =============================================================================

/// SeaORM-backed store implementing the organization, membership and project
/// traits.
///
/// Membership uniqueness is enforced by the composite primary key on
/// `(org_id, user_id)`; organization names by a unique index.
#[derive(Clone, Debug)]
pub struct SeaOrmOrgStore {
    db: DatabaseConnection,
}

impl SeaOrmOrgStore {
    /// Create a new SeaORM organization store.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Get a reference to the underlying database connection.
    #[must_use]
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Create the tables if they do not exist yet.
    pub async fn create_schema(&self) -> Result<()> {
        let backend = self.db.get_database_backend();
        let schema = Schema::new(backend);

        let mut statements = [
            schema.create_table_from_entity(organization::Entity),
            schema.create_table_from_entity(membership::Entity),
            schema.create_table_from_entity(project::Entity),
        ];
        for stmt in &mut statements {
            stmt.if_not_exists();
            self.db.execute(backend.build(&*stmt)).await?;
        }

        tracing::debug!("organization schema ready");
        Ok(())
    }
}

// =============================================================================
// OrganizationStore Implementation
// =============================================================================

#[async_trait]
impl OrganizationStore for SeaOrmOrgStore {
    async fn create_with_owner(&self, org: &Organization, owner: &Membership) -> Result<()> {
        tracing::debug!(
            org_id = %org.id,
            user_id = %owner.user_id,
            "creating organization and owner atomically"
        );

        let txn = self.db.begin().await?;

        let org_model = organization::ActiveModel {
            id: Set(org.id.to_string()),
            name: Set(org.name.clone()),
            created_at: Set(u64_to_i64(org.created_at)),
        };

        // Dropping the transaction without commit rolls it back
        if let Err(err) = organization::Entity::insert(org_model)
            .exec_without_returning(&txn)
            .await
        {
            if is_unique_violation(&err) {
                return Err(TenancyError::duplicate_org_name(&org.name));
            }
            return Err(err.into());
        }

        if let Err(err) = membership::Entity::insert(membership_active_model(owner))
            .exec_without_returning(&txn)
            .await
        {
            if is_unique_violation(&err) {
                return Err(TenancyError::DuplicateMembership);
            }
            return Err(err.into());
        }

        txn.commit().await?;
        Ok(())
    }

    async fn find_by_id(&self, id: &OrgId) -> Result<Option<Organization>> {
        tracing::debug!(org_id = %id, "finding organization by id");

        organization::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?
            .map(model_to_organization)
            .transpose()
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Organization>> {
        organization::Entity::find()
            .filter(organization::Column::Name.eq(name))
            .one(&self.db)
            .await?
            .map(model_to_organization)
            .transpose()
    }
}

// =============================================================================
// MembershipStore Implementation
// =============================================================================

#[async_trait]
impl MembershipStore for SeaOrmOrgStore {
    async fn find(&self, user_id: &UserId, org_id: &OrgId) -> Result<Option<Membership>> {
        membership::Entity::find_by_id((org_id.to_string(), user_id.as_str().to_string()))
            .one(&self.db)
            .await?
            .map(model_to_membership)
            .transpose()
    }

    async fn create(&self, user_id: &UserId, org_id: &OrgId, role: Role) -> Result<Membership> {
        let membership = Membership {
            org_id: *org_id,
            user_id: user_id.clone(),
            role,
            created_at: current_timestamp(),
        };

        membership::Entity::insert(membership_active_model(&membership))
            .exec_without_returning(&self.db)
            .await
            .map_err(|err| {
                if is_unique_violation(&err) {
                    TenancyError::DuplicateMembership
                } else {
                    err.into()
                }
            })?;

        Ok(membership)
    }

    async fn upsert(
        &self,
        user_id: &UserId,
        org_id: &OrgId,
        role: Role,
    ) -> Result<(Membership, bool)> {
        let membership = Membership {
            org_id: *org_id,
            user_id: user_id.clone(),
            role,
            created_at: current_timestamp(),
        };

        // Insert first; losing a race to another insert turns into an update
        match membership::Entity::insert(membership_active_model(&membership))
            .exec_without_returning(&self.db)
            .await
        {
            Ok(_) => return Ok((membership, true)),
            Err(err) if is_unique_violation(&err) => {
                tracing::debug!(%org_id, %user_id, "membership exists, updating role");
            }
            Err(err) => return Err(err.into()),
        }

        let update = membership::ActiveModel {
            org_id: Set(org_id.to_string()),
            user_id: Set(user_id.as_str().to_string()),
            role: Set(role.as_str().to_string()),
            created_at: NotSet,
        };
        update.update(&self.db).await?;

        let updated = self
            .find(user_id, org_id)
            .await?
            .ok_or_else(|| TenancyError::storage("membership vanished during upsert"))?;
        Ok((updated, false))
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Membership>> {
        membership::Entity::find()
            .filter(membership::Column::UserId.eq(user_id.as_str()))
            .all(&self.db)
            .await?
            .into_iter()
            .map(model_to_membership)
            .collect()
    }

    async fn list_for_org(&self, org_id: &OrgId) -> Result<Vec<Membership>> {
        membership::Entity::find()
            .filter(membership::Column::OrgId.eq(org_id.to_string()))
            .all(&self.db)
            .await?
            .into_iter()
            .map(model_to_membership)
            .collect()
    }
}

// =============================================================================
// ProjectStore Implementation
// =============================================================================

#[async_trait]
impl ProjectStore for SeaOrmOrgStore {
    async fn create(&self, project: &Project) -> Result<()> {
        tracing::debug!(project_id = %project.id, org_id = %project.org_id, "creating project");

        let model = project::ActiveModel {
            id: Set(project.id.to_string()),
            org_id: Set(project.org_id.to_string()),
            name: Set(project.name.clone()),
            created_at: Set(u64_to_i64(project.created_at)),
        };

        project::Entity::insert(model)
            .exec_without_returning(&self.db)
            .await?;
        Ok(())
    }

    async fn list_for_org(&self, org_id: &OrgId) -> Result<Vec<Project>> {
        project::Entity::find()
            .filter(project::Column::OrgId.eq(org_id.to_string()))
            .all(&self.db)
            .await?
            .into_iter()
            .map(model_to_project)
            .collect()
    }
}

// =============================================================================
// Tests
// =============================================================================
