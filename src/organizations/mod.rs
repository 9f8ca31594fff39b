//! Multi-tenant organization authorization.
//!
//! Every org-scoped operation goes through the same gate:
//! - **Org context** - the organization is named by one request header
//! - **Membership** - the caller must hold a membership in that org
//! - **Role policy** - the membership's role must be in an explicit allow-set
//!
//! Roles have no hierarchy. A check that should admit owners lists
//! `Role::Owner` explicitly, usually through [`RoleSet::ELEVATED`].
//!
//! # Example
//!
//! ```rust,ignore
//! use tideway_tenancy::organizations::{
//!     AuthorizationGate, InMemoryOrgStore, InMemoryUserDirectory, InvitationManager,
//!     OrgContextResolver, OrganizationConfig, OrganizationManager, ProjectManager,
//! };
//!
//! let config = OrganizationConfig::default();
//! let store = InMemoryOrgStore::new();
//! let gate = AuthorizationGate::new(store.clone(), OrgContextResolver::from_config(&config)?);
//!
//! let orgs = OrganizationManager::new(store.clone(), gate.clone(), config.clone());
//! let invites = InvitationManager::new(InMemoryUserDirectory::new(), gate.clone());
//! let projects = ProjectManager::new(store, gate, config);
//! ```

mod config;
mod context;
mod gate;
mod invitation_manager;
mod manager;
mod memory;
mod policy;
mod projects;
pub mod storage;
mod types;
mod utils;

pub mod auth;

#[cfg(feature = "database")]
mod sea_orm_store;

// Configuration exports
pub use config::{DEFAULT_ORG_HEADER, OrganizationConfig};

// Authorization exports
pub use context::OrgContextResolver;
pub use gate::AuthorizationGate;
pub use policy::is_allowed;

// Manager exports
pub use invitation_manager::InvitationManager;
pub use manager::OrganizationManager;
pub use projects::ProjectManager;

// Storage exports
pub use memory::{InMemoryOrgStore, InMemoryUserDirectory};
pub use storage::{MembershipStore, OrganizationStore, ProjectStore, UserDirectory};

#[cfg(feature = "database")]
pub use sea_orm_store::SeaOrmOrgStore;

// Type exports
pub use types::{
    CreateOrgRequest, CreateProjectRequest, InviteOutcome, InviteRequest, Membership, OrgId,
    OrgSummary, Organization, ParseRoleError, Principal, Profile, Project, ProjectSummary, Role,
    RoleSet, UserId,
};
