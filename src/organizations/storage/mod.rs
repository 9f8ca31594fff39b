//! Storage traits for organizations.
//!
//! Implement these traits for your database layer, or use
//! [`InMemoryOrgStore`](super::InMemoryOrgStore).

mod directory;
mod membership;
mod organization;
mod project;

pub use directory::UserDirectory;
pub use membership::MembershipStore;
pub use organization::OrganizationStore;
pub use project::ProjectStore;
