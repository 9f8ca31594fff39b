//! Organization types.
//!
//! Roles are a closed enum with no ordering between them. Access checks
//! always name the full set of acceptable roles through [`RoleSet`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Role a user holds within an organization.
///
/// # Example
///
/// ```rust
/// use tideway_tenancy::organizations::Role;
///
/// let role: Role = "admin".parse().unwrap();
/// assert_eq!(role, Role::Admin);
/// assert_eq!(role.to_string(), "admin");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Creator of the organization.
    Owner,
    /// Manages members and org-scoped resources.
    Admin,
    /// Regular member.
    Member,
}

impl Role {
    /// Every role, in declaration order.
    pub const ALL: [Role; 3] = [Role::Owner, Role::Admin, Role::Member];

    /// Get the string representation of the role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Admin => "admin",
            Self::Member => "member",
        }
    }

    const fn bit(self) -> u8 {
        match self {
            Self::Owner => 0b001,
            Self::Admin => 0b010,
            Self::Member => 0b100,
        }
    }
}

/// Error returned when parsing a role string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRoleError {
    invalid_value: String,
}

impl fmt::Display for ParseRoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid role: '{}' (expected: owner, admin, or member)",
            self.invalid_value
        )
    }
}

impl std::error::Error for ParseRoleError {}

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "owner" => Ok(Self::Owner),
            "admin" => Ok(Self::Admin),
            "member" => Ok(Self::Member),
            _ => Err(ParseRoleError {
                invalid_value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An explicit set of roles accepted by an access check.
///
/// # Example
///
/// ```rust
/// use tideway_tenancy::organizations::{Role, RoleSet};
///
/// assert!(RoleSet::ELEVATED.contains(Role::Admin));
/// assert!(!RoleSet::ELEVATED.contains(Role::Member));
/// assert!(RoleSet::ANY.contains(Role::Member));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RoleSet(u8);

impl RoleSet {
    /// No roles.
    pub const EMPTY: Self = Self(0);

    /// Every role: membership alone suffices.
    pub const ANY: Self = Self::of(&Role::ALL);

    /// Owners and admins.
    pub const ELEVATED: Self = Self::of(&[Role::Owner, Role::Admin]);

    /// Build a set from a list of roles.
    #[must_use]
    pub const fn of(roles: &[Role]) -> Self {
        let mut bits = 0;
        let mut i = 0;
        while i < roles.len() {
            bits |= roles[i].bit();
            i += 1;
        }
        Self(bits)
    }

    /// Whether the role is in the set.
    #[must_use]
    pub const fn contains(self, role: Role) -> bool {
        self.0 & role.bit() != 0
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Return a copy of the set with `role` added.
    #[must_use]
    pub const fn with(self, role: Role) -> Self {
        Self(self.0 | role.bit())
    }

    /// Iterate the roles in the set, in declaration order.
    pub fn iter(self) -> impl Iterator<Item = Role> {
        Role::ALL.into_iter().filter(move |role| self.contains(*role))
    }
}

impl FromIterator<Role> for RoleSet {
    fn from_iter<I: IntoIterator<Item = Role>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, Self::with)
    }
}

impl fmt::Debug for RoleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl fmt::Display for RoleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(|r| r.as_str()).collect();
        f.write_str(&names.join(", "))
    }
}

/// Organization identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrgId(Uuid);

impl OrgId {
    /// Generate a fresh random ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for OrgId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for OrgId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl FromStr for OrgId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl fmt::Display for OrgId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Opaque user identifier issued by the identity provider.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An authenticated identity making a request.
///
/// Produced by the authenticator and passed explicitly to every operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Principal {
    /// Stable user identity.
    pub user_id: UserId,
}

impl Principal {
    #[must_use]
    pub fn new(user_id: impl Into<UserId>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

/// An organization (tenant).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    /// Unique identifier.
    pub id: OrgId,
    /// Unique display name.
    pub name: String,
    /// Creation timestamp (Unix seconds).
    pub created_at: u64,
}

/// A user's role in one organization.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    /// Organization ID.
    pub org_id: OrgId,
    /// User ID.
    pub user_id: UserId,
    /// Role in the organization.
    pub role: Role,
    /// Creation timestamp (Unix seconds).
    pub created_at: u64,
}

/// A project owned by an organization.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Unique identifier.
    pub id: Uuid,
    /// Owning organization, fixed at creation.
    pub org_id: OrgId,
    /// Project name.
    pub name: String,
    /// Creation timestamp (Unix seconds).
    pub created_at: u64,
}

/// An organization as seen by one of its members.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgSummary {
    pub id: OrgId,
    pub name: String,
    pub role: Role,
}

/// Project fields exposed to clients.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub id: Uuid,
    pub name: String,
}

impl From<Project> for ProjectSummary {
    fn from(project: Project) -> Self {
        Self {
            id: project.id,
            name: project.name,
        }
    }
}

/// The caller's memberships plus a default organization to act in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: UserId,
    pub orgs: Vec<OrgSummary>,
    /// Earliest-joined organization, if any.
    pub default_org_id: Option<OrgId>,
}

/// Result of inviting a user to an organization.
///
/// Every variant is a success: an unknown email is reported as pending
/// rather than rejected.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InviteOutcome {
    /// A new membership was created.
    Added { role: Role },
    /// The user was already a member; their role is now `role`.
    AlreadyMember { role: Role },
    /// No user with this email exists yet.
    PendingExternalInvite,
}

/// Body of a create-organization request.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CreateOrgRequest {
    #[serde(default)]
    pub name: String,
}

/// Body of an invite request.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct InviteRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default = "default_invite_role")]
    pub role: String,
}

fn default_invite_role() -> String {
    Role::Member.as_str().to_string()
}

/// Body of a create-project request.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CreateProjectRequest {
    #[serde(default)]
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing() {
        assert_eq!("owner".parse::<Role>().unwrap(), Role::Owner);
        assert_eq!("ADMIN".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(" member ".parse::<Role>().unwrap(), Role::Member);
        assert!("".parse::<Role>().is_err());
        assert!("superadmin".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_serialization() {
        let json = serde_json::to_string(&Role::Owner).unwrap();
        assert_eq!(json, "\"owner\"");

        let parsed: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(parsed, Role::Admin);
    }

    #[test]
    fn test_role_set_constants() {
        assert!(RoleSet::EMPTY.is_empty());
        assert_eq!(RoleSet::ANY.iter().collect::<Vec<_>>(), Role::ALL.to_vec());
        assert_eq!(
            RoleSet::ELEVATED.iter().collect::<Vec<_>>(),
            vec![Role::Owner, Role::Admin]
        );
    }

    #[test]
    fn test_role_set_from_iter() {
        let set: RoleSet = [Role::Member, Role::Owner].into_iter().collect();
        assert!(set.contains(Role::Owner));
        assert!(set.contains(Role::Member));
        assert!(!set.contains(Role::Admin));
        assert_eq!(set.to_string(), "owner, member");
        assert_eq!(format!("{set:?}"), "{Owner, Member}");
    }

    #[test]
    fn test_org_id_parsing() {
        let id = OrgId::new();
        assert_eq!(id.to_string().parse::<OrgId>().unwrap(), id);
        assert!("not-a-uuid".parse::<OrgId>().is_err());
    }

    #[test]
    fn test_invite_outcome_serialization() {
        let json = serde_json::to_value(InviteOutcome::Added { role: Role::Admin }).unwrap();
        assert_eq!(json, serde_json::json!({"status": "added", "role": "admin"}));

        let json = serde_json::to_value(InviteOutcome::PendingExternalInvite).unwrap();
        assert_eq!(json, serde_json::json!({"status": "pending_external_invite"}));
    }

    #[test]
    fn test_invite_request_defaults_to_member() {
        let req: InviteRequest = serde_json::from_str(r#"{"email": "a@b.com"}"#).unwrap();
        assert_eq!(req.role, "member");
    }
}
