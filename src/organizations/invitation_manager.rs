//! Invitation manager.
//!
//! Adds a user to an organization, or changes their role if they are
//! already a member. Repeating an invite is safe.

use axum::http::HeaderMap;
use tracing::{debug, info, instrument};

use super::gate::AuthorizationGate;
use super::storage::{MembershipStore, UserDirectory};
use super::types::{InviteOutcome, Principal, Role, RoleSet};
use super::utils::normalize_email;
use crate::error::Result;

/// Invitation manager.
///
/// # Example
///
/// ```rust,ignore
/// use tideway_tenancy::organizations::{InvitationManager, InviteOutcome};
///
/// let manager = InvitationManager::new(directory, gate);
///
/// match manager.invite(&actor, &headers, "bob@example.com", "admin").await? {
///     InviteOutcome::Added { role } => println!("added as {role}"),
///     InviteOutcome::AlreadyMember { role } => println!("now {role}"),
///     InviteOutcome::PendingExternalInvite => println!("no such user yet"),
/// }
/// ```
#[derive(Clone)]
pub struct InvitationManager<D, M>
where
    D: UserDirectory,
    M: MembershipStore,
{
    directory: D,
    gate: AuthorizationGate<M>,
}

impl<D, M> InvitationManager<D, M>
where
    D: UserDirectory,
    M: MembershipStore,
{
    /// Create a new invitation manager.
    #[must_use]
    pub fn new(directory: D, gate: AuthorizationGate<M>) -> Self {
        Self { directory, gate }
    }

    /// Get a reference to the user directory.
    pub fn directory(&self) -> &D {
        &self.directory
    }

    /// Invite `email` into the org named by `headers` with `role`.
    ///
    /// Only owners and admins may invite. Re-inviting an existing member
    /// applies the requested role, including demotions.
    ///
    /// # Errors
    ///
    /// - Any gate error; context errors come before the role check.
    /// - `InvalidRole` if `role` is not one of owner, admin, member.
    /// - `Validation` if the email is blank or malformed.
    #[instrument(skip(self, headers, email), fields(actor = %actor.user_id))]
    pub async fn invite(
        &self,
        actor: &Principal,
        headers: &HeaderMap,
        email: &str,
        role: &str,
    ) -> Result<InviteOutcome> {
        let (_, org_id) = self.gate.authorize(actor, headers, RoleSet::ELEVATED).await?;

        let role: Role = role.parse()?;
        let email = normalize_email(email)?;

        let Some(user_id) = self.directory.find_by_email(&email).await? else {
            debug!(%org_id, "Invitee has no account yet");
            return Ok(InviteOutcome::PendingExternalInvite);
        };

        let (membership, was_created) = self
            .gate
            .membership_store()
            .upsert(&user_id, &org_id, role)
            .await?;

        if was_created {
            info!(%org_id, %user_id, %role, "Member added");
            Ok(InviteOutcome::Added { role })
        } else {
            info!(%org_id, %user_id, role = %membership.role, "Member role updated");
            Ok(InviteOutcome::AlreadyMember {
                role: membership.role,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TenancyError;
    use crate::organizations::context::OrgContextResolver;
    use crate::organizations::memory::{InMemoryOrgStore, InMemoryUserDirectory};
    use crate::organizations::types::{OrgId, UserId};
    use axum::http::HeaderValue;

    struct Fixture {
        manager: InvitationManager<InMemoryUserDirectory, InMemoryOrgStore>,
        store: InMemoryOrgStore,
        org_id: OrgId,
        headers: HeaderMap,
    }

    async fn fixture() -> Fixture {
        let store = InMemoryOrgStore::new();
        let directory = InMemoryUserDirectory::new();
        directory.add_user("bob@example.com", "bob").unwrap();

        let org_id = OrgId::new();
        store.upsert(&UserId::from("alice"), &org_id, Role::Owner).await.unwrap();
        store.upsert(&UserId::from("mia"), &org_id, Role::Member).await.unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(
            "x-org-id",
            HeaderValue::from_str(&org_id.to_string()).unwrap(),
        );

        let gate = AuthorizationGate::new(store.clone(), OrgContextResolver::default());
        Fixture {
            manager: InvitationManager::new(directory, gate),
            store,
            org_id,
            headers,
        }
    }

    #[tokio::test]
    async fn test_invite_new_member() {
        let f = fixture().await;
        let outcome = f
            .manager
            .invite(&Principal::new("alice"), &f.headers, "bob@example.com", "admin")
            .await
            .unwrap();
        assert_eq!(outcome, InviteOutcome::Added { role: Role::Admin });

        let membership = f.store.find(&UserId::from("bob"), &f.org_id).await.unwrap().unwrap();
        assert_eq!(membership.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_reinvite_updates_role() {
        let f = fixture().await;
        let alice = Principal::new("alice");

        f.manager.invite(&alice, &f.headers, "bob@example.com", "admin").await.unwrap();
        let outcome = f
            .manager
            .invite(&alice, &f.headers, "bob@example.com", "member")
            .await
            .unwrap();
        assert_eq!(outcome, InviteOutcome::AlreadyMember { role: Role::Member });

        let outcome = f
            .manager
            .invite(&alice, &f.headers, "bob@example.com", "member")
            .await
            .unwrap();
        assert_eq!(outcome, InviteOutcome::AlreadyMember { role: Role::Member });
        assert_eq!(MembershipStore::list_for_org(&f.store, &f.org_id).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_unknown_email_is_pending() {
        let f = fixture().await;
        let outcome = f
            .manager
            .invite(&Principal::new("alice"), &f.headers, " X@X.com ", "member")
            .await
            .unwrap();
        assert_eq!(outcome, InviteOutcome::PendingExternalInvite);
        assert_eq!(MembershipStore::list_for_org(&f.store, &f.org_id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_email_normalized_before_lookup() {
        let f = fixture().await;
        let outcome = f
            .manager
            .invite(&Principal::new("alice"), &f.headers, "  BOB@Example.com", "member")
            .await
            .unwrap();
        assert_eq!(outcome, InviteOutcome::Added { role: Role::Member });
    }

    #[tokio::test]
    async fn test_member_cannot_invite() {
        let f = fixture().await;
        let err = f
            .manager
            .invite(&Principal::new("mia"), &f.headers, "bob@example.com", "member")
            .await
            .unwrap_err();
        assert!(matches!(err, TenancyError::InsufficientRole { .. }));
        assert!(f.store.find(&UserId::from("bob"), &f.org_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_context_before_role_check() {
        let f = fixture().await;
        let err = f
            .manager
            .invite(&Principal::new("mia"), &HeaderMap::new(), "bob@example.com", "member")
            .await
            .unwrap_err();
        assert!(matches!(err, TenancyError::MissingOrgContext { .. }));
    }

    #[tokio::test]
    async fn test_invalid_role_and_email() {
        let f = fixture().await;
        let alice = Principal::new("alice");

        let err = f
            .manager
            .invite(&alice, &f.headers, "bob@example.com", "superuser")
            .await
            .unwrap_err();
        assert!(matches!(err, TenancyError::InvalidRole(_)));

        let err = f.manager.invite(&alice, &f.headers, "", "member").await.unwrap_err();
        assert!(matches!(err, TenancyError::Validation(_)));

        assert!(f.store.find(&UserId::from("bob"), &f.org_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_self_demotion_allowed() {
        let f = fixture().await;
        f.manager
            .directory()
            .add_user("alice@example.com", "alice")
            .unwrap();

        let outcome = f
            .manager
            .invite(&Principal::new("alice"), &f.headers, "alice@example.com", "member")
            .await
            .unwrap();
        assert_eq!(outcome, InviteOutcome::AlreadyMember { role: Role::Member });
    }
}
