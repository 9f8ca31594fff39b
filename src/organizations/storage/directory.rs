//! User directory trait.

use crate::error::Result;
use crate::organizations::types::UserId;
use async_trait::async_trait;

/// Read-only view of the identity provider's users.
///
/// Users are owned elsewhere; this crate only resolves an email to an ID.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Find the user registered under `email`.
    ///
    /// `email` arrives trimmed and lowercased.
    async fn find_by_email(&self, email: &str) -> Result<Option<UserId>>;
}
