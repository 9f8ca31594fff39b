//! Role policy.
//!
//! There is no hierarchy: an owner passes a check only if the caller listed
//! `Role::Owner` in the allowed set.

use super::types::{Role, RoleSet};

/// Decide whether `role` satisfies `allowed`.
///
/// # Example
///
/// ```rust
/// use tideway_tenancy::organizations::{is_allowed, Role, RoleSet};
///
/// assert!(is_allowed(Role::Owner, RoleSet::ELEVATED));
/// assert!(!is_allowed(Role::Owner, RoleSet::of(&[Role::Admin])));
/// ```
#[inline]
#[must_use]
pub fn is_allowed(role: Role, allowed: RoleSet) -> bool {
    allowed.contains(role)
}
