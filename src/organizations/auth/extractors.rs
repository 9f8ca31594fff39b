//! Axum extractors for the authenticated principal.

use crate::error::TenancyError;
use crate::organizations::types::Principal;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use std::future::{Future, ready};

/// Extract the principal set by the auth middleware.
///
/// Rejects with `Unauthenticated` when no principal is present.
///
/// # Example
///
/// ```rust,ignore
/// use tideway_tenancy::organizations::{OrgSummary, Principal};
///
/// async fn my_orgs(
///     State(state): State<AppState>,
///     principal: Principal,
/// ) -> Result<Json<Vec<OrgSummary>>> {
///     Ok(Json(state.orgs.list_my_orgs(&principal).await?))
/// }
/// ```
impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = TenancyError;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        ready(
            parts
                .extensions
                .get::<Principal>()
                .cloned()
                .ok_or(TenancyError::Unauthenticated),
        )
    }
}
