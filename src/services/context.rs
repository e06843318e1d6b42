use crate::backend::{Backend, BackendError};
use crate::middleware::AuthUser;
use crate::models::UserContext;

/// Role and role-scoped ids of the signed-in user.
///
/// `Ok(None)` when the user has no profile row or an unknown role.
pub async fn user_context(backend: &dyn Backend, session: &AuthUser) -> Result<Option<UserContext>, BackendError> {
    let profile = backend.profile(&session.token, session.id).await?;

    Ok(profile.and_then(|profile| UserContext::from_profile(profile, session.email.clone())))
}
