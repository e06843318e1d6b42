// handlers/mod.rs - Two-tier handler layout
//
// Public (no session needed) → Protected (session plus resolved profile).
// Role gating itself happens in the route access middleware; protected
// handlers only ever see requests that already passed it.

pub mod protected; // Dashboard, audit, litige, result, profile and settings
pub mod public; // Service info, health, login/signup/logout, error pages
pub mod views; // Response shapes shared across handlers

use crate::backend::BackendError;

/// Read paths degrade to an empty list when the backend fails.
pub(crate) fn or_empty<T>(result: Result<Vec<T>, BackendError>, what: &str) -> Vec<T> {
    result.unwrap_or_else(|e| {
        tracing::error!("Error fetching {}: {}", what, e);
        Vec::new()
    })
}
