// handlers/protected/dashboard/mod.rs - Dashboard pages
//
// /dashboard itself is open to every role with a profile and renders a
// role-specific view. The sub-pages are role-gated by prefix.

pub mod analytics; // GET /dashboard/analytics
pub mod assessments; // GET /dashboard/assessments
pub mod overview; // GET /dashboard
pub mod shops; // GET /dashboard/shops
pub mod super_admin; // GET /dashboard/super-admin

pub use analytics::analytics_get;
pub use assessments::assessments_get;
pub use overview::dashboard_get;
pub use shops::shops_get;
pub use super_admin::super_admin_get;
