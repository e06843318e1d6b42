pub mod auth;
pub mod response;
pub mod route_access;

pub use auth::{authenticate, AuthUser, Viewer};
pub use response::{ApiResponse, ApiResult};
pub use route_access::{decide, route_access_middleware, AccessDecision, Identity};
