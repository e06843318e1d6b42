// handlers/public/mod.rs - Public handlers (no session required)
//
// Signed-in users are bounced from the login and signup pages to the
// dashboard by the route access middleware before these handlers run.

pub mod auth; // Login, signup, logout and session refresh
pub mod pages; // Service info, health and error pages

pub use auth::{login_get, login_post, logout_post, refresh_post, signup_get, signup_post};
pub use pages::{health, not_found, root, unauthorized};
