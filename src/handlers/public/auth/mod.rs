// handlers/public/auth/mod.rs - Session acquisition and teardown
//
// Sessions are issued by the hosted auth service. The access token is handed
// back in the response body and in the session cookie so browser clients and
// API clients can both use it. The refresh token travels the same way and
// renews the session through /refresh.

pub mod cookie; // Set-Cookie header construction
pub mod login; // GET/POST /login
pub mod logout; // POST /logout
pub mod refresh; // POST /refresh
pub mod signup; // GET/POST /signup

pub use login::{login_get, login_post};
pub use logout::logout_post;
pub use refresh::refresh_post;
pub use signup::{signup_get, signup_post};
