// handlers/protected/account/mod.rs - Account pages
//
// Both pages render for anonymous visitors too, with a signed-out view.

pub mod profile; // GET /profile
pub mod settings; // GET /settings

pub use profile::profile_get;
pub use settings::settings_get;
