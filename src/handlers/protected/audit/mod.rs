// handlers/protected/audit/mod.rs - Shop audits
//
// Reserved to airport managers and super users by the route table.

pub mod selector; // GET /audit
pub mod shop; // GET /audit/:shop_id
pub mod submit; // POST /audit/:shop_id

pub use selector::audit_get;
pub use shop::audit_shop_get;
pub use submit::audit_shop_post;

use uuid::Uuid;

use crate::models::Shop;

/// The visible shop with this id, if any. Ids that are not UUIDs match nothing.
pub(crate) fn find_shop(shops: Vec<Shop>, raw_id: &str) -> Option<Shop> {
    let id = Uuid::parse_str(raw_id).ok()?;
    shops.into_iter().find(|s| s.id == id)
}
