use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Application role stored on the user's profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperUser,
    AirportManager,
    AirportWorker,
    ShopOwner,
}

impl Role {
    pub const ALL: [Role; 4] = [
        Role::SuperUser,
        Role::AirportManager,
        Role::AirportWorker,
        Role::ShopOwner,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperUser => "super_user",
            Role::AirportManager => "airport_manager",
            Role::AirportWorker => "airport_worker",
            Role::ShopOwner => "shop_owner",
        }
    }

    /// Shop owners only consult results; everyone else may start an audit.
    pub fn can_audit(&self) -> bool {
        !matches!(self, Role::ShopOwner)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

/// Row of the `profiles` table. The role stays a raw string here so that a
/// profile carrying an unexpected role still deserializes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub shop_ids: Option<Vec<Uuid>>,
    #[serde(default)]
    pub airport_ids: Option<Vec<Uuid>>,
}

/// Everything a handler needs to know about the signed-in user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserContext {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub role: Role,
    pub shop_ids: Vec<Uuid>,
    pub airport_ids: Vec<Uuid>,
}

impl UserContext {
    /// Builds the context from a profile row; `None` when the role is missing
    /// or not one we know.
    pub fn from_profile(profile: Profile, session_email: Option<String>) -> Option<Self> {
        let role = profile.role.as_deref()?.parse::<Role>().ok()?;

        Some(Self {
            user_id: profile.id,
            email: session_email.or(profile.email),
            role,
            shop_ids: profile.shop_ids.unwrap_or_default(),
            airport_ids: profile.airport_ids.unwrap_or_default(),
        })
    }
}
