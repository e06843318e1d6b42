// handlers/protected/account/profile.rs - GET /profile

use axum::Extension;
use serde::Serialize;
use uuid::Uuid;

use crate::handlers::views::Navigation;
use crate::middleware::{ApiResponse, AuthUser, Viewer};
use crate::models::Role;

#[derive(Debug, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ProfilePage {
    SignedOut {
        message: &'static str,
        login: &'static str,
    },
    /// Session without a usable profile row.
    PendingRole {
        email: Option<String>,
        message: &'static str,
    },
    SignedIn {
        id: Uuid,
        email: Option<String>,
        role: Role,
        #[serde(skip_serializing_if = "Option::is_none")]
        shop_ids: Option<Vec<Uuid>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        airport_ids: Option<Vec<Uuid>>,
        navigation: Navigation,
    },
}

impl ProfilePage {
    /// Only the ids that scope the user's role are listed.
    pub fn signed_in(viewer: Viewer) -> Self {
        let context = viewer.context;
        let (shop_ids, airport_ids) = match context.role {
            Role::ShopOwner => (Some(context.shop_ids), None),
            Role::AirportManager | Role::AirportWorker => (None, Some(context.airport_ids)),
            Role::SuperUser => (None, None),
        };

        ProfilePage::SignedIn {
            id: context.user_id,
            email: context.email,
            role: context.role,
            shop_ids,
            airport_ids,
            navigation: Navigation::for_role(context.role),
        }
    }
}

pub async fn profile_get(viewer: Option<Viewer>, session: Option<Extension<AuthUser>>) -> ApiResponse<ProfilePage> {
    let page = match (viewer, session) {
        (Some(viewer), _) => ProfilePage::signed_in(viewer),
        (None, Some(Extension(user))) => ProfilePage::PendingRole {
            email: user.email,
            message: "Your account has no role yet. Contact an administrator.",
        },
        (None, None) => ProfilePage::SignedOut {
            message: "You are not logged in.",
            login: "/login",
        },
    };

    ApiResponse::success(page)
}
