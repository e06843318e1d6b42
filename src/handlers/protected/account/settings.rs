// handlers/protected/account/settings.rs - GET /settings

use serde::Serialize;

use crate::middleware::{ApiResponse, Viewer};
use crate::models::Role;

#[derive(Debug, Serialize)]
pub struct Section {
    pub key: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Serialize)]
pub struct Preference {
    pub key: &'static str,
    pub label: &'static str,
    pub enabled: bool,
}

#[derive(Debug, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SettingsPage {
    SignedOut {
        message: &'static str,
        login: &'static str,
    },
    SignedIn {
        email: Option<String>,
        role: Role,
        sections: Vec<Section>,
        preferences: Vec<Preference>,
    },
}

pub fn role_sections(role: Role) -> Vec<Section> {
    let mut sections = vec![Section {
        key: "account",
        title: "Account",
        description: "Email address and password",
    }];

    sections.push(match role {
        Role::SuperUser => Section {
            key: "administration",
            title: "Administration",
            description: "Users, roles, airports and shops",
        },
        Role::AirportManager => Section {
            key: "airport",
            title: "Airport management",
            description: "Shops of your airports and their monthly audit plan",
        },
        Role::AirportWorker => Section {
            key: "disputes",
            title: "Disputes",
            description: "Disputes you filed against shops",
        },
        Role::ShopOwner => Section {
            key: "shops",
            title: "My shops",
            description: "Contact details of your shops",
        },
    });

    sections
}

fn preferences() -> Vec<Preference> {
    vec![
        Preference {
            key: "email_notifications",
            label: "Email notifications",
            enabled: true,
        },
        Preference {
            key: "dark_mode",
            label: "Dark mode",
            enabled: false,
        },
    ]
}

pub async fn settings_get(viewer: Option<Viewer>) -> ApiResponse<SettingsPage> {
    let page = match viewer {
        Some(viewer) => SettingsPage::SignedIn {
            sections: role_sections(viewer.context.role),
            preferences: preferences(),
            email: viewer.context.email,
            role: viewer.context.role,
        },
        None => SettingsPage::SignedOut {
            message: "You are not logged in.",
            login: "/login",
        },
    };

    ApiResponse::success(page)
}
