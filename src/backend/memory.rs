use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Duration;
use reqwest::StatusCode;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Backend, BackendError, SignUpOutcome};
use crate::auth::{generate_jwt, Claims};
use crate::models::{
    Airport, Assessment, AuthSession, Credentials, Litige, NewAssessment, NewLitige, Profile, Role, SessionUser,
    Shop,
};

/// In-process stand-in for the hosted backend.
///
/// Issues real signed session tokens so the route middleware can be exercised
/// end to end, and applies a simplified version of the row-level policies:
/// shop owners see their assigned shops, airport managers and workers see the
/// shops of their airports, super users see everything.
pub struct MemoryBackend {
    jwt_secret: String,
    audience: String,
    state: RwLock<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    accounts: HashMap<String, Account>,
    tokens: HashMap<String, Uuid>,
    refresh_tokens: HashMap<String, Uuid>,
    profiles: HashMap<Uuid, Profile>,
    airports: Vec<Airport>,
    shops: Vec<Shop>,
    assessments: Vec<Assessment>,
    litiges: Vec<Litige>,
    offline: bool,
}

struct Account {
    id: Uuid,
    password: String,
}

impl MemoryBackend {
    pub fn new(jwt_secret: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            audience: audience.into(),
            state: RwLock::new(MemoryState::default()),
        }
    }

    /// Register an account. A `None` role creates the account without a
    /// profile row.
    pub async fn add_user(&self, email: &str, password: &str, role: Option<Role>) -> Uuid {
        let id = Uuid::new_v4();
        let mut state = self.state.write().await;
        state.accounts.insert(
            email.to_string(),
            Account {
                id,
                password: password.to_string(),
            },
        );
        if let Some(role) = role {
            state.profiles.insert(
                id,
                Profile {
                    id,
                    role: Some(role.as_str().to_string()),
                    email: Some(email.to_string()),
                    shop_ids: None,
                    airport_ids: None,
                },
            );
        }
        id
    }

    pub async fn set_profile(&self, profile: Profile) {
        self.state.write().await.profiles.insert(profile.id, profile);
    }

    pub async fn assign_shops(&self, user_id: Uuid, shop_ids: Vec<Uuid>) {
        if let Some(profile) = self.state.write().await.profiles.get_mut(&user_id) {
            profile.shop_ids = Some(shop_ids);
        }
    }

    pub async fn assign_airports(&self, user_id: Uuid, airport_ids: Vec<Uuid>) {
        if let Some(profile) = self.state.write().await.profiles.get_mut(&user_id) {
            profile.airport_ids = Some(airport_ids);
        }
    }

    pub async fn add_airport(&self, airport: Airport) {
        self.state.write().await.airports.push(airport);
    }

    pub async fn add_shop(&self, shop: Shop) {
        self.state.write().await.shops.push(shop);
    }

    pub async fn add_assessment(&self, assessment: Assessment) {
        self.state.write().await.assessments.push(assessment);
    }

    pub async fn litiges(&self) -> Vec<Litige> {
        self.state.read().await.litiges.clone()
    }

    pub async fn set_offline(&self, offline: bool) {
        self.state.write().await.offline = offline;
    }

    /// Mint a session token for an existing account.
    pub async fn token_for(&self, user_id: Uuid) -> Result<String, BackendError> {
        let email = self.state.read().await.email_of(user_id);

        let claims = Claims::new(user_id, email, &self.audience, Duration::hours(1));
        let token = generate_jwt(&claims, &self.jwt_secret)
            .map_err(|e| BackendError::Decode(e.to_string()))?;

        self.state.write().await.tokens.insert(token.clone(), user_id);
        Ok(token)
    }

    async fn session_for(&self, user_id: Uuid, email: Option<String>) -> Result<AuthSession, BackendError> {
        let access_token = self.token_for(user_id).await?;
        let refresh_token = Uuid::new_v4().simple().to_string();
        self.state
            .write()
            .await
            .refresh_tokens
            .insert(refresh_token.clone(), user_id);

        Ok(AuthSession {
            access_token,
            refresh_token: Some(refresh_token),
            expires_in: Some(3600),
            token_type: Some("bearer".to_string()),
            user: SessionUser { id: user_id, email },
        })
    }
}

impl MemoryState {
    fn ensure_online(&self) -> Result<(), BackendError> {
        if self.offline {
            return Err(BackendError::status(StatusCode::SERVICE_UNAVAILABLE, "backend offline"));
        }
        Ok(())
    }

    fn caller(&self, token: &str) -> Result<Uuid, BackendError> {
        self.ensure_online()?;
        self.tokens
            .get(token)
            .copied()
            .ok_or_else(|| BackendError::status(StatusCode::UNAUTHORIZED, "JWT expired or unknown"))
    }

    fn email_of(&self, user_id: Uuid) -> Option<String> {
        self.accounts
            .iter()
            .find(|(_, account)| account.id == user_id)
            .map(|(email, _)| email.clone())
    }

    fn can_see(&self, caller: Uuid, shop: &Shop) -> bool {
        let Some(profile) = self.profiles.get(&caller) else {
            return false;
        };
        let in_airports = |ids: &Option<Vec<Uuid>>| {
            shop.airport_id
                .map(|airport| ids.as_deref().unwrap_or_default().contains(&airport))
                .unwrap_or(false)
        };

        match profile.role.as_deref().and_then(|r| r.parse::<Role>().ok()) {
            Some(Role::SuperUser) => true,
            Some(Role::AirportManager) | Some(Role::AirportWorker) => in_airports(&profile.airport_ids),
            Some(Role::ShopOwner) => profile.shop_ids.as_deref().unwrap_or_default().contains(&shop.id),
            None => false,
        }
    }

    fn embed_shop(&self, shop: &Shop) -> Shop {
        let mut shop = shop.clone();
        if shop.airport.is_none() {
            shop.airport = shop
                .airport_id
                .and_then(|id| self.airports.iter().find(|a| a.id == id).cloned());
        }
        shop
    }

    fn visible_shops(&self, caller: Uuid) -> Vec<Shop> {
        let mut shops: Vec<Shop> = self
            .shops
            .iter()
            .filter(|shop| self.can_see(caller, shop))
            .map(|shop| self.embed_shop(shop))
            .collect();
        shops.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        shops
    }

    fn visible_assessments(&self, caller: Uuid) -> Vec<Assessment> {
        let shops = self.visible_shops(caller);
        let mut rows: Vec<Assessment> = self
            .assessments
            .iter()
            .filter_map(|a| {
                let shop = shops.iter().find(|s| s.id == a.shop_id)?;
                let mut row = a.clone();
                row.shop = Some(shop.clone());
                Some(row)
            })
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthSession, BackendError> {
        let user_id = {
            let state = self.state.read().await;
            state.ensure_online()?;
            match state.accounts.get(&credentials.email) {
                Some(account) if account.password == credentials.password => account.id,
                _ => return Err(BackendError::InvalidCredentials("Invalid login credentials".to_string())),
            }
        };

        self.session_for(user_id, Some(credentials.email.clone())).await
    }

    async fn sign_up(&self, credentials: &Credentials) -> Result<SignUpOutcome, BackendError> {
        {
            let state = self.state.read().await;
            state.ensure_online()?;
            if state.accounts.contains_key(&credentials.email) {
                return Err(BackendError::status(StatusCode::UNPROCESSABLE_ENTITY, "User already registered"));
            }
        }

        let user_id = self.add_user(&credentials.email, &credentials.password, None).await;
        let session = self.session_for(user_id, Some(credentials.email.clone())).await?;

        Ok(SignUpOutcome {
            user: session.user.clone(),
            session: Some(session),
        })
    }

    async fn sign_out(&self, token: &str) -> Result<(), BackendError> {
        let mut state = self.state.write().await;
        state.ensure_online()?;
        // Signing out ends every session of the user, refresh tokens included
        if let Some(user_id) = state.tokens.remove(token) {
            state.tokens.retain(|_, owner| *owner != user_id);
            state.refresh_tokens.retain(|_, owner| *owner != user_id);
        }
        Ok(())
    }

    async fn user(&self, token: &str) -> Result<SessionUser, BackendError> {
        let state = self.state.read().await;
        let id = state.caller(token)?;
        Ok(SessionUser {
            id,
            email: state.email_of(id),
        })
    }

    async fn refresh(&self, refresh_token: &str) -> Result<AuthSession, BackendError> {
        // Refresh tokens are single use
        let (user_id, email) = {
            let mut state = self.state.write().await;
            state.ensure_online()?;
            let user_id = state
                .refresh_tokens
                .remove(refresh_token)
                .ok_or_else(|| BackendError::InvalidCredentials("Invalid Refresh Token".to_string()))?;
            (user_id, state.email_of(user_id))
        };

        self.session_for(user_id, email).await
    }

    async fn profile(&self, token: &str, user_id: Uuid) -> Result<Option<Profile>, BackendError> {
        let state = self.state.read().await;
        state.caller(token)?;
        Ok(state.profiles.get(&user_id).cloned())
    }

    async fn shops(&self, token: &str) -> Result<Vec<Shop>, BackendError> {
        let state = self.state.read().await;
        let caller = state.caller(token)?;
        Ok(state.visible_shops(caller))
    }

    async fn assessments(&self, token: &str, shop_id: Option<Uuid>) -> Result<Vec<Assessment>, BackendError> {
        let state = self.state.read().await;
        let caller = state.caller(token)?;
        let mut rows = state.visible_assessments(caller);
        if let Some(shop_id) = shop_id {
            rows.retain(|a| a.shop_id == shop_id);
        }
        Ok(rows)
    }

    async fn assessment(&self, token: &str, id: Uuid) -> Result<Option<Assessment>, BackendError> {
        let state = self.state.read().await;
        let caller = state.caller(token)?;
        Ok(state.visible_assessments(caller).into_iter().find(|a| a.id == id))
    }

    async fn insert_assessment(&self, token: &str, new: &NewAssessment) -> Result<Assessment, BackendError> {
        let mut state = self.state.write().await;
        let caller = state.caller(token)?;
        if !state.visible_shops(caller).iter().any(|s| s.id == new.shop_id) {
            return Err(BackendError::status(StatusCode::FORBIDDEN, "new row violates row-level security policy"));
        }

        let row = Assessment {
            id: Uuid::new_v4(),
            shop_id: new.shop_id,
            answers: new.answers.clone(),
            comments: new.comments.clone(),
            photo_urls: Some(new.photo_urls.clone()),
            status: new.status.clone(),
            created_at: new.created_at,
            shop: None,
        };
        state.assessments.push(row.clone());
        Ok(row)
    }

    async fn insert_litige(&self, token: &str, new: &NewLitige) -> Result<Litige, BackendError> {
        let mut state = self.state.write().await;
        state.caller(token)?;
        if !state.shops.iter().any(|s| s.id == new.shop_id) {
            return Err(BackendError::status(StatusCode::CONFLICT, "litige.shop_id violates foreign key constraint"));
        }

        let row = Litige {
            id: Some(Uuid::new_v4()),
            shop_id: new.shop_id,
            comment: new.comment.clone(),
            photos: new.photos.clone(),
            created_at: new.created_at,
        };
        state.litiges.push(row.clone());
        Ok(row)
    }

    async fn health(&self) -> Result<(), BackendError> {
        self.state.read().await.ensure_online()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn shop(name: &str, airport_id: Option<Uuid>) -> Shop {
        Shop {
            id: Uuid::new_v4(),
            name: name.to_string(),
            brand: "Relay".to_string(),
            location: "T1".to_string(),
            contact_email: String::new(),
            is_monthly: Some(true),
            airport_id,
            airport: None,
            created_at: Some(Utc::now()),
        }
    }

    #[tokio::test]
    async fn test_row_policies_per_role() {
        let backend = MemoryBackend::new("secret", "authenticated");
        let airport = Airport { id: Uuid::new_v4(), name: "ORY".to_string(), code: None };
        backend.add_airport(airport.clone()).await;

        let at_airport = shop("A", Some(airport.id));
        let elsewhere = shop("B", None);
        backend.add_shop(at_airport.clone()).await;
        backend.add_shop(elsewhere.clone()).await;

        let admin = backend.add_user("admin@x.io", "pw", Some(Role::SuperUser)).await;
        let manager = backend.add_user("manager@x.io", "pw", Some(Role::AirportManager)).await;
        let owner = backend.add_user("owner@x.io", "pw", Some(Role::ShopOwner)).await;
        backend.assign_airports(manager, vec![airport.id]).await;
        backend.assign_shops(owner, vec![elsewhere.id]).await;

        let token = backend.token_for(admin).await.unwrap();
        assert_eq!(backend.shops(&token).await.unwrap().len(), 2);

        let token = backend.token_for(manager).await.unwrap();
        let shops = backend.shops(&token).await.unwrap();
        assert_eq!(shops.len(), 1);
        assert_eq!(shops[0].airport_name(), Some("ORY"));

        let token = backend.token_for(owner).await.unwrap();
        let shops = backend.shops(&token).await.unwrap();
        assert_eq!(shops.len(), 1);
        assert_eq!(shops[0].id, elsewhere.id);
    }

    #[tokio::test]
    async fn test_sign_in_checks_password() {
        let backend = MemoryBackend::new("secret", "authenticated");
        backend.add_user("worker@x.io", "pw", Some(Role::AirportWorker)).await;

        let bad = Credentials { email: "worker@x.io".into(), password: "nope".into() };
        assert!(matches!(backend.sign_in(&bad).await, Err(BackendError::InvalidCredentials(_))));

        let good = Credentials { email: "worker@x.io".into(), password: "pw".into() };
        let session = backend.sign_in(&good).await.unwrap();
        assert_eq!(session.user.email.as_deref(), Some("worker@x.io"));
        assert!(backend.shops(&session.access_token).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sign_out_revokes_sessions() {
        let backend = MemoryBackend::new("secret", "authenticated");
        let id = backend.add_user("manager@x.io", "pw", Some(Role::AirportManager)).await;
        let good = Credentials { email: "manager@x.io".into(), password: "pw".into() };
        let session = backend.sign_in(&good).await.unwrap();

        assert_eq!(backend.user(&session.access_token).await.unwrap().id, id);

        backend.sign_out(&session.access_token).await.unwrap();
        assert!(backend.user(&session.access_token).await.unwrap_err().is_unauthorized());
        let refresh_token = session.refresh_token.unwrap();
        assert!(matches!(
            backend.refresh(&refresh_token).await,
            Err(BackendError::InvalidCredentials(_))
        ));
    }

    #[tokio::test]
    async fn test_refresh_rotates_tokens() {
        let backend = MemoryBackend::new("secret", "authenticated");
        backend.add_user("worker@x.io", "pw", Some(Role::AirportWorker)).await;
        let good = Credentials { email: "worker@x.io".into(), password: "pw".into() };
        let session = backend.sign_in(&good).await.unwrap();
        let refresh_token = session.refresh_token.unwrap();

        let renewed = backend.refresh(&refresh_token).await.unwrap();
        assert_eq!(renewed.user.email.as_deref(), Some("worker@x.io"));
        assert_ne!(renewed.refresh_token.as_deref(), Some(refresh_token.as_str()));
        assert!(backend.user(&renewed.access_token).await.is_ok());
        assert!(backend.refresh(&refresh_token).await.is_err());
    }

    #[tokio::test]
    async fn test_offline_backend_fails_health() {
        let backend = MemoryBackend::new("secret", "authenticated");
        assert!(backend.health().await.is_ok());
        backend.set_offline(true).await;
        assert!(backend.health().await.is_err());
    }
}
