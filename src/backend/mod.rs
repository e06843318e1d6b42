// Data access over the hosted backend.
//
// Authentication, row-level filtering and persistence all live in the hosted
// Supabase project. Every method forwards the caller's access token so the
// backend's row-level security decides which rows come back.

pub mod memory;
pub mod supabase;

use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    Assessment, AuthSession, Credentials, Litige, NewAssessment, NewLitige, Profile, SessionUser, Shop,
};

pub use memory::MemoryBackend;
pub use supabase::SupabaseBackend;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("Backend rejected request ({status}): {message}")]
    Status { status: u16, message: String },

    #[error("Unexpected backend payload: {0}")]
    Decode(String),

    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

impl BackendError {
    pub fn status(status: StatusCode, message: impl Into<String>) -> Self {
        BackendError::Status {
            status: status.as_u16(),
            message: message.into(),
        }
    }

    /// The backend refused the caller's session token.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, BackendError::Status { status: 401, .. })
    }
}

/// Result of an account creation. `session` is absent when the backend
/// requires email confirmation before the first sign-in.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SignUpOutcome {
    pub user: SessionUser,
    pub session: Option<AuthSession>,
}

#[async_trait]
pub trait Backend: Send + Sync {
    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthSession, BackendError>;

    async fn sign_up(&self, credentials: &Credentials) -> Result<SignUpOutcome, BackendError>;

    async fn sign_out(&self, token: &str) -> Result<(), BackendError>;

    /// The user behind a live session. Revoked or expired sessions fail with
    /// a 401 status.
    async fn user(&self, token: &str) -> Result<SessionUser, BackendError>;

    /// Exchange a refresh token for a new session.
    async fn refresh(&self, refresh_token: &str) -> Result<AuthSession, BackendError>;

    /// Profile row of `user_id`, if one exists.
    async fn profile(&self, token: &str, user_id: Uuid) -> Result<Option<Profile>, BackendError>;

    /// Shops visible to the caller with their airport embedded, newest first.
    async fn shops(&self, token: &str) -> Result<Vec<Shop>, BackendError>;

    /// Assessments visible to the caller with shop and airport embedded,
    /// newest first, optionally limited to one shop.
    async fn assessments(&self, token: &str, shop_id: Option<Uuid>) -> Result<Vec<Assessment>, BackendError>;

    async fn assessment(&self, token: &str, id: Uuid) -> Result<Option<Assessment>, BackendError>;

    async fn insert_assessment(&self, token: &str, new: &NewAssessment) -> Result<Assessment, BackendError>;

    async fn insert_litige(&self, token: &str, new: &NewLitige) -> Result<Litige, BackendError>;

    async fn health(&self) -> Result<(), BackendError>;
}
