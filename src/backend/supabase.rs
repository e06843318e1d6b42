use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info};
use url::Url;
use uuid::Uuid;

use super::{Backend, BackendError, SignUpOutcome};
use crate::config::BackendConfig;
use crate::models::{
    Assessment, AuthSession, Credentials, Litige, NewAssessment, NewLitige, Profile, SessionUser, Shop,
};

const SHOP_SELECT: &str = "*,airports(*)";
const ASSESSMENT_SELECT: &str = "*,shops(*,airports(*))";

/// PostgREST + GoTrue client for a Supabase project.
#[derive(Clone)]
pub struct SupabaseBackend {
    http: Client,
    base: Url,
    anon_key: String,
}

impl SupabaseBackend {
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        if config.url.is_empty() {
            return Err(BackendError::ConfigMissing("SUPABASE_URL"));
        }
        if config.anon_key.is_empty() {
            return Err(BackendError::ConfigMissing("SUPABASE_ANON_KEY"));
        }

        let mut base = Url::parse(&config.url).map_err(|_| BackendError::InvalidUrl(config.url.clone()))?;
        // Url::join replaces the last segment unless the path ends with a slash
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        info!("Supabase backend configured for {}", base);

        Ok(Self {
            http,
            base,
            anon_key: config.anon_key.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, BackendError> {
        self.base
            .join(path)
            .map_err(|_| BackendError::InvalidUrl(format!("{}{}", self.base, path)))
    }

    fn auth_request(&self, method: Method, path: &str) -> Result<RequestBuilder, BackendError> {
        let url = self.endpoint(&format!("auth/v1/{}", path))?;
        Ok(self.http.request(method, url).header("apikey", &self.anon_key))
    }

    /// Request against a table, authenticated as the caller so row-level
    /// security applies.
    fn table_request(&self, method: Method, table: &str, token: &str) -> Result<RequestBuilder, BackendError> {
        let url = self.endpoint(&format!("rest/v1/{}", table))?;
        Ok(self
            .http
            .request(method, url)
            .header("apikey", &self.anon_key)
            .bearer_auth(token))
    }

    async fn insert_row<B, T>(&self, table: &str, token: &str, row: &B) -> Result<T, BackendError>
    where
        B: serde::Serialize + Sync,
        T: DeserializeOwned,
    {
        let response = self
            .table_request(Method::POST, table, token)?
            .header("Prefer", "return=representation")
            .query(&[("select", "*")])
            .json(&[row])
            .send()
            .await?;

        let mut rows: Vec<T> = read_json(response).await?;
        if rows.is_empty() {
            return Err(BackendError::Decode(format!("insert into {} returned no row", table)));
        }
        Ok(rows.remove(0))
    }
}

#[async_trait]
impl Backend for SupabaseBackend {
    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthSession, BackendError> {
        let response = self
            .auth_request(Method::POST, "token")?
            .query(&[("grant_type", "password")])
            .json(&serde_json::json!({
                "email": credentials.email,
                "password": credentials.password,
            }))
            .send()
            .await?;

        match response.status() {
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => {
                let message = error_message(&response.text().await.unwrap_or_default());
                Err(BackendError::InvalidCredentials(message))
            }
            _ => read_json(response).await,
        }
    }

    async fn sign_up(&self, credentials: &Credentials) -> Result<SignUpOutcome, BackendError> {
        let response = self
            .auth_request(Method::POST, "signup")?
            .json(&serde_json::json!({
                "email": credentials.email,
                "password": credentials.password,
            }))
            .send()
            .await?;

        let body: Value = read_json(response).await?;

        // Auto-confirmed projects answer with a full session, others with the bare user
        if body.get("access_token").is_some() {
            let session: AuthSession =
                serde_json::from_value(body).map_err(|e| BackendError::Decode(e.to_string()))?;
            return Ok(SignUpOutcome {
                user: session.user.clone(),
                session: Some(session),
            });
        }

        let user: SessionUser = serde_json::from_value(body.get("user").cloned().unwrap_or(body))
            .map_err(|e| BackendError::Decode(e.to_string()))?;
        Ok(SignUpOutcome { user, session: None })
    }

    async fn sign_out(&self, token: &str) -> Result<(), BackendError> {
        let response = self
            .auth_request(Method::POST, "logout")?
            .bearer_auth(token)
            .send()
            .await?;

        ensure_success(response).await
    }

    async fn user(&self, token: &str) -> Result<SessionUser, BackendError> {
        let response = self.auth_request(Method::GET, "user")?.bearer_auth(token).send().await?;

        match response.status() {
            // GoTrue answers 403 for sessions that were signed out server-side
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                let message = error_message(&response.text().await.unwrap_or_default());
                Err(BackendError::status(StatusCode::UNAUTHORIZED, message))
            }
            _ => read_json(response).await,
        }
    }

    async fn refresh(&self, refresh_token: &str) -> Result<AuthSession, BackendError> {
        let response = self
            .auth_request(Method::POST, "token")?
            .query(&[("grant_type", "refresh_token")])
            .json(&serde_json::json!({ "refresh_token": refresh_token }))
            .send()
            .await?;

        match response.status() {
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => {
                let message = error_message(&response.text().await.unwrap_or_default());
                Err(BackendError::InvalidCredentials(message))
            }
            _ => read_json(response).await,
        }
    }

    async fn profile(&self, token: &str, user_id: Uuid) -> Result<Option<Profile>, BackendError> {
        let response = self
            .table_request(Method::GET, "profiles", token)?
            .query(&[("select", "*".to_string()), ("id", format!("eq.{}", user_id))])
            .send()
            .await?;

        let mut rows: Vec<Profile> = read_json(response).await?;
        debug!("Fetched {} profile row(s) for user {}", rows.len(), user_id);
        Ok(if rows.is_empty() { None } else { Some(rows.remove(0)) })
    }

    async fn shops(&self, token: &str) -> Result<Vec<Shop>, BackendError> {
        let response = self
            .table_request(Method::GET, "shops", token)?
            .query(&[("select", SHOP_SELECT), ("order", "created_at.desc")])
            .send()
            .await?;

        read_json(response).await
    }

    async fn assessments(&self, token: &str, shop_id: Option<Uuid>) -> Result<Vec<Assessment>, BackendError> {
        let mut query = vec![
            ("select", ASSESSMENT_SELECT.to_string()),
            ("order", "created_at.desc".to_string()),
        ];
        if let Some(shop_id) = shop_id {
            query.push(("shop_id", format!("eq.{}", shop_id)));
        }

        let response = self
            .table_request(Method::GET, "assessments", token)?
            .query(&query)
            .send()
            .await?;

        read_json(response).await
    }

    async fn assessment(&self, token: &str, id: Uuid) -> Result<Option<Assessment>, BackendError> {
        let response = self
            .table_request(Method::GET, "assessments", token)?
            .query(&[("select", ASSESSMENT_SELECT.to_string()), ("id", format!("eq.{}", id))])
            .send()
            .await?;

        let mut rows: Vec<Assessment> = read_json(response).await?;
        Ok(if rows.is_empty() { None } else { Some(rows.remove(0)) })
    }

    async fn insert_assessment(&self, token: &str, new: &NewAssessment) -> Result<Assessment, BackendError> {
        self.insert_row("assessments", token, new).await
    }

    async fn insert_litige(&self, token: &str, new: &NewLitige) -> Result<Litige, BackendError> {
        self.insert_row("litige", token, new).await
    }

    async fn health(&self) -> Result<(), BackendError> {
        let response = self.auth_request(Method::GET, "health")?.send().await?;
        ensure_success(response).await
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(BackendError::status(status, error_message(&body)));
    }

    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| BackendError::Decode(e.to_string()))
}

async fn ensure_success(response: Response) -> Result<(), BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let body = response.text().await.unwrap_or_default();
    Err(BackendError::status(status, error_message(&body)))
}

/// Pull a human readable message out of a GoTrue or PostgREST error body.
fn error_message(body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    parsed
        .as_ref()
        .and_then(|v| {
            ["error_description", "msg", "message", "error"]
                .iter()
                .find_map(|key| v.get(*key).and_then(Value::as_str))
        })
        .map(str::to_string)
        .unwrap_or_else(|| {
            if body.is_empty() {
                "no response body".to_string()
            } else {
                body.to_string()
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn config(url: &str) -> BackendConfig {
        let mut backend = AppConfig::development().backend;
        backend.url = url.to_string();
        backend.anon_key = "anon".to_string();
        backend
    }

    #[test]
    fn test_requires_url_and_key() {
        let mut cfg = config("");
        assert!(matches!(SupabaseBackend::new(&cfg), Err(BackendError::ConfigMissing("SUPABASE_URL"))));

        cfg.url = "https://demo.supabase.co".to_string();
        cfg.anon_key.clear();
        assert!(matches!(SupabaseBackend::new(&cfg), Err(BackendError::ConfigMissing("SUPABASE_ANON_KEY"))));
    }

    #[test]
    fn test_endpoints_keep_base_path() {
        let backend = SupabaseBackend::new(&config("https://proxy.example.com/supabase")).unwrap();
        assert_eq!(
            backend.endpoint("rest/v1/shops").unwrap().as_str(),
            "https://proxy.example.com/supabase/rest/v1/shops"
        );

        let backend = SupabaseBackend::new(&config("https://demo.supabase.co")).unwrap();
        assert_eq!(
            backend.endpoint("auth/v1/token").unwrap().as_str(),
            "https://demo.supabase.co/auth/v1/token"
        );
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(
            error_message(r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#),
            "Invalid login credentials"
        );
        assert_eq!(error_message(r#"{"code":"42501","message":"permission denied"}"#), "permission denied");
        assert_eq!(error_message("gateway timeout"), "gateway timeout");
        assert_eq!(error_message(""), "no response body");
    }
}
