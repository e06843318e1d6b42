#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use reqwest::{header, redirect, RequestBuilder, Response};
use serde_json::Value;
use uuid::Uuid;

use certily_api::backend::MemoryBackend;
use certily_api::config::AppConfig;
use certily_api::models::{Airport, Answer, Assessment, AssessmentStatus, Role, Shop};
use certily_api::{app, AppState};

pub const JWT_SECRET: &str = "integration-test-secret";
pub const AUDIENCE: &str = "authenticated";
pub const PASSWORD: &str = "correct-horse";

/// Router served on a free local port, backed by the in-memory backend.
pub struct TestApp {
    pub base_url: String,
    pub backend: Arc<MemoryBackend>,
    client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn() -> Result<Self> {
        let mut config = AppConfig::development();
        config.security.jwt_secret = JWT_SECRET.to_string();
        config.security.jwt_audience = AUDIENCE.to_string();

        let backend = Arc::new(MemoryBackend::new(JWT_SECRET, AUDIENCE));
        let state = AppState::new(config, backend.clone());

        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .with_context(|| format!("failed to bind port {}", port))?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app(state)).await;
        });

        // Redirects are part of what the tests check
        let client = reqwest::Client::builder()
            .redirect(redirect::Policy::none())
            .build()?;

        Ok(Self {
            base_url: format!("http://127.0.0.1:{}", port),
            backend,
            client,
        })
    }

    /// Account with the given role (or no profile at all) and a live token.
    pub async fn user(&self, email: &str, role: Option<Role>) -> Result<(Uuid, String)> {
        let id = self.backend.add_user(email, PASSWORD, role).await;
        let token = self.backend.token_for(id).await?;
        Ok((id, token))
    }

    pub async fn airport(&self, name: &str) -> Airport {
        let airport = Airport {
            id: Uuid::new_v4(),
            name: name.to_string(),
            code: None,
        };
        self.backend.add_airport(airport.clone()).await;
        airport
    }

    pub async fn shop(&self, name: &str, brand: &str, location: &str, monthly: bool, airport: &Airport) -> Shop {
        let shop = Shop {
            id: Uuid::new_v4(),
            name: name.to_string(),
            brand: brand.to_string(),
            location: location.to_string(),
            contact_email: format!("{}@shops.test", name.to_lowercase().replace(' ', "-")),
            is_monthly: Some(monthly),
            airport_id: Some(airport.id),
            airport: None,
            created_at: Some(Utc::now()),
        };
        self.backend.add_shop(shop.clone()).await;
        shop
    }

    pub async fn assessment(&self, shop: &Shop, status: AssessmentStatus, created_at: DateTime<Utc>) -> Assessment {
        let mut answers = BTreeMap::new();
        answers.insert("cleanliness".to_string(), Answer::Rating(4.0));
        answers.insert("welcome".to_string(), Answer::Rating(3.0));

        let assessment = Assessment {
            id: Uuid::new_v4(),
            shop_id: shop.id,
            answers,
            comments: Some("Seeded".to_string()),
            photo_urls: None,
            status,
            created_at,
            shop: None,
        };
        self.backend.add_assessment(assessment.clone()).await;
        assessment
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(builder: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> Result<Response> {
        Ok(Self::authorized(self.client.get(self.url(path)), token).send().await?)
    }

    pub async fn get_with_cookie(&self, path: &str, cookie: &str) -> Result<Response> {
        Ok(self
            .client
            .get(self.url(path))
            .header(header::COOKIE, cookie)
            .send()
            .await?)
    }

    pub async fn post_with_cookie(&self, path: &str, cookie: &str) -> Result<Response> {
        Ok(self
            .client
            .post(self.url(path))
            .header(header::COOKIE, cookie)
            .send()
            .await?)
    }

    pub async fn post(&self, path: &str, token: Option<&str>, body: &Value) -> Result<Response> {
        Ok(Self::authorized(self.client.post(self.url(path)), token)
            .json(body)
            .send()
            .await?)
    }
}

pub fn location(response: &Response) -> Option<String> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// First `Set-Cookie` header, which is always the access token cookie.
pub fn set_cookie(response: &Response) -> Option<String> {
    set_cookies(response).into_iter().next()
}

pub fn set_cookies(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(str::to_string)
        .collect()
}
