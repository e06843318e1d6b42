use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub api: ApiConfig,
    pub security: SecurityConfig,
    pub backend: BackendConfig,
    pub stats: StatsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub port: u16,
    pub bind_host: String,
    pub enable_request_logging: bool,
    pub max_request_size_bytes: usize,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
    pub secure_cookies: bool,
    pub session_cookie: String,
    pub refresh_cookie: String,
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub jwt_audience: String,
}

/// Hosted Supabase project the service delegates auth and persistence to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub url: String,
    #[serde(skip_serializing)]
    pub anon_key: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsConfig {
    /// Offset applied before comparing calendar months.
    pub utc_offset_minutes: i32,
    /// Fixed number of shops to audit each month. When unset the target is
    /// the number of shops flagged `is_monthly`.
    pub monthly_target: Option<usize>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // API overrides
        if let Some(v) = env::var("CERTILY_API_PORT").ok().or_else(|| env::var("PORT").ok()) {
            self.api.port = v.parse().unwrap_or(self.api.port);
        }
        if let Ok(v) = env::var("API_BIND_HOST") {
            self.api.bind_host = v;
        }
        if let Ok(v) = env::var("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }
        if let Ok(v) = env::var("API_MAX_REQUEST_SIZE_BYTES") {
            self.api.max_request_size_bytes = v.parse().unwrap_or(self.api.max_request_size_bytes);
        }
        if let Ok(v) = env::var("API_REQUEST_TIMEOUT_SECS") {
            self.api.request_timeout_secs = v.parse().unwrap_or(self.api.request_timeout_secs);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }
        if let Ok(v) = env::var("SECURITY_SECURE_COOKIES") {
            self.security.secure_cookies = v.parse().unwrap_or(self.security.secure_cookies);
        }
        if let Ok(v) = env::var("SECURITY_SESSION_COOKIE") {
            self.security.session_cookie = v;
        }
        if let Ok(v) = env::var("SECURITY_REFRESH_COOKIE") {
            self.security.refresh_cookie = v;
        }
        if let Ok(v) = env::var("SUPABASE_JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("SUPABASE_JWT_AUDIENCE") {
            self.security.jwt_audience = v;
        }

        // Backend overrides
        if let Ok(v) = env::var("SUPABASE_URL") {
            self.backend.url = v.trim_end_matches('/').to_string();
        }
        if let Ok(v) = env::var("SUPABASE_ANON_KEY") {
            self.backend.anon_key = v;
        }
        if let Ok(v) = env::var("SUPABASE_TIMEOUT_SECS") {
            self.backend.timeout_secs = v.parse().unwrap_or(self.backend.timeout_secs);
        }

        // Stats overrides
        if let Ok(v) = env::var("STATS_UTC_OFFSET_MINUTES") {
            self.stats.utc_offset_minutes = v.parse().unwrap_or(self.stats.utc_offset_minutes);
        }
        if let Ok(v) = env::var("STATS_MONTHLY_TARGET") {
            self.stats.monthly_target = v.parse().ok();
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            api: ApiConfig {
                port: 3000,
                bind_host: "0.0.0.0".to_string(),
                enable_request_logging: true,
                max_request_size_bytes: 25 * 1024 * 1024, // 25MB, photos travel as data URLs
                request_timeout_secs: 60,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
                secure_cookies: false,
                session_cookie: "sb-access-token".to_string(),
                refresh_cookie: "sb-refresh-token".to_string(),
                jwt_secret: String::new(),
                jwt_audience: "authenticated".to_string(),
            },
            backend: BackendConfig {
                url: "http://localhost:54321".to_string(),
                anon_key: String::new(),
                timeout_secs: 30,
            },
            stats: StatsConfig {
                utc_offset_minutes: 0,
                monthly_target: None,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            api: ApiConfig {
                port: 3000,
                bind_host: "0.0.0.0".to_string(),
                enable_request_logging: true,
                max_request_size_bytes: 20 * 1024 * 1024,
                request_timeout_secs: 30,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://staging.certily.app".to_string()],
                secure_cookies: true,
                session_cookie: "sb-access-token".to_string(),
                refresh_cookie: "sb-refresh-token".to_string(),
                jwt_secret: String::new(),
                jwt_audience: "authenticated".to_string(),
            },
            backend: BackendConfig {
                url: String::new(),
                anon_key: String::new(),
                timeout_secs: 15,
            },
            stats: StatsConfig {
                utc_offset_minutes: 0,
                monthly_target: None,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            api: ApiConfig {
                port: 3000,
                bind_host: "0.0.0.0".to_string(),
                enable_request_logging: false,
                max_request_size_bytes: 20 * 1024 * 1024,
                request_timeout_secs: 30,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://app.certily.app".to_string()],
                secure_cookies: true,
                session_cookie: "sb-access-token".to_string(),
                refresh_cookie: "sb-refresh-token".to_string(),
                jwt_secret: String::new(),
                jwt_audience: "authenticated".to_string(),
            },
            backend: BackendConfig {
                url: String::new(),
                anon_key: String::new(),
                timeout_secs: 10,
            },
            stats: StatsConfig {
                utc_offset_minutes: 0,
                monthly_target: None,
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[macro_export]
macro_rules! is_production {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Production)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert!(!config.security.secure_cookies);
        assert_eq!(config.security.session_cookie, "sb-access-token");
        assert_eq!(config.security.refresh_cookie, "sb-refresh-token");
        assert_eq!(config.security.jwt_audience, "authenticated");
        assert_eq!(config.stats.monthly_target, None);
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert!(config.security.secure_cookies);
        assert!(!config.api.enable_request_logging);
        assert!(config.backend.url.is_empty());
    }

    #[test]
    fn test_secrets_are_not_serialized() {
        let mut config = AppConfig::development();
        config.security.jwt_secret = "super-secret".to_string();
        config.backend.anon_key = "anon".to_string();

        let dumped = serde_json::to_string(&config).unwrap();
        assert!(!dumped.contains("super-secret"));
        assert!(!dumped.contains("anon_key"));
    }
}
