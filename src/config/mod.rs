use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

pub const DEFAULT_SIGMA_API_URL: &str = "https://api.segware.com.br";
pub const DEFAULT_SIGMA_AUTH_URL: &str = "https://cloud.segware.com.br/server/v2/auth";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub sigma: SigmaCloudConfig,
    pub gateway: GatewayConfig,
    pub http: HttpConfig,
    pub server: ServerConfig,
    pub validation: ValidationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

/// Credentials and endpoints for the Sigma Cloud directory, receiver and event APIs
#[derive(Clone, Serialize, Deserialize)]
pub struct SigmaCloudConfig {
    pub api_url: String,
    pub auth_url: String,
    pub bearer_token: String,
    pub username: String,
    pub password: String,
}

// Secrets stay out of Debug output so the config can be logged at startup.
impl std::fmt::Debug for SigmaCloudConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigmaCloudConfig")
            .field("api_url", &self.api_url)
            .field("auth_url", &self.auth_url)
            .field("bearer_token_set", &!self.bearer_token.is_empty())
            .field("username", &self.username)
            .field("password_set", &!self.password.is_empty())
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Scheme and host of the device gateway, the request's `server` is appended as the port
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    pub partition_id_check: PartitionIdCheck,
}

/// How the validator treats `partitionId`.
///
/// The legacy service accepted a request only when `partitionId` was absent,
/// the opposite of every other required field. `LegacyInverted` reproduces
/// that condition for callers that depend on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PartitionIdCheck {
    #[default]
    Required,
    LegacyInverted,
}

impl PartitionIdCheck {
    fn from_env_value(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "required" | "strict" => Some(Self::Required),
            "legacy" | "legacy_inverted" | "inverted" => Some(Self::LegacyInverted),
            _ => None,
        }
    }
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
        // Sigma Cloud overrides
        if let Ok(v) = env::var("SIGMA_CLOUD_API_URL") {
            self.sigma.api_url = v.trim_end_matches('/').to_string();
        }
        if let Ok(v) = env::var("SIGMA_CLOUD_AUTH_URL") {
            self.sigma.auth_url = v;
        }
        if let Ok(v) = env::var("SIGMA_CLOUD_BEARER_TOKEN") {
            self.sigma.bearer_token = v;
        }
        if let Ok(v) = env::var("SIGMA_CLOUD_USERNAME") {
            self.sigma.username = v;
        }
        if let Ok(v) = env::var("SIGMA_CLOUD_PASSWORD") {
            self.sigma.password = v;
        }

        // Gateway overrides
        if let Ok(v) = env::var("BASE_URL") {
            self.gateway.base_url = v.trim_end_matches('/').to_string();
        }

        // HTTP client overrides
        if let Ok(v) = env::var("HTTP_TIMEOUT_SECS") {
            self.http.timeout_secs = v.parse().unwrap_or(self.http.timeout_secs);
        }

        // Server overrides
        if let Some(port) = env::var("OPENING_API_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.server.port = port;
        }

        // Validation overrides
        if let Ok(v) = env::var("OPENING_PARTITION_ID_CHECK") {
            match PartitionIdCheck::from_env_value(&v) {
                Some(check) => self.validation.partition_id_check = check,
                None => tracing::warn!("Ignoring unknown OPENING_PARTITION_ID_CHECK value '{}'", v),
            }
        }

        self
    }

    /// Names of required secrets that are currently empty
    pub fn missing_secrets(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.sigma.bearer_token.is_empty() {
            missing.push("SIGMA_CLOUD_BEARER_TOKEN");
        }
        if self.sigma.username.is_empty() {
            missing.push("SIGMA_CLOUD_USERNAME");
        }
        if self.sigma.password.is_empty() {
            missing.push("SIGMA_CLOUD_PASSWORD");
        }
        if self.gateway.base_url.is_empty() {
            missing.push("BASE_URL");
        }
        missing
    }

    fn base(environment: Environment, timeout_secs: u64) -> Self {
        Self {
            environment,
            sigma: SigmaCloudConfig {
                api_url: DEFAULT_SIGMA_API_URL.to_string(),
                auth_url: DEFAULT_SIGMA_AUTH_URL.to_string(),
                bearer_token: String::new(),
                username: String::new(),
                password: String::new(),
            },
            gateway: GatewayConfig {
                base_url: String::new(),
            },
            http: HttpConfig { timeout_secs },
            server: ServerConfig { port: 3000 },
            validation: ValidationConfig {
                partition_id_check: PartitionIdCheck::Required,
            },
        }
    }

    fn development() -> Self {
        let mut config = Self::base(Environment::Development, 30);
        config.gateway.base_url = "http://localhost".to_string();
        config
    }

    fn staging() -> Self {
        Self::base(Environment::Staging, 20)
    }

    fn production() -> Self {
        Self::base(Environment::Production, 15)
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
