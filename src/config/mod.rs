use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub enable_request_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the persisted `token` and `user` entries.
    /// `None` means `$HOME/.config/dashboard`.
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Rows per page for paginated listings
    pub page_size: u32,
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
        if let Ok(v) = env::var("DASHBOARD_API_URL") {
            self.api.base_url = v.trim_end_matches('/').to_string();
        }
        if let Ok(v) = env::var("DASHBOARD_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }
        if let Ok(v) = env::var("DASHBOARD_CONFIG_DIR") {
            self.storage.dir = Some(PathBuf::from(v));
        }
        if let Ok(v) = env::var("DASHBOARD_PAGE_SIZE") {
            self.ui.page_size = parse_page_size(&v).unwrap_or(self.ui.page_size);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            api: ApiConfig {
                base_url: "http://localhost:8080".to_string(),
                enable_request_logging: true,
            },
            storage: StorageConfig { dir: None },
            ui: UiConfig::default(),
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            api: ApiConfig {
                base_url: "http://localhost:8080".to_string(),
                enable_request_logging: true,
            },
            storage: StorageConfig { dir: None },
            ui: UiConfig::default(),
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            api: ApiConfig {
                base_url: "http://localhost:8080".to_string(),
                enable_request_logging: false,
            },
            storage: StorageConfig { dir: None },
            ui: UiConfig::default(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            page_size: 10,
        }
    }
}

/// Positive page size; zero or garbage is ignored
fn parse_page_size(raw: &str) -> Option<u32> {
    raw.trim().parse().ok().filter(|size: &u32| *size > 0)
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
