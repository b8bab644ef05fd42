//! Client configuration: API location, request timeout, redirect targets.
//!
//! The API base URL is baked in at compile time from `LMS_API_BASE_URL`; an
//! empty value means same-origin requests (the dev server proxies `/api`).

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use crate::router::guard::RedirectTargets;

const DEFAULT_TIMEOUT_MS: u32 = 5000;
const DEFAULT_LOGIN_PATH: &str = "/login";
const DEFAULT_HOME_PATH: &str = "/";
const DEFAULT_SESSION_PATH: &str = "/api/auth/session";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub request_timeout_ms: u32,
    pub login_path: String,
    pub home_path: String,
    /// Identity validation endpoint consulted by session restore.
    pub session_path: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: String::new(),
            request_timeout_ms: DEFAULT_TIMEOUT_MS,
            login_path: DEFAULT_LOGIN_PATH.to_owned(),
            home_path: DEFAULT_HOME_PATH.to_owned(),
            session_path: DEFAULT_SESSION_PATH.to_owned(),
        }
    }
}

impl ClientConfig {
    /// Build the config from compile-time environment, falling back to defaults.
    pub fn from_build_env() -> Self {
        Self::from_values(option_env!("LMS_API_BASE_URL"), option_env!("LMS_REQUEST_TIMEOUT_MS"))
    }

    fn from_values(base_url: Option<&str>, timeout_ms: Option<&str>) -> Self {
        let mut config = Self::default();
        if let Some(base) = base_url {
            config.api_base_url = base.trim().trim_end_matches('/').to_owned();
        }
        if let Some(ms) = timeout_ms.and_then(|raw| raw.trim().parse::<u32>().ok()) {
            if ms > 0 {
                config.request_timeout_ms = ms;
            }
        }
        config
    }

    pub fn redirects(&self) -> RedirectTargets {
        RedirectTargets {
            login: self.login_path.clone(),
            home: self.home_path.clone(),
        }
    }
}
