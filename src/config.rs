use crate::errors::DashboardError;
use reqwest::Url;
use std::env;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub api_url: Url,
    /// Raw `Cookie` header value carrying the admin session.
    pub session_cookie: Option<String>,
}

impl DashboardConfig {
    pub fn from_env() -> Result<Self, DashboardError> {
        let api_url = resolve_api_url(env::var("ADMIN_API_URL").ok())?;
        let session_cookie = env::var("ADMIN_SESSION_COOKIE")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        Ok(Self {
            api_url,
            session_cookie,
        })
    }
}

pub fn resolve_api_url(raw: Option<String>) -> Result<Url, DashboardError> {
    let raw = raw
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());

    let url = Url::parse(&raw).map_err(|err| DashboardError::Config(format!("ADMIN_API_URL '{raw}': {err}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(DashboardError::Config(format!(
            "ADMIN_API_URL must be http or https, got '{}'",
            url.scheme()
        )));
    }
    if url.path() != "/" {
        return Err(DashboardError::Config(format!(
            "ADMIN_API_URL must not carry a path, got '{}'",
            url.path()
        )));
    }
    Ok(url)
}
