//! HTTP client for the SARI portal API
//!
//! Wraps reqwest::Client with base-URL handling and session-cookie
//! injection.

use anyhow::{bail, Context, Result};

use crate::config::Config;
use crate::models::{DbConfig, RegionMap};

/// Name of the portal session cookie.
const SESSION_COOKIE: &str = "session";

/// Client for the portal's JSON endpoints.
pub struct SariClient {
    http: reqwest::Client,
    base_url: String,
    session_token: Option<String>,
}

impl SariClient {
    /// Build a client from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let base_url = config
            .base_url
            .clone()
            .context("No portal base URL configured. Pass --base-url or set it in config.toml.")?;
        Ok(Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            session_token: config.session_token.clone(),
        })
    }

    /// List all database instances the current user may access, grouped by
    /// region.
    pub async fn list_databases(&self) -> Result<RegionMap> {
        let resp = self.get("/api/databases").await?;
        resp.json().await.context("Failed to decode database list")
    }

    /// Fetch the connection parameters for one database.
    pub async fn db_config(&self, region: &str, db_id: &str, db_name: &str) -> Result<DbConfig> {
        let path = format!("/api/db_config/{}/{}/{}", region, db_id, db_name);
        let resp = self.get(&path).await?;
        resp.json()
            .await
            .context("Failed to decode connection parameters")
    }

    /// GET request against the portal (session cookie auth).
    async fn get(&self, path: &str) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("GET {}", url);

        let mut req = self.http.get(&url);
        if let Some(token) = &self.session_token {
            req = req.header("Cookie", format!("{}={}", SESSION_COOKIE, token));
        }

        let resp = req
            .send()
            .await
            .with_context(|| format!("GET {} failed", url))?;

        check_response(resp, &url).await
    }
}

/// Check HTTP response status code and return a clear error on failure.
async fn check_response(resp: reqwest::Response, url: &str) -> Result<reqwest::Response> {
    let status = resp.status();
    if status == reqwest::StatusCode::UNAUTHORIZED {
        bail!(
            "401 Unauthorized for {}. Session may have expired -- log in to the portal again.",
            url
        );
    }
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        bail!("HTTP {} for {}: {}", status.as_u16(), url, body);
    }
    Ok(resp)
}
