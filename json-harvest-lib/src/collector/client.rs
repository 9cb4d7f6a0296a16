//! GitHub REST API client

use super::RepoPath;
use ohno::IntoAppError;
use reqwest::header::HeaderMap;

const LOG_TARGET: &str = "    client";

/// HTTP client scoped to one repository's API prefix.
#[derive(Debug, Clone)]
#[expect(clippy::struct_field_names, reason = "client field stores the underlying HTTP client")]
pub struct Client {
    client: reqwest::Client,
    base_url: String,
}

impl Client {
    /// Create a client for `repo` with an optional authentication token
    pub fn new(token: Option<&str>, api_url: &str, repo: &RepoPath) -> crate::Result<Self> {
        use reqwest::header::{AUTHORIZATION, HeaderValue};

        let mut client_builder = reqwest::Client::builder().user_agent("json-harvest");

        if let Some(t) = token {
            let mut auth_val = HeaderValue::from_str(&format!("token {t}"))?;
            auth_val.set_sensitive(true);

            let mut headers = HeaderMap::new();
            let _ = headers.insert(AUTHORIZATION, auth_val);

            client_builder = client_builder.default_headers(headers);
            log::info!(target: LOG_TARGET, "using access token [{}]", "*".repeat(t.len()));
        } else {
            log::info!(target: LOG_TARGET, "using no GitHub authentication");
        }

        Ok(Self {
            client: client_builder.build().into_app_err("unable to create HTTP client")?,
            base_url: format!("{}/repos/{repo}", api_url.trim_end_matches('/')),
        })
    }

    /// URL prefix every request suffix is appended to
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue a GET for `base_url + suffix`, returning the status code and the raw body.
    ///
    /// Non-success statuses are not errors here; callers decide what they mean.
    pub async fn get(&self, suffix: &str) -> crate::Result<(u16, Vec<u8>)> {
        let url = format!("{}{suffix}", self.base_url);
        log::debug!(target: LOG_TARGET, " ~> issuing request [{url}]");

        let resp = self.client.get(&url).send().await.into_app_err_with(|| format!("requesting '{url}'"))?;
        let status = resp.status().as_u16();
        let body = resp.bytes().await.into_app_err_with(|| format!("reading response body from '{url}'"))?;

        Ok((status, body.to_vec()))
    }
}
