//! `TmdbClient` - TMDB API client implementation.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use reqwest::{Client, RequestBuilder};
use tokio::sync::Mutex;
use tracing::instrument;
use url::Url;

use super::api::LocalTmdbApi;
use super::rate_limiter::TmdbRateLimiter;
use super::types::{
    DiscoverTvParams, TmdbDiscoverTvResponse, TmdbErrorResponse, TmdbGenreListResponse,
    TmdbKeywordSearchResponse, TmdbTvDetails,
};

/// Default base URL for TMDB API v3.
const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/";

/// Maximum number of retries for HTTP 429 responses.
const MAX_RETRIES: u32 = 3;

/// Backoff duration between retries.
const RETRY_BACKOFF: Duration = Duration::from_secs(1);

/// TMDB credential.
///
/// v3 API keys travel as the `api_key` query parameter, v4 read access
/// tokens as a bearer header.
#[derive(Clone, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub enum TmdbCredential {
    /// v3 API key.
    ApiKey(String),
    /// v4 read access token.
    BearerToken(String),
}

impl TmdbCredential {
    /// Attaches the credential to a request.
    fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            Self::ApiKey(key) => request.query(&[("api_key", key.as_str())]),
            Self::BearerToken(token) => request.bearer_auth(token),
        }
    }
}

impl fmt::Debug for TmdbCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ApiKey(_) => f.write_str("ApiKey(<redacted>)"),
            Self::BearerToken(_) => f.write_str("BearerToken(<redacted>)"),
        }
    }
}

/// TMDB API client.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests.
    base_url: Url,
    /// API credential.
    credential: TmdbCredential,
    /// Rate limiter.
    rate_limiter: Arc<Mutex<TmdbRateLimiter>>,
}

/// Builder for `TmdbClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClientBuilder {
    base_url: Option<Url>,
    credential: Option<TmdbCredential>,
    user_agent: Option<String>,
    min_interval: Option<Duration>,
}

impl TmdbClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            credential: None,
            user_agent: None,
            min_interval: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the credential (required).
    #[must_use]
    pub fn credential(mut self, credential: TmdbCredential) -> Self {
        self.credential = Some(credential);
        self
    }

    /// Shorthand for a v3 API key credential.
    #[must_use]
    pub fn api_key(self, key: impl Into<String>) -> Self {
        self.credential(TmdbCredential::ApiKey(key.into()))
    }

    /// Shorthand for a v4 bearer token credential.
    #[must_use]
    pub fn api_token(self, token: impl Into<String>) -> Self {
        self.credential(TmdbCredential::BearerToken(token.into()))
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the minimum request interval (default: 25ms).
    #[must_use]
    pub const fn min_interval(mut self, interval: Duration) -> Self {
        self.min_interval = Some(interval);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - no credential is set.
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<TmdbClient> {
        let credential = self.credential.context("TMDB credential is required")?;
        let user_agent = self.user_agent.context("user_agent is required")?;

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            let result = Url::parse(DEFAULT_BASE_URL);
            result.context("invalid default base URL")?
        };

        let rate_limiter = self
            .min_interval
            .map_or_else(TmdbRateLimiter::default_interval, TmdbRateLimiter::new);

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .build()
            .context("failed to build HTTP client")?;

        Ok(TmdbClient {
            http_client,
            base_url,
            credential,
            rate_limiter: Arc::new(Mutex::new(rate_limiter)),
        })
    }
}

impl TmdbClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> TmdbClientBuilder {
        TmdbClientBuilder::new()
    }

    /// Sends an authenticated, rate-limited GET request and decodes JSON.
    /// Retries up to `MAX_RETRIES` times on HTTP 429.
    #[instrument(skip_all, fields(path = path))]
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        self.rate_limiter.lock().await.wait().await;

        let url = self
            .base_url
            .join(path)
            .with_context(|| format!("failed to join URL path: {path}"))?;

        let mut retries = 0u32;
        loop {
            let builder = self.http_client.get(url.clone()).query(query);
            let request = self
                .credential
                .apply(builder)
                .build()
                .with_context(|| format!("failed to build request: {path}"))?;

            tracing::debug!(path = path, params = query.len(), "TMDB API request");

            let result = self.http_client.execute(request).await;
            let response = result.with_context(|| format!("request failed: {path}"))?;

            let status = response.status();

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                retries = retries.saturating_add(1);
                if retries > MAX_RETRIES {
                    bail!("TMDB API rate limit exceeded after {MAX_RETRIES} retries: {path}");
                }
                tracing::warn!(
                    retry = retries,
                    max_retries = MAX_RETRIES,
                    "TMDB API rate limited (429). Retrying..."
                );
                tokio::time::sleep(RETRY_BACKOFF.saturating_mul(retries)).await;
                self.rate_limiter.lock().await.wait().await;
                continue;
            }

            if !status.is_success() {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| String::from("<failed to read body>"));
                if let Ok(error_response) = serde_json::from_str::<TmdbErrorResponse>(&body) {
                    bail!(
                        "TMDB API error (HTTP {}): code={}, message={}",
                        status,
                        error_response.status_code,
                        error_response.status_message,
                    );
                }
                bail!("TMDB API error (HTTP {status}): {body}");
            }

            let body = response
                .text()
                .await
                .with_context(|| format!("failed to read response body: {path}"))?;
            let raw_result: std::result::Result<T, _> = serde_json::from_str(&body);
            let parsed =
                raw_result.with_context(|| format!("failed to decode JSON response: {path}"))?;
            return Ok(parsed);
        }
    }
}

impl LocalTmdbApi for TmdbClient {
    #[instrument(skip_all)]
    async fn tv_genres(&self) -> Result<TmdbGenreListResponse> {
        self.get_json("genre/tv/list", &[]).await
    }

    #[instrument(skip_all)]
    async fn search_keywords(&self, query: &str) -> Result<TmdbKeywordSearchResponse> {
        let params = [("query", String::from(query))];
        self.get_json("search/keyword", &params).await
    }

    #[instrument(skip_all, fields(series_id = series_id))]
    async fn tv_details(&self, series_id: u64) -> Result<TmdbTvDetails> {
        let path = format!("tv/{series_id}");
        let params = [("append_to_response", String::from("keywords"))];
        self.get_json(&path, &params).await
    }

    #[instrument(skip_all)]
    async fn discover_tv(&self, params: &DiscoverTvParams) -> Result<TmdbDiscoverTvResponse> {
        self.get_json("discover/tv", &params.to_query()).await
    }
}
