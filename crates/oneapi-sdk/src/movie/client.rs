//! `OneApiClient` - One API movie client implementation.

use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::{Client, Method};
use tokio::task::JoinHandle;
use tracing::{Instrument, instrument};
use url::Url;

use super::api::LocalMovieApi;
use super::params::{MovieParams, encode_fragment};
use super::types::MovieListResponse;
use crate::callback::{Callback, dispatch};
use crate::config::{Config, non_blank};
use crate::error::{OneApiError, Result};
use crate::pool::WorkerPool;

/// Default base URL for The One API v2.
const DEFAULT_BASE_URL: &str = "https://the-one-api.dev/v2/";

/// Path of the movie endpoint, relative to the base URL.
const MOVIE_PATH: &str = "movie";

/// Default number of worker threads for blocking and callback calls.
const DEFAULT_WORKER_THREADS: usize = 2;

/// User-Agent sent by the HTTP client built by default.
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// One API client.
///
/// Cheap to clone; clones share the HTTP client and the worker pool.
#[derive(Debug, Clone)]
#[allow(clippy::module_name_repetitions)]
pub struct OneApiClient {
    /// Resolved request state.
    inner: Arc<ClientInner>,
    /// Worker pool for blocking and callback calls.
    pool: Arc<WorkerPool>,
}

/// Immutable per-client request state.
struct ClientInner {
    /// HTTP client.
    http_client: Client,
    /// Absolute URL of the movie endpoint.
    movie_url: Url,
    /// Bearer API key.
    api_key: String,
    /// Log traffic at `info` instead of `debug`.
    log_traffic: bool,
}

impl fmt::Debug for ClientInner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientInner")
            .field("movie_url", &self.movie_url.as_str())
            .field("api_key", &"<redacted>")
            .field("log_traffic", &self.log_traffic)
            .finish_non_exhaustive()
    }
}

/// Builder for `OneApiClient`.
#[derive(Debug, Default)]
#[allow(clippy::module_name_repetitions)]
pub struct OneApiClientBuilder {
    config: Config,
    api_key: Option<String>,
    base_url: Option<Url>,
    http_client: Option<Client>,
    worker_threads: Option<usize>,
}

impl OneApiClientBuilder {
    /// Creates a new builder with an empty static configuration.
    fn new() -> Self {
        Self::default()
    }

    /// Creates a builder seeded with the default config file.
    ///
    /// Runtime options set afterwards still take precedence over the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the config path cannot be resolved or the file is invalid.
    pub fn from_default_config() -> Result<Self> {
        Self::from_config_dir(None)
    }

    /// Creates a builder seeded with `{dir}/config.toml`, or the default
    /// config file when `dir` is `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the config path cannot be resolved or the file is invalid.
    pub fn from_config_dir(dir: Option<&Path>) -> Result<Self> {
        Ok(Self::new().config(Config::load_from_dir(dir)?))
    }

    /// Sets the static configuration (API key fallback, traffic logging).
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Sets the API key; takes precedence over the config file.
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Uses an existing `reqwest::Client` instead of building one.
    #[must_use]
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Sets the number of worker threads (default: 2).
    #[must_use]
    pub const fn worker_threads(mut self, threads: usize) -> Self {
        self.worker_threads = Some(threads);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// Returns `OneApiError::Configuration` if:
    /// - no non-blank API key is set here or in the config,
    /// - the base URL cannot hold a path,
    /// - `worker_threads` is zero,
    /// - `reqwest::Client` or the worker pool fails to build.
    pub fn build(self) -> Result<OneApiClient> {
        let api_key = non_blank(self.api_key.as_deref())
            .or_else(|| self.config.api_key())
            .map(String::from)
            .ok_or_else(|| OneApiError::Configuration(String::from("No API key was provided")))?;

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            Url::parse(DEFAULT_BASE_URL).map_err(|e| {
                OneApiError::Configuration(format!("invalid default base URL: {e}"))
            })?
        };
        let movie_url = resolve_movie_url(base_url)?;

        let http_client = if let Some(client) = self.http_client {
            client
        } else {
            Client::builder()
                .user_agent(USER_AGENT)
                .gzip(true)
                .build()
                .map_err(|e| {
                    OneApiError::Configuration(format!("failed to build HTTP client: {e}"))
                })?
        };

        let pool = WorkerPool::new(self.worker_threads.unwrap_or(DEFAULT_WORKER_THREADS))?;
        let log_traffic = self.config.log_traffic();

        tracing::debug!(%movie_url, log_traffic, "One API client created");

        Ok(OneApiClient {
            inner: Arc::new(ClientInner {
                http_client,
                movie_url,
                api_key,
                log_traffic,
            }),
            pool: Arc::new(pool),
        })
    }
}

/// Joins the movie path onto `base`, adding the trailing slash `join` needs.
fn resolve_movie_url(mut base: Url) -> Result<Url> {
    if base.cannot_be_a_base() {
        return Err(OneApiError::Configuration(format!(
            "base URL cannot hold a path: {base}"
        )));
    }
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(MOVIE_PATH)
        .map_err(|e| OneApiError::Configuration(format!("failed to join movie path: {e}")))
}

impl OneApiClient {
    /// Creates a new builder.
    #[must_use]
    pub fn builder() -> OneApiClientBuilder {
        OneApiClientBuilder::new()
    }

    /// Builds a client from the default config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file is invalid or holds no API key.
    pub fn from_default_config() -> Result<Self> {
        OneApiClientBuilder::from_default_config()?.build()
    }

    /// Absolute URL of the movie endpoint.
    #[must_use]
    pub fn movie_url(&self) -> &Url {
        &self.inner.movie_url
    }

    /// Fetches movies, returning the HTTP status code alongside the response.
    ///
    /// # Errors
    ///
    /// Returns `OneApiError::Api`, `OneApiError::Transport` or `OneApiError::Decode`.
    pub async fn movies_with_status(
        &self,
        params: &MovieParams,
    ) -> Result<(u16, MovieListResponse)> {
        self.inner.fetch_movies(&params.to_query_list()).await
    }

    /// Fetches movies, blocking the calling thread until the exchange ends.
    ///
    /// # Errors
    ///
    /// Returns `OneApiError::Api`, `OneApiError::Transport` or `OneApiError::Decode`.
    ///
    /// # Panics
    ///
    /// Panics when called from within an asynchronous execution context;
    /// use [`LocalMovieApi::movies`] there instead.
    #[instrument(skip_all)]
    pub fn get_movies(&self, params: &MovieParams) -> Result<MovieListResponse> {
        tracing::info!("Fetching movies from One API service");
        let query = params.to_query_list();
        self.pool
            .block_on(self.inner.fetch_movies(&query))
            .map(|(_, data)| data)
    }

    /// Fetches movies on the worker pool and reports the outcome to `callback`.
    ///
    /// Returns immediately. The returned handle completes after the callback ran.
    /// The call keeps running even if every clone of the client is dropped.
    #[instrument(skip_all)]
    pub fn get_movies_with_callback<C>(&self, params: &MovieParams, callback: C) -> JoinHandle<()>
    where
        C: Callback<MovieListResponse>,
    {
        tracing::info!("Fetching movies from One API service");
        let inner = Arc::clone(&self.inner);
        // The task holds the pool so dropping the client cannot cancel it.
        let pool = Arc::clone(&self.pool);
        let query = params.to_query_list();
        self.pool.spawn(
            async move {
                let result = inner.fetch_movies(&query).await;
                dispatch(result, callback);
                drop(pool);
            }
            .in_current_span(),
        )
    }
}

impl ClientInner {
    /// Sends a GET request with Bearer auth to the movie endpoint.
    ///
    /// Every request of every call surface goes through here.
    #[instrument(skip_all)]
    async fn fetch_movies(&self, query: &[String]) -> Result<(u16, MovieListResponse)> {
        let mut url = self.movie_url.clone();
        let encoded: Vec<String> = query.iter().map(String::as_str).map(encode_fragment).collect();
        url.set_query(Some(&encoded.join("&")));

        let request = self
            .http_client
            .get(url)
            .bearer_auth(&self.api_key)
            .build()
            .map_err(OneApiError::Transport)?;

        log_request(self.log_traffic, request.method(), request.url());
        let started = Instant::now();

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(OneApiError::Transport)?;

        let status = response.status().as_u16();
        log_response(self.log_traffic, status, response.url(), started.elapsed());

        if !response.status().is_success() {
            return Err(OneApiError::Api { status });
        }

        let body = response.text().await.map_err(OneApiError::Transport)?;
        let parsed = serde_json::from_str(&body).map_err(OneApiError::Decode)?;
        Ok((status, parsed))
    }
}

/// Logs an outgoing request.
fn log_request(log_traffic: bool, method: &Method, url: &Url) {
    if log_traffic {
        tracing::info!(%method, %url, "--> request");
    } else {
        tracing::debug!(%method, %url, "--> request");
    }
}

/// Logs a received response.
fn log_response(log_traffic: bool, status: u16, url: &Url, elapsed: Duration) {
    let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
    if log_traffic {
        tracing::info!(status, %url, elapsed_ms, "<-- response");
    } else {
        tracing::debug!(status, %url, elapsed_ms, "<-- response");
    }
}

impl LocalMovieApi for OneApiClient {
    #[instrument(skip_all)]
    async fn movies(&self, params: &MovieParams) -> Result<MovieListResponse> {
        self.movies_with_status(params)
            .await
            .map(|(_, data)| data)
    }
}
