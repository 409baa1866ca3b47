//! Main MediaClient

use std::sync::Arc;
use std::sync::PoisonError;
use std::sync::RwLock;
use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use url::Url;

use crate::cache::CacheConfig;
use crate::cache::KeyValueStore;
use crate::cache::MemoryStore;
use crate::cache::Params;
use crate::cache::RequestCache;
use crate::cache::ResponseCache;
use crate::cache::Sweeper;
use crate::error::ApiError;
use crate::error::ConfigError;
use crate::error::Error;
use crate::response::Response;

const DEFAULT_STREAM_URL: &str = "https://pipedapi.kavin.rocks";
const DEFAULT_JIKAN_URL: &str = "https://api.jikan.moe/v4";
const DEFAULT_CONSUMET_URL: &str = "https://api.consumet.org";
const DEFAULT_HIANIME_URL: &str = "https://aniwatch-api.vercel.app/api/v2/hianime";

/// Language and region settings applied to upstream requests.
///
/// Cached payloads depend on these, so changing them through
/// [`MediaClient::update_settings`] clears the request cache.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    /// UI language hint forwarded to sources that honor it.
    pub language: Option<String>,
    /// Region code forwarded to sources that honor it.
    pub region: Option<String>,
}

/// The unified client for all supported media APIs.
///
/// Cheap to clone (`Arc` inside) and safe to share across tasks. Reads to
/// the same endpoint and parameters are deduplicated through an in-memory
/// TTL cache; HiAnime responses additionally persist through the configured
/// key-value store.
///
/// # Example
///
/// ```ignore
/// use mediadex_lib::MediaClient;
///
/// let client = MediaClient::builder()
///     .hianime_api_key("secret")
///     .build()?;
///
/// let results = client.search_anime("frieren").await?;
/// for media in results.data() {
///     println!("{} -> {}", media.title, media.canonical_url);
/// }
/// ```
#[derive(Clone)]
pub struct MediaClient {
    pub(crate) inner: Arc<MediaClientInner>,
}

impl std::fmt::Debug for MediaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaClient")
            .field("jikan_url", &self.inner.jikan_url)
            .field("stream_url", &self.inner.stream_url)
            .field("consumet_url", &self.inner.consumet_url)
            .field("hianime_url", &self.inner.hianime_url)
            .finish_non_exhaustive()
    }
}

pub(crate) struct MediaClientInner {
    pub(crate) stream_url: String,
    pub(crate) jikan_url: String,
    pub(crate) consumet_url: String,
    pub(crate) hianime_url: String,
    pub(crate) api_key: Option<String>,
    pub(crate) http_client: Client,
    pub(crate) timeout: Option<Duration>,
    pub(crate) cache_config: CacheConfig,
    pub(crate) request_cache: Arc<RequestCache<Value>>,
    pub(crate) response_cache: ResponseCache,
    pub(crate) settings: RwLock<Settings>,
}

impl MediaClient {
    /// Creates a new builder for constructing a client.
    pub fn builder() -> MediaClientBuilder {
        MediaClientBuilder::new()
    }

    /// Returns the current language/region settings.
    pub fn settings(&self) -> Settings {
        self.inner
            .settings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replaces the language/region settings.
    ///
    /// When the settings actually change, the request cache is cleared:
    /// entries fetched under the old settings no longer describe what the
    /// same call would return.
    pub fn update_settings(&self, settings: Settings) {
        let mut guard = self
            .inner
            .settings
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if *guard != settings {
            *guard = settings;
            drop(guard);
            self.inner.request_cache.clear();
        }
    }

    /// Clears the in-memory request cache.
    pub fn clear_request_cache(&self) {
        self.inner.request_cache.clear();
    }

    /// Spawns the periodic background sweeper for the request cache, using
    /// the configured sweep interval.
    ///
    /// Must be called from within a tokio runtime. The sweeper stops when
    /// the returned handle is shut down or dropped.
    pub fn spawn_sweeper(&self) -> Sweeper {
        Sweeper::spawn(
            Arc::clone(&self.inner.request_cache),
            self.inner.cache_config.sweep_interval,
        )
    }

    /// Parameters derived from the current settings, for sources that honor
    /// them.
    pub(crate) fn base_params(&self) -> Params {
        let settings = self.settings();
        Params::new()
            .with_opt("hl", settings.language)
            .with_opt("region", settings.region)
    }

    /// Returns the configured HiAnime API key, or a configuration error.
    pub(crate) fn require_api_key(&self) -> Result<&str, Error> {
        self.inner
            .api_key
            .as_deref()
            .ok_or_else(|| ConfigError::MissingApiKey { service: "hianime" }.into())
    }

    /// Performs a GET request and parses the body as JSON.
    ///
    /// Non-success statuses surface as [`ApiError::Http`] with the body as
    /// the message; they are never cached by the layers above.
    pub(crate) async fn fetch_json(&self, url: &str, api_key: Option<&str>) -> Result<Value, Error> {
        let mut request = self.inner.http_client.get(url);
        if let Some(key) = api_key {
            request = request.header("x-api-key", key);
        }
        if let Some(timeout) = self.inner.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(ApiError::from)?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(Error::Api(ApiError::http(status.as_u16(), message)));
        }

        let value = response
            .json::<Value>()
            .await
            .map_err(|err| ApiError::parse(format!("invalid JSON response: {}", err)))?;
        Ok(value)
    }

    /// Request-cache-backed GET: joins an in-flight fetch for the same key
    /// or fetches and caches the raw JSON payload.
    pub(crate) async fn cached_get(
        &self,
        endpoint: &str,
        params: &Params,
        url: String,
    ) -> Result<Response<Value>, Error> {
        let client = self.clone();
        self.inner
            .request_cache
            .get(endpoint, params, move || async move {
                client.fetch_json(&url, None).await
            })
            .await
            .map_err(Error::from_shared)
    }
}

/// Builder for constructing a [`MediaClient`].
///
/// Every field has a default; the HiAnime API key is only required at call
/// time by the HiAnime operations.
pub struct MediaClientBuilder {
    stream_url: String,
    jikan_url: String,
    consumet_url: String,
    hianime_url: String,
    api_key: Option<String>,
    http_client: Option<Client>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    cache_config: CacheConfig,
    store: Option<Arc<dyn KeyValueStore>>,
    settings: Settings,
}

impl MediaClientBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            stream_url: DEFAULT_STREAM_URL.to_string(),
            jikan_url: DEFAULT_JIKAN_URL.to_string(),
            consumet_url: DEFAULT_CONSUMET_URL.to_string(),
            hianime_url: DEFAULT_HIANIME_URL.to_string(),
            api_key: None,
            http_client: None,
            timeout: None,
            connect_timeout: None,
            cache_config: CacheConfig::default(),
            store: None,
            settings: Settings::default(),
        }
    }

    /// Sets the stream video API base URL.
    pub fn stream_url(mut self, url: impl Into<String>) -> Self {
        self.stream_url = url.into();
        self
    }

    /// Sets the Jikan API base URL.
    pub fn jikan_url(mut self, url: impl Into<String>) -> Self {
        self.jikan_url = url.into();
        self
    }

    /// Sets the Consumet API base URL.
    pub fn consumet_url(mut self, url: impl Into<String>) -> Self {
        self.consumet_url = url.into();
        self
    }

    /// Sets the HiAnime API base URL.
    pub fn hianime_url(mut self, url: impl Into<String>) -> Self {
        self.hianime_url = url.into();
        self
    }

    /// Sets the HiAnime API key.
    ///
    /// HiAnime operations fail with a configuration error when no key is
    /// set.
    pub fn hianime_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout.
    ///
    /// Applied when building the default HTTP client; ignored when a custom
    /// client is supplied.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets a custom HTTP client.
    ///
    /// This is also the seam for offline or mock transports in tests and
    /// demos.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Sets the cache TTLs and sweep interval.
    pub fn cache_config(mut self, config: CacheConfig) -> Self {
        self.cache_config = config;
        self
    }

    /// Sets the key-value store backing the durable HiAnime response cache.
    ///
    /// Defaults to an in-memory store; use
    /// [`SqliteStore`](crate::cache::SqliteStore) for persistence across
    /// restarts.
    pub fn store(mut self, store: impl KeyValueStore + 'static) -> Self {
        self.store = Some(Arc::new(store));
        self
    }

    /// Sets the initial language/region settings.
    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Builds the [`MediaClient`], validating every base URL.
    pub fn build(self) -> Result<MediaClient, ConfigError> {
        validate_url("stream", &self.stream_url)?;
        validate_url("jikan", &self.jikan_url)?;
        validate_url("consumet", &self.consumet_url)?;
        validate_url("hianime", &self.hianime_url)?;

        let http_client = self.http_client.unwrap_or_else(|| {
            let mut builder = Client::builder();
            if let Some(timeout) = self.connect_timeout {
                builder = builder.connect_timeout(timeout);
            }
            builder.build().expect("Failed to build HTTP client")
        });

        let store = self
            .store
            .unwrap_or_else(|| Arc::new(MemoryStore::new()) as Arc<dyn KeyValueStore>);

        let request_cache = Arc::new(RequestCache::new(self.cache_config.request_ttl));
        let response_cache = ResponseCache::new(store, self.cache_config.response_ttl);

        Ok(MediaClient {
            inner: Arc::new(MediaClientInner {
                stream_url: trim_base(self.stream_url),
                jikan_url: trim_base(self.jikan_url),
                consumet_url: trim_base(self.consumet_url),
                hianime_url: trim_base(self.hianime_url),
                api_key: self.api_key,
                http_client,
                timeout: self.timeout,
                cache_config: self.cache_config,
                request_cache,
                response_cache,
                settings: RwLock::new(self.settings),
            }),
        })
    }
}

impl Default for MediaClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_url(service: &'static str, url: &str) -> Result<(), ConfigError> {
    Url::parse(url).map_err(|_| ConfigError::InvalidBaseUrl {
        service,
        url: url.to_string(),
    })?;
    Ok(())
}

fn trim_base(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
