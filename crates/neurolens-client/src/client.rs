//! Inspection client: the shared request executor and the named operations.
//!
//! All operations funnel through [`InspectorClient::fetch_json`], which owns
//! header merging, status/content-type validation, JSON decoding and failure
//! logging. The operations themselves only pick an [`Endpoint`] from
//! [`crate::routes`] and a response projection from [`crate::responses`].

use std::sync::{OnceLock, PoisonError, RwLock};

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use serde::de::DeserializeOwned;
use tracing::{debug, error, instrument};

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::responses::*;
use crate::routes::{self, Endpoint, RouteLayout};

/// Header the tunnelling proxy checks to skip its interstitial page.
pub const TUNNEL_BYPASS_HEADER: &str = "ngrok-skip-browser-warning";
pub const TUNNEL_BYPASS_VALUE: &str = "69420";

const JSON_MEDIA_TYPE: &str = "application/json";

// ── Request options ──────────────────────────────────────────────────────────

/// Per-call overrides for [`InspectorClient::fetch_json`].
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Defaults to GET.
    pub method: Method,
    pub body: Option<serde_json::Value>,
    /// Merged over the default headers, replacing by key.
    pub headers: HeaderMap,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

impl From<Endpoint> for RequestOptions {
    fn from(ep: Endpoint) -> Self {
        Self { method: ep.method, body: ep.body, headers: HeaderMap::new() }
    }
}

/// Headers sent with every request unless the caller overrides them.
pub fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static(TUNNEL_BYPASS_HEADER),
        HeaderValue::from_static(TUNNEL_BYPASS_VALUE),
    );
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_MEDIA_TYPE));
    headers
}

// ── Trait ────────────────────────────────────────────────────────────────────

/// The named operations of the inspection backend.
#[async_trait]
pub trait ModelInspector: Send + Sync {
    async fn load_model(&self, model: &str) -> Result<Envelope>;
    async fn reset_model(&self, model: &str) -> Result<Envelope>;
    async fn get_architecture(&self, model: &str) -> Result<serde_json::Value>;
    async fn get_layer_names(&self, model: &str) -> Result<Vec<String>>;
    async fn generate_output(&self, model: &str, prompt: &str) -> Result<String>;
    async fn get_layer_activations(&self, model: &str, layer_name: &str) -> Result<serde_json::Value>;
    async fn get_layer_biases(&self, model: &str, layer_name: &str) -> Result<Envelope>;
    async fn get_layer_input_avgs(&self, model: &str, layer_name: &str) -> Result<serde_json::Value>;
    async fn get_layer_input_stds(&self, model: &str, layer_name: &str) -> Result<serde_json::Value>;
    async fn set_neuron_bias(
        &self,
        model: &str,
        layer_name: &str,
        neuron_index: usize,
        bias_value: f64,
    ) -> Result<String>;
    async fn set_timestep(&self, model: &str, index: u64) -> Result<u64>;
    async fn health_check(&self) -> Result<HealthStatus>;
    async fn backend_info(&self) -> Result<BackendInfo>;
}

// ── Client ───────────────────────────────────────────────────────────────────

pub struct InspectorClient {
    base_url: RwLock<String>,
    routes: RouteLayout,
    http: reqwest::Client,
}

static SHARED: OnceLock<InspectorClient> = OnceLock::new();

impl InspectorClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            base_url: RwLock::new(config.base_url),
            routes: config.routes,
            http: reqwest::Client::new(),
        }
    }

    /// Process-wide client, built with [`ClientConfig::default`] on first use.
    pub fn shared() -> &'static InspectorClient {
        SHARED.get_or_init(|| InspectorClient::new(ClientConfig::default()))
    }

    pub fn base_url(&self) -> String {
        self.base_url.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Applies to requests started after this call returns.
    pub fn set_base_url(&self, base_url: impl Into<String>) {
        let base_url = base_url.into();
        debug!(base_url = %base_url, "Base URL updated");
        *self.base_url.write().unwrap_or_else(PoisonError::into_inner) = base_url;
    }

    pub fn routes(&self) -> RouteLayout {
        self.routes
    }

    /// Perform one round trip against `base_url + path` and decode the JSON body.
    ///
    /// Fails with [`ClientError`] on transport failure, non-2xx status, a
    /// missing or non-JSON content type, or an undecodable body. Each failure
    /// is logged once before it is returned.
    pub async fn fetch_json<T: DeserializeOwned>(&self, path: &str, options: RequestOptions) -> Result<T> {
        let url = format!("{}{}", self.base_url(), path);
        self.execute(&url, options).await.inspect_err(|e| {
            error!(url = %url, kind = e.kind().as_str(), "Error connecting to backend: {e}");
        })
    }

    async fn execute<T: DeserializeOwned>(&self, url: &str, options: RequestOptions) -> Result<T> {
        let mut headers = default_headers();
        headers.extend(options.headers);

        debug!(method = %options.method, url, "Backend request");
        let mut req = self.http.request(options.method, url).headers(headers);
        if let Some(body) = options.body {
            req = req.body(body.to_string());
        }

        let resp = req.send().await.map_err(|source| ClientError::Connectivity {
            url: url.to_string(),
            source,
        })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ClientError::Http { status: status.as_u16(), url: url.to_string() });
        }

        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned());
        let is_json = content_type
            .as_deref()
            .is_some_and(|ct| ct.to_ascii_lowercase().contains(JSON_MEDIA_TYPE));
        if !is_json {
            return Err(ClientError::Format { content_type, url: url.to_string() });
        }

        let bytes = resp.bytes().await.map_err(|source| ClientError::Connectivity {
            url: url.to_string(),
            source,
        })?;
        debug!(status = status.as_u16(), bytes = bytes.len(), "Backend response");

        serde_json::from_slice(&bytes).map_err(|source| ClientError::Decode {
            url: url.to_string(),
            source,
        })
    }

    async fn send<T: DeserializeOwned>(&self, endpoint: Endpoint) -> Result<T> {
        let path = endpoint.path.clone();
        self.fetch_json(&path, endpoint.into()).await
    }

    async fn project<P>(&self, endpoint: Endpoint) -> Result<P::Output>
    where
        P: Projection + DeserializeOwned,
    {
        let envelope: P = self.send(endpoint).await?;
        Ok(envelope.into_output())
    }
}

impl Default for InspectorClient {
    fn default() -> Self { Self::new(ClientConfig::default()) }
}

impl std::fmt::Debug for InspectorClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InspectorClient")
            .field("base_url", &self.base_url())
            .field("routes", &self.routes)
            .finish()
    }
}

#[async_trait]
impl ModelInspector for InspectorClient {
    #[instrument(skip(self))]
    async fn load_model(&self, model: &str) -> Result<Envelope> {
        self.send(routes::load_model(self.routes, model)).await
    }

    #[instrument(skip(self))]
    async fn reset_model(&self, model: &str) -> Result<Envelope> {
        self.send(routes::reset_model(self.routes, model)).await
    }

    #[instrument(skip(self))]
    async fn get_architecture(&self, model: &str) -> Result<serde_json::Value> {
        self.project::<ArchitectureResponse>(routes::architecture(self.routes, model)).await
    }

    #[instrument(skip(self))]
    async fn get_layer_names(&self, model: &str) -> Result<Vec<String>> {
        self.project::<LayersResponse>(routes::layer_names(self.routes, model)).await
    }

    #[instrument(skip(self, prompt), fields(prompt_len = prompt.len()))]
    async fn generate_output(&self, model: &str, prompt: &str) -> Result<String> {
        self.project::<GeneratedResponse>(routes::generate(self.routes, model, prompt)).await
    }

    #[instrument(skip(self))]
    async fn get_layer_activations(&self, model: &str, layer_name: &str) -> Result<serde_json::Value> {
        self.project::<ActivationsResponse>(routes::activations(self.routes, model, layer_name)).await
    }

    #[instrument(skip(self))]
    async fn get_layer_biases(&self, model: &str, layer_name: &str) -> Result<Envelope> {
        self.send(routes::biases(self.routes, model, layer_name)).await
    }

    #[instrument(skip(self))]
    async fn get_layer_input_avgs(&self, model: &str, layer_name: &str) -> Result<serde_json::Value> {
        self.project::<InputAvgsResponse>(routes::input_avgs(self.routes, model, layer_name)).await
    }

    #[instrument(skip(self))]
    async fn get_layer_input_stds(&self, model: &str, layer_name: &str) -> Result<serde_json::Value> {
        self.project::<InputStdsResponse>(routes::input_stds(self.routes, model, layer_name)).await
    }

    #[instrument(skip(self))]
    async fn set_neuron_bias(
        &self,
        model: &str,
        layer_name: &str,
        neuron_index: usize,
        bias_value: f64,
    ) -> Result<String> {
        let ep = routes::set_neuron_bias(self.routes, model, layer_name, neuron_index, bias_value)
            .inspect_err(|e| error!(kind = e.kind().as_str(), "Refusing to send request: {e}"))?;
        self.project::<BiasStatusResponse>(ep).await
    }

    #[instrument(skip(self))]
    async fn set_timestep(&self, model: &str, index: u64) -> Result<u64> {
        self.project::<TimestepResponse>(routes::set_timestep(self.routes, model, index)).await
    }

    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<HealthStatus> {
        self.send(routes::health_check()).await
    }

    #[instrument(skip(self))]
    async fn backend_info(&self) -> Result<BackendInfo> {
        self.send(routes::backend_info()).await
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
