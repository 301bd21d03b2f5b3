//! Route table: maps each named operation to an [`Endpoint`].
//!
//! Building an endpoint is pure. Every dynamic path segment and query value
//! goes through [`encode`], so reserved characters never leak into the URL.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::ClientError;

/// Which of the backend's two routing tables to target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteLayout {
    /// Flat `/model/<action>` paths, parameters in the query string.
    #[default]
    Query,
    /// `/model/layer/{layer}/<action>` paths, mutations carry a JSON body.
    Nested,
}

impl RouteLayout {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteLayout::Query => "query",
            RouteLayout::Nested => "nested",
        }
    }
}

impl std::str::FromStr for RouteLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "query" => Ok(RouteLayout::Query),
            "nested" => Ok(RouteLayout::Nested),
            other => Err(format!("unknown route layout '{other}' (expected 'query' or 'nested')")),
        }
    }
}

/// One request, ready for the executor.
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
    pub method: Method,
    /// Path plus query string, appended verbatim to the base URL.
    pub path: String,
    pub body: Option<serde_json::Value>,
}

impl Endpoint {
    fn get(path: String) -> Self {
        Self { method: Method::GET, path, body: None }
    }

    fn post(path: String) -> Self {
        Self { method: Method::POST, path, body: None }
    }

    fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Percent-encode one path segment or query value.
pub fn encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Build `?k=v&k=v` with every value encoded. Keys are static and already safe.
fn query(pairs: &[(&str, &str)]) -> String {
    let joined = pairs
        .iter()
        .map(|(k, v)| format!("{}={}", k, encode(v)))
        .collect::<Vec<_>>()
        .join("&");
    format!("?{joined}")
}

pub fn health_check() -> Endpoint {
    Endpoint::get("/main/".to_string())
}

pub fn backend_info() -> Endpoint {
    Endpoint::get("/main/info".to_string())
}

pub fn load_model(_layout: RouteLayout, model: &str) -> Endpoint {
    Endpoint::post(format!("/model/load{}", query(&[("model", model)])))
}

pub fn reset_model(layout: RouteLayout, model: &str) -> Endpoint {
    match layout {
        RouteLayout::Query => Endpoint::post(format!("/model/reset{}", query(&[("model", model)]))),
        RouteLayout::Nested => Endpoint::post("/model/reset".to_string()).with_body(json!({ "model": model })),
    }
}

pub fn architecture(_layout: RouteLayout, model: &str) -> Endpoint {
    Endpoint::get(format!("/model/architecture{}", query(&[("model", model)])))
}

pub fn layer_names(_layout: RouteLayout, model: &str) -> Endpoint {
    Endpoint::get(format!("/model/layers{}", query(&[("model", model)])))
}

pub fn generate(_layout: RouteLayout, model: &str, prompt: &str) -> Endpoint {
    Endpoint::get(format!(
        "/model/generate{}",
        query(&[("model", model), ("prompt", prompt)])
    ))
}

/// Per-layer read endpoints share one shape in each layout.
fn layer_read(layout: RouteLayout, action: &str, model: &str, layer: &str) -> Endpoint {
    match layout {
        RouteLayout::Query => Endpoint::get(format!(
            "/model/{action}{}",
            query(&[("model", model), ("layer_name", layer)])
        )),
        RouteLayout::Nested => Endpoint::get(format!(
            "/model/layer/{}/{action}{}",
            encode(layer),
            query(&[("model", model)])
        )),
    }
}

pub fn activations(layout: RouteLayout, model: &str, layer: &str) -> Endpoint {
    layer_read(layout, "activations", model, layer)
}

pub fn biases(layout: RouteLayout, model: &str, layer: &str) -> Endpoint {
    layer_read(layout, "biases", model, layer)
}

pub fn input_avgs(layout: RouteLayout, model: &str, layer: &str) -> Endpoint {
    layer_read(layout, "input-avgs", model, layer)
}

pub fn input_stds(layout: RouteLayout, model: &str, layer: &str) -> Endpoint {
    layer_read(layout, "input-stds", model, layer)
}

pub fn set_neuron_bias(
    layout: RouteLayout,
    model: &str,
    layer: &str,
    neuron_index: usize,
    bias_value: f64,
) -> Result<Endpoint, ClientError> {
    // JSON has no NaN/inf; reject them for both layouts alike.
    if !bias_value.is_finite() {
        return Err(ClientError::InvalidArgument {
            name: "bias_value",
            reason: format!("must be finite, got {bias_value}"),
        });
    }
    let endpoint = match layout {
        RouteLayout::Query => Endpoint::post(format!(
            "/model/set-neuron-bias{}",
            query(&[
                ("model", model),
                ("layer_name", layer),
                ("neuron_index", &neuron_index.to_string()),
                ("bias_value", &bias_value.to_string()),
            ])
        )),
        RouteLayout::Nested => Endpoint::post(format!(
            "/model/layer/{}/bias/{neuron_index}/set",
            encode(layer)
        ))
        .with_body(json!({ "model": model, "bias_value": bias_value })),
    };
    Ok(endpoint)
}

pub fn set_timestep(layout: RouteLayout, model: &str, index: u64) -> Endpoint {
    match layout {
        RouteLayout::Query => Endpoint::post(format!(
            "/model/timestep{}",
            query(&[("model", model), ("index", &index.to_string())])
        )),
        RouteLayout::Nested => Endpoint::post("/model/timestep/set".to_string())
            .with_body(json!({ "model": model, "index": index })),
    }
}
