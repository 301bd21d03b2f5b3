//! Construction-time settings for [`crate::InspectorClient`].

use serde::{Deserialize, Serialize};

use crate::routes::RouteLayout;

/// Tunnel address the backend is published on by default.
pub const DEFAULT_BASE_URL: &str = "https://bistered-gaylord-contorted.ngrok-free.dev";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub routes: RouteLayout,
}

fn default_base_url() -> String { DEFAULT_BASE_URL.to_string() }

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            routes: RouteLayout::default(),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), ..Self::default() }
    }

    pub fn with_routes(mut self, routes: RouteLayout) -> Self {
        self.routes = routes;
        self
    }
}
