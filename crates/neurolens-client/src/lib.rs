//! neurolens-client — request client for the model-inspection backend.
//!
//! One executor ([`InspectorClient::fetch_json`]) performs every round trip;
//! the named operations of [`ModelInspector`] are thin encoding shims over it.

pub mod client;
pub mod config;
pub mod error;
pub mod responses;
pub mod routes;

pub use client::{default_headers, InspectorClient, ModelInspector, RequestOptions};
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use error::{ClientError, ErrorKind, Result};
pub use responses::{BackendInfo, Envelope, HealthStatus};
pub use routes::{Endpoint, RouteLayout};
