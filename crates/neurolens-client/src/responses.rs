//! Response shapes returned by the inspection backend.
//!
//! Each named operation decodes the envelope into one of the `*Response`
//! records below and hands back only the projected field. A missing or
//! mistyped field fails the decode instead of yielding an empty value.

use serde::{Deserialize, Serialize};

/// A whole response envelope, for operations without a projection.
///
/// Load, reset and the bias read return this unmodified: the backend fills
/// `status` with whatever its loader returned, including `null`.
pub type Envelope = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendInfo {
    pub app: String,
    pub version: String,
    #[serde(default)]
    pub description: String,
}

// ── Projections ──────────────────────────────────────────────────────────────

/// Envelope shape that yields a single field.
pub(crate) trait Projection {
    type Output;
    fn into_output(self) -> Self::Output;
}

macro_rules! projection {
    ($name:ident, $field:ident: $ty:ty) => {
        #[derive(Debug, Deserialize)]
        pub(crate) struct $name {
            $field: $ty,
        }

        impl Projection for $name {
            type Output = $ty;
            fn into_output(self) -> $ty {
                self.$field
            }
        }
    };
}

projection!(ArchitectureResponse, architecture: serde_json::Value);
projection!(LayersResponse, layers: Vec<String>);
projection!(GeneratedResponse, generated: String);
// Per-neuron statistics keep the backend's nesting (flat per neuron, or per
// token then per neuron); only presence of the field is checked.
projection!(ActivationsResponse, activations: serde_json::Value);
projection!(InputAvgsResponse, input_avgs: serde_json::Value);
projection!(InputStdsResponse, input_stds: serde_json::Value);
projection!(BiasStatusResponse, status: String);
projection!(TimestepResponse, timestep: u64);

#[cfg(test)]
mod tests {
    use super::*;

    fn project<P: Projection + for<'de> Deserialize<'de>>(json: &str) -> serde_json::Result<P::Output> {
        serde_json::from_str::<P>(json).map(Projection::into_output)
    }

    #[test]
    fn test_layers_projection() {
        let layers = project::<LayersResponse>(r#"{"status":"SUCCESS","layers":["l1","l2"]}"#).unwrap();
        assert_eq!(layers, vec!["l1", "l2"]);
    }

    #[test]
    fn test_missing_field_is_an_error() {
        let err = project::<ArchitectureResponse>(r#"{"status":"ERROR"}"#).unwrap_err();
        assert!(err.to_string().contains("architecture"));
    }

    #[test]
    fn test_wrong_type_is_an_error() {
        assert!(project::<TimestepResponse>(r#"{"timestep":"three"}"#).is_err());
        assert!(project::<LayersResponse>(r#"{"layers":["a",1]}"#).is_err());
    }

    #[test]
    fn test_activations_keep_nesting() {
        let acts = project::<ActivationsResponse>(r#"{"activations":[[0.1,0.2],[0.3,0.4]]}"#).unwrap();
        assert_eq!(acts, serde_json::json!([[0.1, 0.2], [0.3, 0.4]]));
        assert!(project::<InputStdsResponse>(r#"{"status":"ERROR"}"#).is_err());
    }
}
