//! The process-wide client. Kept in its own test binary so no other test
//! observes the base URL change.

mod common;

use common::{MockBackend, Reply};
use neurolens_client::{InspectorClient, ModelInspector, DEFAULT_BASE_URL};
use serde_json::json;

#[tokio::test]
async fn test_shared_client_uses_updated_base_url() {
    let mock = MockBackend::start(Reply::json(json!({ "layers": ["l1", "l2"] }))).await;

    let client = InspectorClient::shared();
    assert_eq!(client.base_url(), DEFAULT_BASE_URL);

    client.set_base_url(mock.base_url.clone());
    assert!(std::ptr::eq(client, InspectorClient::shared()));
    assert_eq!(InspectorClient::shared().base_url(), mock.base_url);

    let layers = InspectorClient::shared().get_layer_names("m").await.unwrap();
    assert_eq!(layers, vec!["l1", "l2"]);
    assert_eq!(mock.requests().len(), 1);
}
