//! Account directory and inventory lookup.

mod common;

use campaign_core::campaign::Targeting;
use campaign_core::inventory::InventoryCatalog;
use common::{client, mount_token, TOKEN_PATH};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_profiles(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v2/profiles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "profileId": 3001, "accountInfo": { "name": "Acme Agency", "type": "AGENCY" } },
            { "profileId": 3002 }
        ])))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_validate_credentials_success() {
    let server = MockServer::start().await;
    mount_token(&server, "token", 1).await;
    mount_profiles(&server).await;

    assert!(client(&server).validate_credentials().await);
}

#[tokio::test]
async fn test_validate_credentials_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "error": "invalid_client" })))
        .mount(&server)
        .await;

    assert!(!client(&server).validate_credentials().await);
}

#[tokio::test]
async fn test_entities_and_advertisers_apply_defaults() {
    let server = MockServer::start().await;
    mount_token(&server, "token", 1).await;
    mount_profiles(&server).await;

    let client = client(&server);
    let entities = client.list_entities().await.unwrap();
    assert_eq!(entities.len(), 2);
    assert_eq!(entities[0].entity_name, "Acme Agency");
    assert_eq!(entities[0].entity_type, "AGENCY");
    assert_eq!(entities[1].entity_name, "Profile 3002");
    assert_eq!(entities[1].entity_type, "ADVERTISER");

    let advertisers = client.list_advertisers().await.unwrap();
    assert_eq!(advertisers[1].advertiser_id, "3002");
    assert_eq!(advertisers[1].advertiser_name, "Advertiser 3002");
}

#[tokio::test]
async fn test_inventory_search_returns_remote_catalog() {
    let server = MockServer::start().await;
    mount_token(&server, "token", 1).await;

    Mock::given(method("POST"))
        .and(path("/dsp/inventory/v1/search"))
        .and(body_partial_json(json!({
            "inventoryTypes": ["THIRD_PARTY", "CONTEXTUAL", "AMAZON_OO"],
            "targeting": { "geographic": [{ "type": "COUNTRY", "value": "US" }] }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "thirdParty": [{ "id": "remote-1", "name": "Remote Deal", "dealId": "D-1" }],
            "contextual": [],
            "amazonOO": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let catalog = client(&server)
        .available_inventory(&Targeting::default(), None)
        .await;
    assert_eq!(catalog.third_party.len(), 1);
    assert_eq!(catalog.third_party[0].deal_id.as_deref(), Some("D-1"));
    assert!(catalog.owned.is_empty());
}

#[tokio::test]
async fn test_inventory_search_falls_back_to_reference_catalog() {
    let server = MockServer::start().await;
    mount_token(&server, "token", 1).await;

    Mock::given(method("POST"))
        .and(path("/dsp/inventory/v1/search"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let catalog = client(&server)
        .available_inventory(&Targeting::default(), None)
        .await;
    assert_eq!(catalog, InventoryCatalog::reference());
}
