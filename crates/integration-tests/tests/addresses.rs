//! Live tests for the address endpoints.
//!
//! These tests require a running API server (see crate docs).

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use sweet_home_integration_tests::{TestCaller, api_base_url};

fn address(name: &str, is_default: bool) -> Value {
    json!({
        "name": name,
        "phone": "555-0100",
        "street": "12 Rose Lane",
        "city": "Pune",
        "state": "MH",
        "zipcode": "411001",
        "country": "India",
        "isDefault": is_default,
    })
}

async fn create(client: &Client, caller: &TestCaller, body: &Value) -> Value {
    let resp = client
        .post(format!("{}/api/addresses", api_base_url()))
        .bearer_auth(&caller.token)
        .json(body)
        .send()
        .await
        .expect("Failed to create address");

    assert_eq!(resp.status(), StatusCode::CREATED);
    resp.json().await.expect("Invalid JSON")
}

async fn list(client: &Client, caller: &TestCaller) -> Vec<Value> {
    let resp = client
        .get(format!("{}/api/addresses", api_base_url()))
        .bearer_auth(&caller.token)
        .send()
        .await
        .expect("Failed to list addresses");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Invalid JSON");
    body["addresses"].as_array().cloned().unwrap_or_default()
}

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_health() {
    let resp = Client::new()
        .get(format!("{}/health", api_base_url()))
        .send()
        .await
        .expect("Failed to reach server");

    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_address_lifecycle() {
    let client = Client::new();
    let caller = TestCaller::new();

    let home = create(&client, &caller, &address("Home", false)).await;
    let office = create(&client, &caller, &address("Office", true)).await;
    let home_id = home["address"]["id"].as_str().expect("id").to_owned();
    let office_id = office["address"]["id"].as_str().expect("id").to_owned();

    let listed: Vec<String> = list(&client, &caller)
        .await
        .iter()
        .filter_map(|a| a["id"].as_str().map(String::from))
        .collect();
    assert_eq!(listed, vec![office_id, home_id.clone()]);

    let resp = client
        .put(format!("{}/api/addresses/{home_id}", api_base_url()))
        .bearer_auth(&caller.token)
        .json(&json!({"city": "Mumbai"}))
        .send()
        .await
        .expect("Failed to update address");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .patch(format!("{}/api/addresses/{home_id}/default", api_base_url()))
        .bearer_auth(&caller.token)
        .send()
        .await
        .expect("Failed to set default");
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(
        list(&client, &caller)
            .await
            .iter()
            .all(|a| a["isDefault"] == true)
    );

    for expected in [StatusCode::OK, StatusCode::NOT_FOUND] {
        let resp = client
            .delete(format!("{}/api/addresses/{home_id}", api_base_url()))
            .bearer_auth(&caller.token)
            .send()
            .await
            .expect("Failed to delete address");
        assert_eq!(resp.status(), expected);
    }
    assert_eq!(list(&client, &caller).await.len(), 1);
}

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_addresses_are_private_to_caller() {
    let client = Client::new();
    let owner = TestCaller::new();
    let other = TestCaller::new();

    let created = create(&client, &owner, &address("Home", false)).await;
    let id = created["address"]["id"].as_str().expect("id");

    assert!(list(&client, &other).await.is_empty());

    let resp = client
        .delete(format!("{}/api/addresses/{id}", api_base_url()))
        .bearer_auth(&other.token)
        .send()
        .await
        .expect("Failed to send delete");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(list(&client, &owner).await.len(), 1);
}

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_missing_token_is_unauthorized() {
    let resp = Client::new()
        .get(format!("{}/api/addresses", api_base_url()))
        .send()
        .await
        .expect("Failed to reach server");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
