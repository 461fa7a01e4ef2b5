//! Integration tests for rating submission and the cached average.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The server running (cargo run -p ratewise-server)
//!
//! Run with: cargo test -p ratewise-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use ratewise_integration_tests::{base_url, authenticated_token, login, signup, unique_email};

/// Create an owner and a store for them, returning (store id, owner
/// token).
async fn create_store(client: &Client, admin_token: &str) -> (i64, String) {
    let owner_email = unique_email("store-owner");
    let body = signup(client, &owner_email, "owner").await;
    let owner_id = body["user"]["id"].as_i64().expect("owner id");

    let resp = client
        .post(format!("{}/admin/stores", base_url()))
        .bearer_auth(admin_token)
        .json(&json!({
            "name": "Ledger Test Store",
            "email": unique_email("store"),
            "address": "3 Market Square",
            "owner_id": owner_id,
        }))
        .send()
        .await
        .expect("store creation failed");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.expect("JSON body");
    assert_eq!(body["message"], "Store added successfully");
    let store_id = body["store"]["id"].as_i64().expect("store id");

    let owner_token = login(client, &owner_email).await;
    (store_id, owner_token)
}

/// Create a store for an existing owner, returning its id.
async fn add_store_for(client: &Client, admin_token: &str, owner_id: i64, name: &str) -> i64 {
    let resp = client
        .post(format!("{}/admin/stores", base_url()))
        .bearer_auth(admin_token)
        .json(&json!({
            "name": name,
            "email": unique_email("store"),
            "address": "3 Market Square",
            "owner_id": owner_id,
        }))
        .send()
        .await
        .expect("store creation failed");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.expect("JSON body");
    body["store"]["id"].as_i64().expect("store id")
}

async fn rate(client: &Client, token: &str, store_id: i64, rating: i32) {
    let resp = client
        .post(format!("{}/stores/{store_id}/rate", base_url()))
        .bearer_auth(token)
        .json(&json!({ "rating": rating }))
        .send()
        .await
        .expect("rating failed");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_rating_updates_cached_average() {
    let client = Client::new();
    let admin_token = authenticated_token(&client, "admin").await;
    let (store_id, _) = create_store(&client, &admin_token).await;

    let rater = authenticated_token(&client, "user").await;

    // First rating: average is exactly the rating
    let resp = client
        .post(format!("{}/stores/{store_id}/rate", base_url()))
        .bearer_auth(&rater)
        .json(&json!({ "rating": 4 }))
        .send()
        .await
        .expect("rating failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("JSON body");
    assert_eq!(body["message"], "Rating submitted successfully");
    assert_eq!(body["avg_rating"], "4.0");

    // A second user shifts the average; rounded to one decimal
    let second = authenticated_token(&client, "user").await;
    let resp = client
        .post(format!("{}/ratings", base_url()))
        .bearer_auth(&second)
        .json(&json!({ "store_id": store_id, "rating": 5 }))
        .send()
        .await
        .expect("rating failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("JSON body");
    assert_eq!(body["avg_rating"], "4.5");
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_rerating_replaces_not_duplicates() {
    let client = Client::new();
    let admin_token = authenticated_token(&client, "admin").await;
    let (store_id, _) = create_store(&client, &admin_token).await;

    let rater = authenticated_token(&client, "user").await;

    for rating in [2, 5] {
        let resp = client
            .post(format!("{}/stores/{store_id}/rate", base_url()))
            .bearer_auth(&rater)
            .json(&json!({ "rating": rating }))
            .send()
            .await
            .expect("rating failed");
        assert_eq!(resp.status(), StatusCode::OK);
    }

    // History shows one entry for the store, carrying the latest value
    let resp = client
        .get(format!("{}/ratings/user", base_url()))
        .bearer_auth(&rater)
        .send()
        .await
        .expect("history failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("JSON body");
    let ratings = body["ratings"].as_array().expect("ratings array");

    let for_store: Vec<&Value> = ratings
        .iter()
        .filter(|r| r["store_id"].as_i64() == Some(store_id))
        .collect();
    assert_eq!(for_store.len(), 1, "re-rating must not add a second row");
    assert_eq!(for_store[0]["rating_value"], 5);
    assert_eq!(for_store[0]["avg_rating"], "5.0");
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_rating_validation_and_missing_store() {
    let client = Client::new();
    let rater = authenticated_token(&client, "user").await;

    let resp = client
        .post(format!("{}/ratings", base_url()))
        .bearer_auth(&rater)
        .json(&json!({ "store_id": 999_999_999, "rating": 3 }))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.expect("JSON body");
    assert_eq!(body["message"], "Store not found");

    let admin_token = authenticated_token(&client, "admin").await;
    let (store_id, _) = create_store(&client, &admin_token).await;

    for bad in [0, 6, -1] {
        let resp = client
            .post(format!("{}/stores/{store_id}/rate", base_url()))
            .bearer_auth(&rater)
            .json(&json!({ "rating": bad }))
            .send()
            .await
            .expect("request failed");
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = resp.json().await.expect("JSON body");
        assert_eq!(body["message"], "Rating must be an integer between 1 and 5");
    }
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_concurrent_ratings_lose_no_update() {
    let client = Client::new();
    let admin_token = authenticated_token(&client, "admin").await;
    let (store_id, _) = create_store(&client, &admin_token).await;

    let first = authenticated_token(&client, "user").await;
    let second = authenticated_token(&client, "user").await;

    let submit = |token: String, rating: i32| {
        let client = client.clone();
        async move {
            let resp = client
                .post(format!("{}/stores/{store_id}/rate", base_url()))
                .bearer_auth(token)
                .json(&json!({ "rating": rating }))
                .send()
                .await
                .expect("rating failed");
            assert_eq!(resp.status(), StatusCode::OK);
        }
    };

    // Submit from both users at once; whichever lands second must see
    // the other's row when recomputing.
    tokio::join!(submit(first, 2), submit(second, 4));

    let admin_view = client
        .get(format!("{}/admin/stores?name=Ledger+Test+Store", base_url()))
        .bearer_auth(&admin_token)
        .send()
        .await
        .expect("listing failed");
    assert_eq!(admin_view.status(), StatusCode::OK);
    let body: Value = admin_view.json().await.expect("JSON body");
    let store = body["stores"]
        .as_array()
        .expect("stores array")
        .iter()
        .find(|s| s["id"].as_i64() == Some(store_id))
        .cloned()
        .expect("store in listing");

    assert_eq!(store["avg_rating"], "3.0", "both ratings must be counted");
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_viewer_listing_carries_own_rating() {
    let client = Client::new();
    let admin_token = authenticated_token(&client, "admin").await;
    let (store_id, _) = create_store(&client, &admin_token).await;

    let rater = authenticated_token(&client, "user").await;
    let resp = client
        .post(format!("{}/stores/{store_id}/rate", base_url()))
        .bearer_auth(&rater)
        .json(&json!({ "rating": 3 }))
        .send()
        .await
        .expect("rating failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!("{}/stores?name=Ledger+Test+Store", base_url()))
        .bearer_auth(&rater)
        .send()
        .await
        .expect("listing failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("JSON body");
    let stores = body["stores"].as_array().expect("stores array");

    let mine = stores
        .iter()
        .find(|s| s["id"].as_i64() == Some(store_id))
        .expect("rated store in listing");
    assert_eq!(mine["user_rating"], 3);
    assert!(mine["average_rating"].is_string());

    // A user who has not rated sees no user_rating
    let other = authenticated_token(&client, "user").await;
    let resp = client
        .get(format!("{}/stores?name=Ledger+Test+Store", base_url()))
        .bearer_auth(&other)
        .send()
        .await
        .expect("listing failed");
    let body: Value = resp.json().await.expect("JSON body");
    let stores = body["stores"].as_array().expect("stores array");
    let theirs = stores
        .iter()
        .find(|s| s["id"].as_i64() == Some(store_id))
        .expect("store in listing");
    assert!(theirs["user_rating"].is_null());
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_owner_dashboard_lists_raters() {
    let client = Client::new();
    let admin_token = authenticated_token(&client, "admin").await;
    let (store_id, owner_token) = create_store(&client, &admin_token).await;

    let rater = authenticated_token(&client, "user").await;
    let resp = client
        .post(format!("{}/stores/{store_id}/rate", base_url()))
        .bearer_auth(&rater)
        .json(&json!({ "rating": 5 }))
        .send()
        .await
        .expect("rating failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!("{}/owner/dashboard", base_url()))
        .bearer_auth(&owner_token)
        .send()
        .await
        .expect("dashboard failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("JSON body");
    let stores = body["stores"].as_array().expect("stores array");

    let store = stores
        .iter()
        .find(|s| s["id"].as_i64() == Some(store_id))
        .expect("owned store on dashboard");
    assert_eq!(store["avg_rating"], "5.0");
    let ratings = store["ratings"].as_array().expect("ratings array");
    assert_eq!(ratings.len(), 1);
    assert_eq!(ratings[0]["rating_value"], 5);
    assert!(ratings[0]["user_email"].is_string());

    // Non-owners are turned away
    let resp = client
        .get(format!("{}/owner/dashboard", base_url()))
        .bearer_auth(&rater)
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_owner_detail_averages_cached_store_values() {
    let client = Client::new();
    let admin_token = authenticated_token(&client, "admin").await;

    let owner_email = unique_email("two-store-owner");
    let body = signup(&client, &owner_email, "owner").await;
    let owner_id = body["user"]["id"].as_i64().expect("owner id");

    let store_a = add_store_for(&client, &admin_token, owner_id, "Mean Store A").await;
    let store_b = add_store_for(&client, &admin_token, owner_id, "Mean Store B").await;

    // Store A caches 4.5, store B caches 2.0
    let first = authenticated_token(&client, "user").await;
    let second = authenticated_token(&client, "user").await;
    rate(&client, &first, store_a, 4).await;
    rate(&client, &second, store_a, 5).await;
    rate(&client, &first, store_b, 2).await;

    let resp = client
        .get(format!("{}/admin/users/{owner_id}", base_url()))
        .bearer_auth(&admin_token)
        .send()
        .await
        .expect("detail failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("JSON body");

    // The owner's average is the mean of the cached per-store values,
    // (4.5 + 2.0) / 2 = 3.25, not a recompute over the raw ratings
    // (which would round to 3.7).
    let avg: f64 = body["user"]["avg_rating"]
        .as_str()
        .expect("avg_rating is a decimal string")
        .parse()
        .expect("avg_rating parses as a number");
    assert!(
        (avg - 3.25).abs() < 1e-9,
        "expected the mean of cached averages, got {avg}"
    );
}
