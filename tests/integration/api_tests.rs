//! API integration tests
//!
//! Run against a live server with a clean database:
//! cargo test -- --ignored

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:3000/api";

/// Register a fresh user with a unique email and return (id, email)
async fn register_user(client: &Client) -> (i64, String) {
    let email = format!(
        "user{}@test.libris",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    );

    let response = client
        .post(format!("{}/users/register", BASE_URL))
        .json(&json!({
            "name": "Test User",
            "email": email,
            "password": "secret1"
        }))
        .send()
        .await
        .expect("Failed to send register request");

    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse register response");
    (body["id"].as_i64().expect("No user id"), email)
}

/// Helper to get an authenticated token for a fresh user
async fn get_auth_token(client: &Client) -> String {
    let (_, email) = register_user(client).await;

    let response = client
        .post(format!("{}/users/login", BASE_URL))
        .json(&json!({
            "email": email,
            "password": "secret1"
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

async fn register_book(client: &Client, token: &str, title: &str, genre: &str) -> reqwest::Response {
    client
        .post(format!("{}/books/register", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "title": title,
            "author": format!("Author of {}", title),
            "year": 1990,
            "genre": genre
        }))
        .send()
        .await
        .expect("Failed to send book register request")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_register_and_duplicate_email() {
    let client = Client::new();
    let (_, email) = register_user(&client).await;

    // Same email again must be rejected
    let response = client
        .post(format!("{}/users/register", BASE_URL))
        .json(&json!({
            "name": "Someone Else",
            "email": email,
            "password": "secret2"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_register_short_password() {
    let client = Client::new();

    let response = client
        .post(format!("{}/users/register", BASE_URL))
        .json(&json!({
            "name": "Ana",
            "email": "ana-short-password@test.libris",
            "password": "short"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_login_wrong_password() {
    let client = Client::new();
    let (_, email) = register_user(&client).await;

    let response = client
        .post(format!("{}/users/login", BASE_URL))
        .json(&json!({
            "email": email,
            "password": "wrong-password"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["token"].is_null());
}

#[tokio::test]
#[ignore]
async fn test_login_unknown_email() {
    let client = Client::new();

    let response = client
        .post(format!("{}/users/login", BASE_URL))
        .json(&json!({
            "email": "nobody@test.libris",
            "password": "secret1"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_get_current_user() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .get(format!("{}/users/me", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["name"], "Test User");
    // The password hash must never be serialized
    assert!(body.get("password").is_none());
}

#[tokio::test]
#[ignore]
async fn test_unauthorized_access() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books/list", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_malformed_bearer_header() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books/list", BASE_URL))
        .header("Authorization", "Token abc")
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_register_and_list_books() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = register_book(&client, &token, "Book One A", "Fiction").await;
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["id_book"].is_i64());
    assert!(body["id_user"].is_i64());
    assert!(body["create_date"].is_string());

    let response = client
        .get(format!("{}/books/list", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body.as_array().expect("Expected array").len(), 1);
}

#[tokio::test]
#[ignore]
async fn test_empty_list_is_ok() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .get(format!("{}/books/list", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body.as_array().expect("Expected array").len(), 0);
}

#[tokio::test]
#[ignore]
async fn test_future_year_is_rejected() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .post(format!("{}/books/register", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "title": "From the Future",
            "author": "Nobody Yet",
            "year": 2999,
            "genre": "Fiction"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_sixth_book_hits_total_quota() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    for i in 0..5 {
        let response = register_book(&client, &token, &format!("Shelf Filler {}", i), "Fiction").await;
        assert_eq!(response.status(), 201);
    }

    let response = register_book(&client, &token, "One Too Many", "Romance").await;
    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "You can only register 5 books per user!");
}

#[tokio::test]
#[ignore]
async fn test_biography_quota_on_register_and_edit() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    // Two biographies fit
    for i in 0..2 {
        let response = register_book(&client, &token, &format!("Life Story {}", i), "Biography").await;
        assert_eq!(response.status(), 201);
    }

    // A third is rejected
    let response = register_book(&client, &token, "Life Story 2", "Biography").await;
    assert_eq!(response.status(), 400);

    // A different genre still fits
    let response = register_book(&client, &token, "Plain Novel X", "Fiction").await;
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let novel_id = body["id_book"].as_i64().expect("No book id");

    // Changing the novel's genre into the full Biography quota is rejected
    let response = client
        .put(format!("{}/books/edit/{}", BASE_URL, novel_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "genre": "Biography" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);

    // A status-only edit of a Biography at the cap succeeds
    let response = client
        .get(format!("{}/books/list?genre=Biography", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    let bio_id = body[0]["id"].as_i64().expect("No book id");

    let response = client
        .put(format!("{}/books/edit/{}", BASE_URL, bio_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "status": "read" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);

    // Re-asserting the same genre at the cap is also allowed
    let response = client
        .put(format!("{}/books/edit/{}", BASE_URL, bio_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "genre": "Biography" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);
}

#[tokio::test]
#[ignore]
async fn test_edit_requires_ownership() {
    let client = Client::new();
    let owner_token = get_auth_token(&client).await;
    let other_token = get_auth_token(&client).await;

    let response = register_book(&client, &owner_token, "Private Shelf Item", "Fiction").await;
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let book_id = body["id_book"].as_i64().expect("No book id");

    let response = client
        .put(format!("{}/books/edit/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", other_token))
        .json(&json!({ "status": "read" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_duplicate_title_author_pair() {
    let client = Client::new();
    let first = get_auth_token(&client).await;
    let second = get_auth_token(&client).await;

    let response = register_book(&client, &first, "Unique Pair Book", "Fiction").await;
    assert_eq!(response.status(), 201);

    // Uniqueness is global, not per owner
    let response = register_book(&client, &second, "Unique Pair Book", "Fiction").await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_delete_book() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = register_book(&client, &token, "Short Lived Book", "Fiction").await;
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let book_id = body["id_book"].as_i64().expect("No book id");

    let response = client
        .delete(format!("{}/books/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 204);

    let response = client
        .delete(format!("{}/books/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_edit_profile_and_delete_account() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    // Empty edit body is rejected
    let response = client
        .put(format!("{}/users/edit", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);

    let response = client
        .put(format!("{}/users/edit", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "name": "Renamed User" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["name"], "Renamed User");

    // Delete the account, then the profile is gone
    let response = client
        .delete(format!("{}/users/me", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 204);

    let response = client
        .get(format!("{}/users/me", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);
}
