mod common;

use common::TestApp;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::spawn().await;

    let response = app.get("/health").send().await.expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["status"], "ok");
}

#[tokio::test]
async fn test_register_account_success() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/auth/register")
        .json(&json!({
            "handle": "ferris",
            "contact_address": "ferris@example.com",
            "password": "pass_word!123"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["handle"], "ferris");
    assert_eq!(body["data"]["contact_address"], "ferris@example.com");
    assert!(body["data"]["id"].as_str().is_some());
    // Credential material never appears in responses
    assert!(body["data"]["password"].is_null());
    assert!(body["data"]["password_hash"].is_null());
}

#[tokio::test]
async fn test_register_duplicate_handle_conflict() {
    let app = TestApp::spawn().await;

    let response = app.register("ferris").await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .post("/api/auth/register")
        .json(&json!({
            "handle": "ferris",
            "contact_address": "other@example.com",
            "password": "pass_word!123"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert!(body["data"]["message"]
        .as_str()
        .unwrap()
        .contains("already taken"));
}

#[tokio::test]
async fn test_register_duplicate_contact_conflict() {
    let app = TestApp::spawn().await;

    let response = app.register("ferris").await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .post("/api/auth/register")
        .json(&json!({
            "handle": "crab",
            "contact_address": "ferris@example.com",
            "password": "pass_word!123"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert!(body["data"]["message"]
        .as_str()
        .unwrap()
        .contains("already registered"));
}

#[tokio::test]
async fn test_register_invalid_handle_unprocessable() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/auth/register")
        .json(&json!({
            "handle": "ab",
            "contact_address": "ab@example.com",
            "password": "pass_word!123"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_register_short_password_unprocessable() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/auth/register")
        .json(&json!({
            "handle": "ferris",
            "contact_address": "ferris@example.com",
            "password": "short"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert!(body["data"]["message"]
        .as_str()
        .unwrap()
        .contains("Password too short"));
}

#[tokio::test]
async fn test_register_oversized_password_unprocessable() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/auth/register")
        .json(&json!({
            "handle": "ferris",
            "contact_address": "ferris@example.com",
            "password": "a".repeat(73)
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert!(body["data"]["message"]
        .as_str()
        .unwrap()
        .contains("Password too long"));
}

#[tokio::test]
async fn test_login_returns_usable_api_key() {
    let app = TestApp::spawn().await;

    let response = app.register("ferris").await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .post("/api/auth/login")
        .json(&json!({ "handle": "ferris", "password": "pass_word!123" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["account"]["handle"], "ferris");
    assert!(body["data"]["key_id"].as_str().is_some());

    let api_key = body["data"]["api_key"].as_str().unwrap();
    assert!(api_key.starts_with("rct_"));

    // The returned key authenticates follow-up requests
    let response = app
        .get_authenticated("/api/auth/me", api_key)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["handle"], "ferris");
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = TestApp::spawn().await;

    let response = app.register("ferris").await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let wrong_password = app
        .post("/api/auth/login")
        .json(&json!({ "handle": "ferris", "password": "wrong_password!1" }))
        .send()
        .await
        .expect("Failed to execute request");
    let unknown_handle = app
        .post("/api/auth/login")
        .json(&json!({ "handle": "nobody", "password": "pass_word!123" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_handle.status(), StatusCode::UNAUTHORIZED);

    // Neither response reveals whether the account exists
    let wrong_password_body = wrong_password.text().await.expect("Failed to read response");
    let unknown_handle_body = unknown_handle.text().await.expect("Failed to read response");
    assert_eq!(wrong_password_body, unknown_handle_body);
}

#[tokio::test]
async fn test_me_requires_credentials() {
    let app = TestApp::spawn().await;

    let response = app.get("/api/auth/me").send().await.expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unauthorized_responses_are_uniform() {
    let app = TestApp::spawn().await;

    let api_key = app.register_and_login("ferris").await;
    let (revoked_id, revoked_key) = app.create_key(&api_key, "to revoke").await;
    let response = app
        .delete_authenticated(&format!("/api/auth/keys/{}", revoked_id), &api_key)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let expired_response = app
        .post_authenticated("/api/auth/keys", &api_key)
        .json(&json!({ "label": "expired", "expires_at": "2020-01-01T00:00:00Z" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(expired_response.status(), StatusCode::CREATED);
    let body: serde_json::Value = expired_response.json().await.expect("Failed to parse response");
    let expired_key = body["data"]["plain_key"].as_str().unwrap().to_string();

    // Well-formed but never issued: the prefix plus 43 base64url characters
    let unknown_key = format!("rct_{}", "A".repeat(43));

    let rejections = vec![
        app.get("/api/auth/me").send().await.expect("Failed to execute request"),
        app.get("/api/auth/me")
            .header("Authorization", "Basic dXNlcjpwYXNz")
            .send()
            .await
            .expect("Failed to execute request"),
        app.get_authenticated("/api/auth/me", "not_a_key")
            .send()
            .await
            .expect("Failed to execute request"),
        app.get_authenticated("/api/auth/me", &unknown_key)
            .send()
            .await
            .expect("Failed to execute request"),
        app.get_authenticated("/api/auth/me", &revoked_key)
            .send()
            .await
            .expect("Failed to execute request"),
        app.get_authenticated("/api/auth/me", &expired_key)
            .send()
            .await
            .expect("Failed to execute request"),
    ];

    // Every rejection, whatever its cause, produces the same response
    let mut bodies = Vec::new();
    for response in rejections {
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        bodies.push(response.text().await.expect("Failed to read response"));
    }
    for body in &bodies[1..] {
        assert_eq!(body, &bodies[0]);
    }
}

#[tokio::test]
async fn test_create_key_returns_plaintext_exactly_once() {
    let app = TestApp::spawn().await;

    let api_key = app.register_and_login("ferris").await;

    let response = app
        .post_authenticated("/api/auth/keys", &api_key)
        .json(&json!({ "label": "deploy hook" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["key"]["label"], "deploy hook");

    let plain_key = body["data"]["plain_key"].as_str().unwrap().to_string();
    assert!(plain_key.starts_with("rct_"));
    assert_eq!(
        body["data"]["key"]["display_prefix"].as_str().unwrap(),
        &plain_key[..12]
    );

    // Listing keys afterwards exposes neither the secret nor its digest
    let lookup_hash = auth::KeyGenerator::new().lookup_hash(&plain_key);
    let response = app
        .get_authenticated("/api/auth/keys", &api_key)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);

    let list_body = response.text().await.expect("Failed to read response");
    assert!(!list_body.contains(&plain_key));
    assert!(!list_body.contains(&lookup_hash));
    assert!(!list_body.contains("lookup_hash"));
}

#[tokio::test]
async fn test_create_key_rejects_blank_label() {
    let app = TestApp::spawn().await;

    let api_key = app.register_and_login("ferris").await;

    let response = app
        .post_authenticated("/api/auth/keys", &api_key)
        .json(&json!({ "label": "   " }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_list_keys_newest_first() {
    let app = TestApp::spawn().await;

    let api_key = app.register_and_login("ferris").await;
    app.create_key(&api_key, "deploy hook").await;

    let response = app
        .get_authenticated("/api/auth/keys", &api_key)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["total"], 2);

    let keys = body["data"]["keys"].as_array().unwrap();
    assert_eq!(keys[0]["label"], "deploy hook");
    // Login minted the older key with a timestamped label
    assert!(keys[1]["label"].as_str().unwrap().starts_with("Login "));
    assert!(keys[0]["is_active"].as_bool().unwrap());
}

#[tokio::test]
async fn test_revoked_key_stops_authenticating() {
    let app = TestApp::spawn().await;

    let api_key = app.register_and_login("ferris").await;
    let (key_id, plain_key) = app.create_key(&api_key, "to revoke").await;

    // The fresh key works before revocation
    let response = app
        .get_authenticated("/api/auth/me", &plain_key)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .delete_authenticated(&format!("/api/auth/keys/{}", key_id), &api_key)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .get_authenticated("/api/auth/me", &plain_key)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // The login key is untouched and the revoked one shows up inactive
    let response = app
        .get_authenticated("/api/auth/keys", &api_key)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    let keys = body["data"]["keys"].as_array().unwrap();
    let revoked = keys.iter().find(|k| k["id"] == key_id.as_str()).unwrap();
    assert!(!revoked["is_active"].as_bool().unwrap());
}

#[tokio::test]
async fn test_revoke_is_idempotent() {
    let app = TestApp::spawn().await;

    let api_key = app.register_and_login("ferris").await;
    let (key_id, _) = app.create_key(&api_key, "to revoke").await;

    for _ in 0..2 {
        let response = app
            .delete_authenticated(&format!("/api/auth/keys/{}", key_id), &api_key)
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }
}

#[tokio::test]
async fn test_revoke_foreign_key_not_found() {
    let app = TestApp::spawn().await;

    let ferris_key = app.register_and_login("ferris").await;
    let (ferris_key_id, _) = app.create_key(&ferris_key, "ferris key").await;
    let crab_key = app.register_and_login("crab").await;

    let response = app
        .delete_authenticated(&format!("/api/auth/keys/{}", ferris_key_id), &crab_key)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // The targeted key is unaffected
    let response = app
        .get_authenticated("/api/auth/keys", &ferris_key)
        .send()
        .await
        .expect("Failed to execute request");
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    let keys = body["data"]["keys"].as_array().unwrap();
    let targeted = keys
        .iter()
        .find(|k| k["id"] == ferris_key_id.as_str())
        .unwrap();
    assert!(targeted["is_active"].as_bool().unwrap());
}

#[tokio::test]
async fn test_revoke_invalid_key_id_bad_request() {
    let app = TestApp::spawn().await;

    let api_key = app.register_and_login("ferris").await;

    let response = app
        .delete_authenticated("/api/auth/keys/not-a-uuid", &api_key)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_expired_key_is_rejected_but_never_mutated() {
    let app = TestApp::spawn().await;

    let api_key = app.register_and_login("ferris").await;

    let response = app
        .post_authenticated("/api/auth/keys", &api_key)
        .json(&json!({ "label": "expired", "expires_at": "2020-01-01T00:00:00Z" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    let key_id = body["data"]["key"]["id"].as_str().unwrap().to_string();
    let expired_key = body["data"]["plain_key"].as_str().unwrap().to_string();

    let response = app
        .get_authenticated("/api/auth/me", &expired_key)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Expiry is evaluated at validation time; the record itself stays active
    let response = app
        .get_authenticated("/api/auth/keys", &api_key)
        .send()
        .await
        .expect("Failed to execute request");
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    let keys = body["data"]["keys"].as_array().unwrap();
    let expired = keys.iter().find(|k| k["id"] == key_id.as_str()).unwrap();
    assert!(expired["is_active"].as_bool().unwrap());
    assert_eq!(expired["expires_at"], "2020-01-01T00:00:00Z");
}
