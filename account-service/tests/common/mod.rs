use std::sync::Arc;

use account_service::domain::account::service::AuthService;
use account_service::inbound::http::router::create_router;
use account_service::outbound::repositories::InMemoryCredentialStore;

/// Test application that spawns a real server over the in-memory store
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub api_client: reqwest::Client,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        // Each test gets its own isolated store
        let credential_store = Arc::new(InMemoryCredentialStore::new());
        let auth_service = Arc::new(AuthService::new(credential_store));

        let router = create_router(auth_service);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            api_client: reqwest::Client::new(),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with a bearer API key
    pub fn get_authenticated(&self, path: &str, api_key: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(api_key)
    }

    /// Helper to make POST request with a bearer API key
    pub fn post_authenticated(&self, path: &str, api_key: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(api_key)
    }

    /// Helper to make DELETE request with a bearer API key
    pub fn delete_authenticated(&self, path: &str, api_key: &str) -> reqwest::RequestBuilder {
        self.api_client
            .delete(format!("{}{}", self.address, path))
            .bearer_auth(api_key)
    }

    /// Register an account with a derived contact address and password
    pub async fn register(&self, handle: &str) -> reqwest::Response {
        self.post("/api/auth/register")
            .json(&serde_json::json!({
                "handle": handle,
                "contact_address": format!("{}@example.com", handle),
                "password": "pass_word!123"
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Register and log in, returning the issued plaintext API key
    pub async fn register_and_login(&self, handle: &str) -> String {
        let response = self.register(handle).await;
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let response = self
            .post("/api/auth/login")
            .json(&serde_json::json!({
                "handle": handle,
                "password": "pass_word!123"
            }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        body["data"]["api_key"]
            .as_str()
            .expect("login response is missing the api_key")
            .to_string()
    }

    /// Issue an extra key for the given bearer API key, returning
    /// (key_id, plain_key)
    pub async fn create_key(&self, api_key: &str, label: &str) -> (String, String) {
        let response = self
            .post_authenticated("/api/auth/keys", api_key)
            .json(&serde_json::json!({ "label": label }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        let key_id = body["data"]["key"]["id"]
            .as_str()
            .expect("create key response is missing the key id")
            .to_string();
        let plain_key = body["data"]["plain_key"]
            .as_str()
            .expect("create key response is missing the plaintext key")
            .to_string();
        (key_id, plain_key)
    }
}
