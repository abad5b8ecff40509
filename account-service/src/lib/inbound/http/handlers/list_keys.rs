use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::account::models::IssuedKey;
use crate::domain::account::ports::AuthServicePort;
use crate::inbound::http::middleware::Principal;
use crate::inbound::http::router::AppState;

/// List the authenticated account's keys, newest first.
///
/// Key metadata only: plaintext secrets are gone after issuance and lookup
/// hashes never appear in responses.
pub async fn list_keys(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<ApiSuccess<ListKeysResponseData>, ApiError> {
    state
        .auth_service
        .list_keys(&principal.account.id)
        .await
        .map_err(ApiError::from)
        .map(|keys| {
            let keys: Vec<KeyData> = keys.iter().map(KeyData::from).collect();
            let total = keys.len();
            ApiSuccess::new(StatusCode::OK, ListKeysResponseData { keys, total })
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListKeysResponseData {
    pub keys: Vec<KeyData>,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyData {
    pub id: String,
    pub label: String,
    pub display_prefix: String,
    pub last_used_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&IssuedKey> for KeyData {
    fn from(key: &IssuedKey) -> Self {
        Self {
            id: key.id.to_string(),
            label: key.label.as_str().to_string(),
            display_prefix: key.display_prefix.clone(),
            last_used_at: key.last_used_at,
            expires_at: key.expires_at,
            is_active: key.is_active,
            created_at: key.created_at,
        }
    }
}
