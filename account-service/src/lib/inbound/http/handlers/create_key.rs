use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use crate::account::errors::KeyLabelError;
use crate::domain::account::models::IssueKeyCommand;
use crate::domain::account::models::IssuedKey;
use crate::domain::account::models::KeyLabel;
use crate::domain::account::ports::AuthServicePort;
use crate::inbound::http::middleware::Principal;
use crate::inbound::http::router::AppState;

pub async fn create_key(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(body): Json<CreateKeyRequest>,
) -> Result<ApiSuccess<CreateKeyResponseData>, ApiError> {
    let command = body.try_into_command()?;

    state
        .auth_service
        .issue_key(&principal.account.id, command)
        .await
        .map_err(ApiError::from)
        .map(|credential| {
            ApiSuccess::new(
                StatusCode::CREATED,
                CreateKeyResponseData {
                    key: (&credential.key).into(),
                    plain_key: credential.plain_key,
                },
            )
        })
}

/// HTTP request body for issuing an API key (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateKeyRequest {
    label: String,
    expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Error)]
enum ParseCreateKeyRequestError {
    #[error("Invalid key label: {0}")]
    Label(#[from] KeyLabelError),
}

impl CreateKeyRequest {
    fn try_into_command(self) -> Result<IssueKeyCommand, ParseCreateKeyRequestError> {
        let label = KeyLabel::new(self.label)?;
        Ok(IssueKeyCommand::new(label, self.expires_at))
    }
}

impl From<ParseCreateKeyRequestError> for ApiError {
    fn from(err: ParseCreateKeyRequestError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}

#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct CreateKeyResponseData {
    pub key: KeyData,
    /// Plaintext API key, returned exactly once at issuance.
    pub plain_key: String,
}

impl std::fmt::Debug for CreateKeyResponseData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateKeyResponseData")
            .field("key", &self.key)
            .field("plain_key", &"<redacted>")
            .finish()
    }
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
