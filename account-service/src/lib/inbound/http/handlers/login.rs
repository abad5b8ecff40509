use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::account::errors::AuthError;
use crate::domain::account::models::Account;
use crate::domain::account::models::Handle;
use crate::domain::account::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequestBody>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    // A handle that fails validation cannot belong to any account; reply
    // exactly as for a wrong password
    let handle = Handle::new(body.handle)
        .map_err(|_| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    let (account, credential) = state
        .auth_service
        .login(&handle, &body.password)
        .await
        .map_err(|e| match e {
            AuthError::InvalidCredentials => {
                ApiError::Unauthorized("Invalid credentials".to_string())
            }
            _ => ApiError::from(e),
        })?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        LoginResponseData {
            account: (&account).into(),
            api_key: credential.plain_key,
            key_id: credential.key.id.to_string(),
        },
    ))
}

#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequestBody {
    handle: String,
    password: String,
}

impl std::fmt::Debug for LoginRequestBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequestBody")
            .field("handle", &self.handle)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub account: AccountData,
    /// Plaintext API key, returned exactly once.
    pub api_key: String,
    pub key_id: String,
}

impl std::fmt::Debug for LoginResponseData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginResponseData")
            .field("account", &self.account)
            .field("api_key", &"<redacted>")
            .field("key_id", &self.key_id)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountData {
    pub id: String,
    pub handle: String,
    pub contact_address: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Account> for AccountData {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.to_string(),
            handle: account.handle.as_str().to_string(),
            contact_address: account.contact_address.as_str().to_string(),
            is_active: account.is_active,
            created_at: account.created_at,
        }
    }
}
